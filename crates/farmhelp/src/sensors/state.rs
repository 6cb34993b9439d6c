use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Soil moisture may change once every 30 minutes.
pub const SOIL_UPDATE_INTERVAL_SECS: i64 = 30 * 60;
/// Tank level may change once every 60 minutes.
pub const TANK_UPDATE_INTERVAL_SECS: i64 = 60 * 60;
pub const MAX_STEP: i16 = 5;
pub const READING_MIN: u8 = 0;
pub const READING_MAX: u8 = 100;

const INITIAL_SOIL_RANGE: (u8, u8) = (30, 70);
const INITIAL_TANK_RANGE: (u8, u8) = (50, 90);

/// Values exposed to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub soil_moisture: u8,
    pub water_tank_level: u8,
}

/// Simulated state of one field sensor.
///
/// Each field runs its own random walk behind its own timer: a step is only taken once the
/// matching interval has elapsed since that field last moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorState {
    pub soil_moisture: u8,
    pub water_tank_level: u8,
    pub last_soil_update: DateTime<Utc>,
    pub last_tank_update: DateTime<Utc>,
}

/// Which walks moved during an [`SensorState::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    pub soil_stepped: bool,
    pub tank_stepped: bool,
}

impl SensorState {
    /// Fresh state with both timers at the Unix epoch, so the first advance steps both walks.
    pub fn initial<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            soil_moisture: rng.gen_range(INITIAL_SOIL_RANGE.0..=INITIAL_SOIL_RANGE.1),
            water_tank_level: rng.gen_range(INITIAL_TANK_RANGE.0..=INITIAL_TANK_RANGE.1),
            last_soil_update: DateTime::<Utc>::default(),
            last_tank_update: DateTime::<Utc>::default(),
        }
    }

    pub fn soil_due(&self, now: DateTime<Utc>) -> bool {
        elapsed_secs(self.last_soil_update, now) >= SOIL_UPDATE_INTERVAL_SECS
    }

    pub fn tank_due(&self, now: DateTime<Utc>) -> bool {
        elapsed_secs(self.last_tank_update, now) >= TANK_UPDATE_INTERVAL_SECS
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Transition {
        let mut transition = Transition::default();

        if self.soil_due(now) {
            self.soil_moisture = step(self.soil_moisture, rng);
            self.last_soil_update = now;
            transition.soil_stepped = true;
        }

        if self.tank_due(now) {
            self.water_tank_level = step(self.water_tank_level, rng);
            self.last_tank_update = now;
            transition.tank_stepped = true;
        }

        transition
    }

    pub fn reading(&self) -> SensorReading {
        SensorReading {
            soil_moisture: self.soil_moisture,
            water_tank_level: self.water_tank_level,
        }
    }
}

fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(since).num_seconds()
}

fn step<R: Rng + ?Sized>(value: u8, rng: &mut R) -> u8 {
    let delta = rng.gen_range(-MAX_STEP..=MAX_STEP);
    let next = (i16::from(value) + delta).clamp(i16::from(READING_MIN), i16::from(READING_MAX));
    next as u8
}
