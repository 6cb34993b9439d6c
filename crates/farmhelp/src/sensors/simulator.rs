use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::state::{SensorReading, SensorState};
use super::store::{InMemorySensorStore, SensorStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("sensor_id is required")]
    EmptySensorId,
}

/// Serves simulated readings that drift slowly over wall-clock time.
pub struct SensorSimulator<S = InMemorySensorStore> {
    store: S,
    rng: Mutex<StdRng>,
}

impl SensorSimulator<InMemorySensorStore> {
    pub fn new() -> Self {
        Self::with_store(InMemorySensorStore::default())
    }

    /// Reproducible walks, for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_store_and_rng(InMemorySensorStore::default(), StdRng::seed_from_u64(seed))
    }
}

impl Default for SensorSimulator<InMemorySensorStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SensorStore> SensorSimulator<S> {
    pub fn with_store(store: S) -> Self {
        Self::with_store_and_rng(store, StdRng::from_entropy())
    }

    pub fn with_store_and_rng(store: S, rng: StdRng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn read_sensor(&self, sensor_id: &str) -> Result<SensorReading, SensorError> {
        self.read_at(sensor_id, Utc::now())
    }

    /// Reads `sensor_id` as of `now`, stepping any walk whose timer has expired.
    pub fn read_at(
        &self,
        sensor_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SensorReading, SensorError> {
        let sensor_id = sensor_id.trim();
        if sensor_id.is_empty() {
            return Err(SensorError::EmptySensorId);
        }

        let entry = self
            .store
            .entry(sensor_id, &mut || SensorState::initial(&mut *self.lock_rng()));

        let mut state = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let transition = state.advance(now, &mut *self.lock_rng());
        let reading = state.reading();

        debug!(
            sensor_id,
            soil_stepped = transition.soil_stepped,
            tank_stepped = transition.tank_stepped,
            soil_moisture = reading.soil_moisture,
            water_tank_level = reading.water_tank_level,
            "sensor read"
        );

        Ok(reading)
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
