use md5::{Digest, Md5};
use serde::Serialize;

use super::crops::{CropProfile, CROP_TABLE};

const TEMPERATURE_WEIGHT: f64 = 40.0;
const TEMPERATURE_PENALTY_PER_DEGREE: f64 = 6.0;
const HUMIDITY_WEIGHT: f64 = 30.0;
const HUMIDITY_PENALTY_PER_POINT: f64 = 1.2;
const VARIATION_BUCKETS: u128 = 150;
/// Flat bonus added to every crop before truncation.
pub const BASELINE_BONUS: f64 = 12.0;
/// Reported suitability never exceeds this.
pub const MAX_PERCENTAGE: i32 = 97;
pub const TOP_RESULTS: usize = 3;

/// Ranked entry returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuitabilityResult {
    pub crop: &'static str,
    pub percentage: i32,
}

/// Per-term contributions for one crop, kept for auditing the final percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropScore {
    pub crop: &'static str,
    pub temperature_score: f64,
    pub humidity_score: f64,
    pub variation: f64,
    pub percentage: i32,
}

impl CropScore {
    pub fn result(&self) -> SuitabilityResult {
        SuitabilityResult {
            crop: self.crop,
            percentage: self.percentage,
        }
    }
}

/// Top crops for the given weather and location, best first. Ties keep table order.
pub fn score_crops(
    temperature: f64,
    relative_humidity: f64,
    latitude: f64,
    longitude: f64,
) -> Vec<SuitabilityResult> {
    let mut ranked = score_all(temperature, relative_humidity, latitude, longitude);
    ranked.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    ranked
        .iter()
        .take(TOP_RESULTS)
        .map(CropScore::result)
        .collect()
}

/// Scores every crop in table order.
pub fn score_all(
    temperature: f64,
    relative_humidity: f64,
    latitude: f64,
    longitude: f64,
) -> Vec<CropScore> {
    CROP_TABLE
        .iter()
        .map(|crop| score_crop(crop, temperature, relative_humidity, latitude, longitude))
        .collect()
}

pub fn score_crop(
    crop: &CropProfile,
    temperature: f64,
    relative_humidity: f64,
    latitude: f64,
    longitude: f64,
) -> CropScore {
    let temperature_score = temperature_term(crop, temperature);
    let humidity_score = humidity_term(crop, relative_humidity);
    let variation = location_variation(crop.name, latitude, longitude);

    let raw = (temperature_score + humidity_score + variation + BASELINE_BONUS) as i32;

    CropScore {
        crop: crop.name,
        temperature_score,
        humidity_score,
        variation,
        percentage: raw.min(MAX_PERCENTAGE),
    }
}

fn temperature_term(crop: &CropProfile, temperature: f64) -> f64 {
    if crop.tolerates(temperature) {
        return TEMPERATURE_WEIGHT;
    }

    let distance = (temperature - crop.min_temp)
        .abs()
        .min((temperature - crop.max_temp).abs());
    (TEMPERATURE_WEIGHT - distance * TEMPERATURE_PENALTY_PER_DEGREE).max(0.0)
}

fn humidity_term(crop: &CropProfile, relative_humidity: f64) -> f64 {
    let distance = (relative_humidity - crop.ideal_humidity).abs();
    (HUMIDITY_WEIGHT - distance * HUMIDITY_PENALTY_PER_POINT).max(0.0)
}

/// Stable per-location offset in `[0.0, 15.0)`.
///
/// The MD5 digest of `crop + lat + lon` (coordinates rounded to two decimals) is read as a
/// big-endian integer and bucketed. Identical inputs give identical offsets on every run and
/// platform, so the same farm always sees the same ranking for the same weather.
pub fn location_variation(crop_name: &str, latitude: f64, longitude: f64) -> f64 {
    let seed = variation_seed(crop_name, latitude, longitude);
    let digest = Md5::digest(seed.as_bytes());

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    let bucket = u128::from_be_bytes(bytes) % VARIATION_BUCKETS;

    bucket as f64 / 10.0
}

fn variation_seed(crop_name: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "{crop_name}{}{}",
        format_coordinate(latitude),
        format_coordinate(longitude)
    )
}

/// Two-decimal rounding printed in shortest round-trip form (`47.0`, `21.38`, `-0.0`).
fn format_coordinate(value: f64) -> String {
    format!("{:?}", round_to_hundredths(value))
}

/// Rounds to two decimals, breaking exact ties towards the even neighbour.
///
/// Ties are judged on the exact binary value: `fma` recovers the rounding error of `value * 100`,
/// so `2.675` (stored just below the midpoint) rounds down while `21.125` is a true tie.
fn round_to_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    let residual = value.mul_add(100.0, -scaled);
    let floor = scaled.floor();
    let fraction = scaled - floor;

    let units = if fraction > 0.5 || (fraction == 0.5 && residual > 0.0) {
        floor + 1.0
    } else if fraction < 0.5 || residual < 0.0 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };

    let rounded = units / 100.0;
    if rounded == 0.0 {
        0.0_f64.copysign(value)
    } else {
        rounded
    }
}
