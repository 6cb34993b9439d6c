//! Demo crop suitability: a fixed reference table scored against current weather.

pub mod coordinates;
pub mod crops;
pub mod scorer;

pub use coordinates::{CoordinateError, Coordinates};
pub use crops::{CropProfile, CROP_TABLE};
pub use scorer::{score_all, score_crops, CropScore, SuitabilityResult};
