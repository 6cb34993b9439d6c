//! Simulated field sensors for the demo dashboard.

pub mod simulator;
pub mod state;
pub mod store;

pub use simulator::{SensorError, SensorSimulator};
pub use state::{SensorReading, SensorState, Transition};
pub use store::{InMemorySensorStore, SensorStore, SharedSensorState};
