use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::state::SensorState;

/// Per-sensor state behind its own lock so concurrent reads of one sensor serialize while
/// different sensors proceed independently.
pub type SharedSensorState = Arc<Mutex<SensorState>>;

/// Table of simulated sensors with get-or-create semantics.
pub trait SensorStore: Send + Sync {
    /// Returns the state for `sensor_id`, inserting `init()` when the id is new.
    fn entry(&self, sensor_id: &str, init: &mut dyn FnMut() -> SensorState) -> SharedSensorState;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-memory store. Entries are never evicted.
#[derive(Debug, Default)]
pub struct InMemorySensorStore {
    states: Mutex<HashMap<String, SharedSensorState>>,
}

impl SensorStore for InMemorySensorStore {
    fn entry(&self, sensor_id: &str, init: &mut dyn FnMut() -> SensorState) -> SharedSensorState {
        let mut guard = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .entry(sensor_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(init())))
            .clone()
    }

    fn len(&self) -> usize {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
