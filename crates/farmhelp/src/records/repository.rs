use std::sync::{Mutex, PoisonError};

use super::domain::{RecordId, Stored};

/// Result of updating a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Storage abstraction for one document collection.
pub trait RecordRepository<T>: Send + Sync {
    fn insert(&self, document: T) -> Result<Stored<T>, RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<Stored<T>>, RepositoryError>;
    fn fetch(&self, id: &RecordId) -> Result<Option<Stored<T>>, RepositoryError>;
    /// Applies `change` to the stored document as one step; concurrent updates to the same
    /// record never overwrite each other.
    fn update(
        &self,
        id: &RecordId,
        change: &mut dyn FnMut(&mut T),
    ) -> Result<UpdateOutcome, RepositoryError>;
    fn delete(&self, id: &RecordId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Insertion-ordered collection held in process memory.
#[derive(Debug)]
pub struct InMemoryRecordRepository<T> {
    records: Mutex<Vec<Stored<T>>>,
}

impl<T> Default for InMemoryRecordRepository<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T> InMemoryRecordRepository<T> {
    fn records(&self) -> std::sync::MutexGuard<'_, Vec<Stored<T>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> RecordRepository<T> for InMemoryRecordRepository<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    fn insert(&self, document: T) -> Result<Stored<T>, RepositoryError> {
        let stored = Stored {
            id: RecordId::generate(),
            document,
        };
        self.records().push(stored.clone());
        Ok(stored)
    }

    fn list(&self, limit: usize) -> Result<Vec<Stored<T>>, RepositoryError> {
        Ok(self.records().iter().take(limit).cloned().collect())
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<Stored<T>>, RepositoryError> {
        Ok(self.records().iter().find(|record| &record.id == id).cloned())
    }

    fn update(
        &self,
        id: &RecordId,
        change: &mut dyn FnMut(&mut T),
    ) -> Result<UpdateOutcome, RepositoryError> {
        let mut guard = self.records();
        let Some(record) = guard.iter_mut().find(|record| &record.id == id) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let mut document = record.document.clone();
        change(&mut document);
        let modified = if record.document == document {
            0
        } else {
            record.document = document;
            1
        };

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    fn delete(&self, id: &RecordId) -> Result<bool, RepositoryError> {
        let mut guard = self.records();
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        Ok(guard.len() != before)
    }
}
