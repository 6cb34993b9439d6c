//! Farmer records and the public application/contact forms.

pub mod domain;
pub mod repository;
pub mod service;


pub use domain::{
    ApplicationForm, ContactForm, Farm, Farmer, FarmerPatch, InvalidRecordId, RecordId, Stored,
};
pub use repository::{InMemoryRecordRepository, RecordRepository, RepositoryError, UpdateOutcome};
pub use service::{ImageUpload, RecordService, RecordServiceError};
