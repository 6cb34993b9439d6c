use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use super::domain::{ApplicationForm, ContactForm, Farmer, FarmerPatch, RecordId, Stored};
use super::repository::{RecordRepository, RepositoryError};
use crate::integrations::messages::{application_alert, contact_alert};
use crate::integrations::{ImageHost, IntegrationError, Notifier};

pub const FARMER_LIST_LIMIT: usize = 100;
pub const FORM_LIST_LIMIT: usize = 1000;

const FARMER_NOT_FOUND: &str = "Farmer not found";
const APPLICATION_NOT_FOUND: &str = "Application record not found";
const CONTACT_NOT_FOUND: &str = "Contact record not found";
const MOBILE_NOT_FOUND: &str = "No farmer found with this mobile number";

/// An uploaded file as received from the admin form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Farmer, application, and contact records plus the side effects that accompany them.
pub struct RecordService {
    farmers: Arc<dyn RecordRepository<Farmer>>,
    applications: Arc<dyn RecordRepository<ApplicationForm>>,
    contacts: Arc<dyn RecordRepository<ContactForm>>,
    notifier: Arc<dyn Notifier>,
    images: Arc<dyn ImageHost>,
}

impl RecordService {
    pub fn new(
        farmers: Arc<dyn RecordRepository<Farmer>>,
        applications: Arc<dyn RecordRepository<ApplicationForm>>,
        contacts: Arc<dyn RecordRepository<ContactForm>>,
        notifier: Arc<dyn Notifier>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            farmers,
            applications,
            contacts,
            notifier,
            images,
        }
    }

    /// Stores a new farmer. Farms whose `photo` names one of `uploads` get that image hosted
    /// first; uploads run concurrently and a failed upload only clears that farm's photo.
    pub async fn create_farmer(
        &self,
        mut farmer: Farmer,
        uploads: Vec<ImageUpload>,
    ) -> Result<Stored<Farmer>, RecordServiceError> {
        if farmer.is_empty() {
            return Err(RecordServiceError::NoData);
        }

        let files: HashMap<String, Vec<u8>> = uploads
            .into_iter()
            .map(|upload| (upload.filename, upload.bytes))
            .collect();

        if let Some(farms) = farmer.farms.as_mut() {
            let mut pending = Vec::new();
            for (farm_key, farm) in farms.iter() {
                let Some(filename) = farm.photo.as_ref() else {
                    continue;
                };
                let Some(bytes) = files.get(filename) else {
                    continue;
                };

                let images = Arc::clone(&self.images);
                let filename = filename.clone();
                let bytes = bytes.clone();
                let handle =
                    tokio::spawn(async move { images.upload(&filename, bytes).await });
                pending.push((farm_key.clone(), handle));
            }

            for (farm_key, handle) in pending {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(err) => Err(IntegrationError::Api(format!("upload task failed: {err}"))),
                };
                let Some(farm) = farms.get_mut(&farm_key) else {
                    continue;
                };
                match outcome {
                    Ok(url) => farm.photo = Some(url),
                    Err(error) => {
                        warn!(%farm_key, %error, "failed to upload farm photo");
                        farm.photo = None;
                    }
                }
            }
        }

        let stored = self.farmers.insert(farmer)?;
        info!(farmer_id = %stored.id, "farmer created");
        Ok(stored)
    }

    /// Hosts one image and records its URL on `farm_key`, creating the farm entry if needed.
    pub async fn attach_farm_photo(
        &self,
        id: &RecordId,
        farm_key: &str,
        upload: ImageUpload,
    ) -> Result<String, RecordServiceError> {
        self.get_farmer(id)?;

        let url = self
            .images
            .upload(&upload.filename, upload.bytes)
            .await
            .map_err(RecordServiceError::Upload)?;

        let outcome = self.farmers.update(id, &mut |farmer: &mut Farmer| {
            farmer
                .farms
                .get_or_insert_with(Default::default)
                .entry(farm_key.to_string())
                .or_default()
                .photo = Some(url.clone());
        })?;
        if outcome.matched == 0 {
            return Err(RecordServiceError::NotFound(FARMER_NOT_FOUND));
        }

        info!(farmer_id = %id, farm_key, "farm photo attached");
        Ok(url)
    }

    pub fn list_farmers(&self) -> Result<Vec<Stored<Farmer>>, RecordServiceError> {
        Ok(self.farmers.list(FARMER_LIST_LIMIT)?)
    }

    pub fn get_farmer(&self, id: &RecordId) -> Result<Stored<Farmer>, RecordServiceError> {
        self.farmers
            .fetch(id)?
            .ok_or(RecordServiceError::NotFound(FARMER_NOT_FOUND))
    }

    /// Applies a partial update and returns how many documents changed.
    pub fn update_farmer(
        &self,
        id: &RecordId,
        patch: FarmerPatch,
    ) -> Result<u64, RecordServiceError> {
        if patch.is_empty() {
            return Err(RecordServiceError::EmptyUpdate);
        }

        let mut patch = Some(patch);
        let outcome = self.farmers.update(id, &mut |farmer: &mut Farmer| {
            if let Some(patch) = patch.take() {
                farmer.apply(patch);
            }
        })?;
        if outcome.matched == 0 {
            return Err(RecordServiceError::NotFound(FARMER_NOT_FOUND));
        }
        Ok(outcome.modified)
    }

    pub fn delete_farmer(&self, id: &RecordId) -> Result<(), RecordServiceError> {
        if self.farmers.delete(id)? {
            info!(farmer_id = %id, "farmer deleted");
            Ok(())
        } else {
            Err(RecordServiceError::NotFound(FARMER_NOT_FOUND))
        }
    }

    /// First farmer registered under `mobile_no`.
    pub fn farmer_by_mobile(&self, mobile_no: &str) -> Result<Stored<Farmer>, RecordServiceError> {
        if mobile_no.is_empty() {
            return Err(RecordServiceError::MissingMobile);
        }

        self.farmers
            .list(usize::MAX)?
            .into_iter()
            .find(|stored| stored.document.mobile_no.as_deref() == Some(mobile_no))
            .ok_or(RecordServiceError::NotFound(MOBILE_NOT_FOUND))
    }

    pub async fn submit_application(
        &self,
        form: ApplicationForm,
    ) -> Result<Stored<ApplicationForm>, RecordServiceError> {
        let stored = self.applications.insert(form)?;
        info!(application_id = %stored.id, "application received");

        let message = application_alert(&stored.document, &Local::now());
        self.notify_best_effort(&message).await;
        Ok(stored)
    }

    pub fn list_applications(&self) -> Result<Vec<Stored<ApplicationForm>>, RecordServiceError> {
        Ok(self.applications.list(FORM_LIST_LIMIT)?)
    }

    pub fn delete_application(&self, id: &RecordId) -> Result<(), RecordServiceError> {
        if self.applications.delete(id)? {
            Ok(())
        } else {
            Err(RecordServiceError::NotFound(APPLICATION_NOT_FOUND))
        }
    }

    pub async fn submit_contact(
        &self,
        form: ContactForm,
    ) -> Result<Stored<ContactForm>, RecordServiceError> {
        let stored = self.contacts.insert(form)?;
        info!(contact_id = %stored.id, "contact request received");

        let message = contact_alert(&stored.document, &Local::now());
        self.notify_best_effort(&message).await;
        Ok(stored)
    }

    pub fn list_contacts(&self) -> Result<Vec<Stored<ContactForm>>, RecordServiceError> {
        Ok(self.contacts.list(FORM_LIST_LIMIT)?)
    }

    pub fn delete_contact(&self, id: &RecordId) -> Result<(), RecordServiceError> {
        if self.contacts.delete(id)? {
            Ok(())
        } else {
            Err(RecordServiceError::NotFound(CONTACT_NOT_FOUND))
        }
    }

    async fn notify_best_effort(&self, message: &str) {
        if let Err(error) = self.notifier.notify(message).await {
            warn!(%error, "failed to send notification");
        }
    }
}

/// Error raised by the record service.
#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error("No data provided")]
    NoData,
    #[error("No data provided for update")]
    EmptyUpdate,
    #[error("Mobile number is required")]
    MissingMobile,
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("image upload failed: {0}")]
    Upload(IntegrationError),
}
