use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, ApiJson, FarmHelpState};
use crate::records::{
    ApplicationForm, ContactForm, Farmer, FarmerPatch, ImageUpload, RecordId, RecordServiceError,
    Stored,
};

type Created = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub(crate) struct FarmerLookup {
    #[serde(default)]
    mobile_no: Option<String>,
}

pub(crate) async fn add_farmer(
    State(state): State<FarmHelpState>,
    mut multipart: Multipart,
) -> Result<Created, ApiError> {
    let mut farmer_data = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("farmer_data") => {
                farmer_data = Some(field.text().await.map_err(malformed_multipart)?);
            }
            Some("files") => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(malformed_multipart)?;
                if !filename.is_empty() {
                    uploads.push(ImageUpload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let raw = farmer_data.ok_or_else(|| ApiError::unprocessable("farmer_data is required"))?;
    let farmer = parse_farmer(&raw)?;

    match state.records.create_farmer(farmer, uploads).await {
        Ok(stored) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Farmer data saved successfully",
                "farmer_id": stored.id,
            })),
        )),
        Err(RecordServiceError::NoData) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": false,
                "message": "No data provided",
            })),
        )),
        Err(other) => Err(other.into()),
    }
}

fn parse_farmer(raw: &str) -> Result<Farmer, ApiError> {
    serde_json::from_str(raw).map_err(|err| {
        if err.is_syntax() || err.is_eof() {
            ApiError::bad_request("Invalid JSON format in farmer_data")
        } else {
            ApiError::unprocessable(err.to_string())
        }
    })
}

pub(crate) async fn upload_farm_image(
    State(state): State<FarmHelpState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut farmer_id = None;
    let mut farm_key = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("farmer_id") => {
                farmer_id = Some(field.text().await.map_err(malformed_multipart)?);
            }
            Some("farm_key") => {
                farm_key = Some(field.text().await.map_err(malformed_multipart)?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(malformed_multipart)?;
                upload = Some(ImageUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let farmer_id = farmer_id.ok_or_else(|| ApiError::unprocessable("farmer_id is required"))?;
    let farm_key = farm_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ApiError::unprocessable("farm_key is required"))?;
    let upload = upload.ok_or_else(|| ApiError::unprocessable("file is required"))?;

    let id = RecordId::parse(farmer_id.trim())?;
    let photo = state
        .records
        .attach_farm_photo(&id, &farm_key, upload)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Image uploaded successfully",
        "photo": photo,
    })))
}

fn malformed_multipart(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

pub(crate) async fn list_farmers(
    State(state): State<FarmHelpState>,
) -> Result<Json<Vec<Stored<Farmer>>>, ApiError> {
    Ok(Json(state.records.list_farmers()?))
}

pub(crate) async fn get_farmer(
    State(state): State<FarmHelpState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Farmer>>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.records.get_farmer(&id)?))
}

pub(crate) async fn update_farmer(
    State(state): State<FarmHelpState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<FarmerPatch>,
) -> Result<Json<Value>, ApiError> {
    let id = RecordId::parse(&id)?;
    let modified_count = state.records.update_farmer(&id, patch)?;
    Ok(Json(json!({
        "success": true,
        "message": "Farmer updated successfully",
        "modified_count": modified_count,
    })))
}

pub(crate) async fn delete_farmer(
    State(state): State<FarmHelpState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = RecordId::parse(&id)?;
    state.records.delete_farmer(&id)?;
    Ok(deleted("Farmer deleted successfully"))
}

pub(crate) async fn farmer_by_mobile(
    State(state): State<FarmHelpState>,
    ApiJson(lookup): ApiJson<FarmerLookup>,
) -> Result<Json<Stored<Farmer>>, ApiError> {
    let mobile_no = lookup.mobile_no.unwrap_or_default();
    Ok(Json(state.records.farmer_by_mobile(&mobile_no)?))
}

pub(crate) async fn submit_application(
    State(state): State<FarmHelpState>,
    ApiJson(form): ApiJson<ApplicationForm>,
) -> Result<Created, ApiError> {
    let stored = state.records.submit_application(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Application submitted successfully",
            "application_id": stored.id,
        })),
    ))
}

pub(crate) async fn list_applications(
    State(state): State<FarmHelpState>,
) -> Result<Json<Vec<Stored<ApplicationForm>>>, ApiError> {
    Ok(Json(state.records.list_applications()?))
}

pub(crate) async fn delete_application(
    State(state): State<FarmHelpState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = RecordId::parse(&id)?;
    state.records.delete_application(&id)?;
    Ok(deleted("Application record deleted successfully"))
}

pub(crate) async fn submit_contact(
    State(state): State<FarmHelpState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<Created, ApiError> {
    let stored = state.records.submit_contact(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Contact form submitted successfully",
            "contact_id": stored.id,
        })),
    ))
}

pub(crate) async fn list_contacts(
    State(state): State<FarmHelpState>,
) -> Result<Json<Vec<Stored<ContactForm>>>, ApiError> {
    Ok(Json(state.records.list_contacts()?))
}

pub(crate) async fn delete_contact(
    State(state): State<FarmHelpState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = RecordId::parse(&id)?;
    state.records.delete_contact(&id)?;
    Ok(deleted("Contact record deleted successfully"))
}

fn deleted(message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
    }))
}
