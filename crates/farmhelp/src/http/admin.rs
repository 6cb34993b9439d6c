use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, ApiJson, FarmHelpState};

#[derive(Debug, Deserialize)]
pub(crate) struct AdminLoginRequest {
    password: String,
}

pub(crate) async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to FarmHelp API" }))
}

/// Checks the admin panel password. With no password configured every attempt is rejected.
pub(crate) async fn verify_admin(
    State(state): State<FarmHelpState>,
    ApiJson(request): ApiJson<AdminLoginRequest>,
) -> Result<Json<Value>, ApiError> {
    match state.admin.password.as_deref() {
        Some(expected) if expected == request.password => Ok(Json(json!({
            "status": "success",
            "message": "Authenticated",
        }))),
        _ => Err(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid password")),
    }
}
