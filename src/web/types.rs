// src/web/types.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::browser::JobBrowser;
use crate::settings::PreferencesStore;
use crate::suggestions::SuggestionController;
use crate::types::AppliedFilter;

/// Everything the local server hands to its routes
pub struct AppState {
    pub suggestions: SuggestionController,
    pub browser: Mutex<JobBrowser>,
    pub settings: Mutex<PreferencesStore>,
}

// ===== Response envelopes =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: impl Into<String>, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.to_string(),
            suggestions,
        }
    }
}

pub type ApiFailure = (Status, Json<StandardErrorResponse>);

pub fn failure(
    status: Status,
    error: impl Into<String>,
    error_code: &str,
    suggestions: Vec<String>,
) -> ApiFailure {
    (
        status,
        Json(StandardErrorResponse::new(error, error_code, suggestions)),
    )
}

// ===== Request bodies =====

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchRequest {
    pub keywords: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ConfirmRequest {
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct FilterRequest {
    pub filter: AppliedFilter,
}
