// src/error.rs
use crate::types::ProfileField;
use thiserror::Error;

/// Failure talking to the assistant backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("HTTP {status} error: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }
}

/// Why a scouting run did not start
#[derive(Error, Debug)]
pub enum StartError {
    #[error("Missing profile fields: {}", labels(.0))]
    MissingFields(Vec<ProfileField>),

    #[error("Could not validate profile: {0}")]
    Validation(#[source] ApiError),

    #[error("Failed to start analysis: {0}")]
    Trigger(#[source] ApiError),
}

fn labels(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
