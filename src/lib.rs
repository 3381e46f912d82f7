// src/lib.rs
//! Client for the job-search assistant backend: listing search, AI-matched
//! suggestions with a polled scouting run, and profile settings.

pub mod browser;
pub mod cli;
pub mod core;
pub mod error;
pub mod list_view;
pub mod settings;
pub mod suggestions;
pub mod types;
pub mod web;

#[cfg(test)]
mod testing;

pub use crate::core::{AppConfig, ConfigManager, JobBackend, ServiceClient, SharedBackend};
pub use error::{ApiError, ApiResult, StartError};
pub use suggestions::{StartOutcome, SuggestionController};
pub use web::start_web_server;
