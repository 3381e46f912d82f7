// src/core/mod.rs
//! Backend access and configuration shared by every view

pub mod backend;
pub mod config_manager;
pub mod service_client;

pub use backend::{JobBackend, SharedBackend};
pub use config_manager::{AppConfig, ConfigManager};
pub use service_client::ServiceClient;
