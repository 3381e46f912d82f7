// src/web/handlers/mod.rs
pub mod dashboard_handlers;
pub mod settings_handlers;
pub mod suggestion_handlers;

pub use dashboard_handlers::*;
pub use settings_handlers::*;
pub use suggestion_handlers::*;
