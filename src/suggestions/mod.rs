// src/suggestions/mod.rs
pub mod controller;
pub mod poller;
pub mod preconditions;
pub mod state;

pub use controller::{ControllerSettings, StartOutcome, SuggestionController};
pub use poller::PollSettings;
pub use state::{OverlayMessage, RunOutcome, SuggestionState};
