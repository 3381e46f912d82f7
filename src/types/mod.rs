// src/types/mod.rs
pub mod analysis;
pub mod job;
pub mod preferences;

pub use analysis::{AnalysisState, AnalysisStatus, TriggerResponse};
pub use job::{AppliedFilter, AppliedUpdate, FilterQuery, Job, SearchQuery, SortBy};
pub use preferences::{Preferences, ProfileField};
