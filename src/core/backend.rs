// src/core/backend.rs
//! The REST surface the client consumes, as a trait so views can run against fakes

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::types::{AnalysisStatus, FilterQuery, Job, SearchQuery, TriggerResponse};

#[async_trait]
pub trait JobBackend: Send + Sync {
    // ===== Jobs =====

    async fn search_jobs(&self, query: &SearchQuery) -> ApiResult<Vec<Job>>;

    async fn job_details(&self, job: &Job) -> ApiResult<Job>;

    async fn mark_applied(&self, linkedin_job_id: &str, applied: bool) -> ApiResult<()>;

    async fn filtered_jobs(&self, query: &FilterQuery) -> ApiResult<Vec<Job>>;

    // ===== Analysis task =====

    /// Returns `ApiError::Conflict` when a run is already in progress
    async fn trigger_analysis(&self) -> ApiResult<TriggerResponse>;

    async fn analysis_status(&self) -> ApiResult<AnalysisStatus>;

    // ===== User profile =====

    async fn resume(&self) -> ApiResult<String>;

    async fn save_resume(&self, resume: &str) -> ApiResult<()>;

    async fn instructions(&self) -> ApiResult<String>;

    async fn save_instructions(&self, instructions: &str) -> ApiResult<()>;

    async fn countries(&self) -> ApiResult<Vec<String>>;

    async fn save_countries(&self, countries: &[String]) -> ApiResult<()>;

    async fn titles(&self) -> ApiResult<Vec<String>>;

    async fn save_titles(&self, titles: &[String]) -> ApiResult<()>;
}

pub type SharedBackend = Arc<dyn JobBackend>;
