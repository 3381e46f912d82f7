// src/core/service_client.rs
//! HTTP client for the job-search assistant backend

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, trace};

use crate::core::backend::JobBackend;
use crate::error::{ApiError, ApiResult};
use crate::types::preferences::{CountriesBody, InstructionsBody, ResumeBody, TitlesBody};
use crate::types::{AnalysisStatus, AppliedUpdate, FilterQuery, Job, SearchQuery, TriggerResponse};

const JOBS_LIST_ENDPOINT: &str = "/jobs/list";
const JOB_DETAILS_ENDPOINT: &str = "/job/details";
const JOB_APPLIED_ENDPOINT: &str = "/job/applied";
const JOBS_FILTER_ENDPOINT: &str = "/jobs/filter";
const JOBS_FILTER_STATUS_ENDPOINT: &str = "/jobs/filter/status";
const USER_RESUME_ENDPOINT: &str = "/user/resume";
const USER_INSTRUCTIONS_ENDPOINT: &str = "/user/instructions";
const USER_COUNTRIES_ENDPOINT: &str = "/user/job_search_countries";
const USER_TITLES_ENDPOINT: &str = "/user/job_search_titles";

const NO_QUERY: &[(&str, &str)] = &[];

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Generic GET request with query parameters
    async fn get<Q, R>(&self, endpoint: &str, query: &Q) -> ApiResult<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        Self::read_json(endpoint, response).await
    }

    /// Generic POST request with JSON body, response body ignored
    async fn post<T>(&self, endpoint: &str, payload: &T) -> ApiResult<()>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(endpoint);
        trace!("POST {}", url);

        let response = self.client.post(&url).json(payload).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn read_json<R: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> ApiResult<R> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| {
            error!("Unexpected payload from {}: {}", endpoint, body);
            ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::CONFLICT {
            return Err(ApiError::Conflict(error_text));
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            body: error_text,
        })
    }
}

#[async_trait]
impl JobBackend for ServiceClient {
    async fn search_jobs(&self, query: &SearchQuery) -> ApiResult<Vec<Job>> {
        debug!(
            "Searching jobs: keywords={} location={} start={} limit={}",
            query.keywords, query.location, query.start, query.limit
        );
        let jobs: Option<Vec<Job>> = self.get(JOBS_LIST_ENDPOINT, query).await?;
        Ok(jobs.unwrap_or_default())
    }

    async fn job_details(&self, job: &Job) -> ApiResult<Job> {
        debug!("Fetching details for job {}", job.linkedin_job_id);
        self.get(JOB_DETAILS_ENDPOINT, &job.details_query()).await
    }

    async fn mark_applied(&self, linkedin_job_id: &str, applied: bool) -> ApiResult<()> {
        let payload = AppliedUpdate {
            linkedin_job_id: linkedin_job_id.to_string(),
            applied,
        };
        self.post(JOB_APPLIED_ENDPOINT, &payload).await
    }

    async fn filtered_jobs(&self, query: &FilterQuery) -> ApiResult<Vec<Job>> {
        let jobs: Option<Vec<Job>> = self.get(JOBS_FILTER_ENDPOINT, query).await?;
        Ok(jobs.unwrap_or_default())
    }

    async fn trigger_analysis(&self) -> ApiResult<TriggerResponse> {
        let url = self.url(JOBS_FILTER_ENDPOINT);
        debug!("Triggering analysis: {}", url);

        let response = self.client.post(&url).send().await?;
        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        // An empty acknowledgement is still a started run
        if body.trim().is_empty() {
            return Ok(TriggerResponse::default());
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: JOBS_FILTER_ENDPOINT.to_string(),
            source,
        })
    }

    async fn analysis_status(&self) -> ApiResult<AnalysisStatus> {
        self.get(JOBS_FILTER_STATUS_ENDPOINT, NO_QUERY).await
    }

    async fn resume(&self) -> ApiResult<String> {
        let resume: Option<String> = self.get(USER_RESUME_ENDPOINT, NO_QUERY).await?;
        Ok(resume.unwrap_or_default())
    }

    async fn save_resume(&self, resume: &str) -> ApiResult<()> {
        let payload = ResumeBody {
            resume: resume.to_string(),
        };
        self.post(USER_RESUME_ENDPOINT, &payload).await
    }

    async fn instructions(&self) -> ApiResult<String> {
        let instructions: Option<String> = self.get(USER_INSTRUCTIONS_ENDPOINT, NO_QUERY).await?;
        Ok(instructions.unwrap_or_default())
    }

    async fn save_instructions(&self, instructions: &str) -> ApiResult<()> {
        let payload = InstructionsBody {
            instructions: instructions.to_string(),
        };
        self.post(USER_INSTRUCTIONS_ENDPOINT, &payload).await
    }

    async fn countries(&self) -> ApiResult<Vec<String>> {
        let countries: Option<Vec<String>> = self.get(USER_COUNTRIES_ENDPOINT, NO_QUERY).await?;
        Ok(countries.unwrap_or_default())
    }

    async fn save_countries(&self, countries: &[String]) -> ApiResult<()> {
        let payload = CountriesBody {
            job_search_countries: countries.to_vec(),
        };
        self.post(USER_COUNTRIES_ENDPOINT, &payload).await
    }

    async fn titles(&self) -> ApiResult<Vec<String>> {
        let titles: Option<Vec<String>> = self.get(USER_TITLES_ENDPOINT, NO_QUERY).await?;
        Ok(titles.unwrap_or_default())
    }

    async fn save_titles(&self, titles: &[String]) -> ApiResult<()> {
        let payload = TitlesBody {
            job_search_titles: titles.to_vec(),
        };
        self.post(USER_TITLES_ENDPOINT, &payload).await
    }
}
