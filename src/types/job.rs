// src/types/job.rs
//! Job records as returned by the listing and suggestion endpoints

use serde::{Deserialize, Deserializer, Serialize};

// ===== Job Record =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Backend row id, only present on suggestion results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub linkedin_job_id: String,
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub relevant: bool,
    #[serde(default)]
    pub relevancy_reason: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub applied: bool,
}

impl Job {
    pub fn company_or_default(&self) -> &str {
        self.company.as_deref().unwrap_or("Unknown company")
    }

    pub fn location_or_default(&self) -> &str {
        self.location.as_deref().unwrap_or("Remote")
    }

    /// Query parameters for `GET /job/details`
    pub fn details_query(&self) -> JobDetailsQuery<'_> {
        JobDetailsQuery {
            linkedin_job_id: &self.linkedin_job_id,
            title: &self.title,
            company: self.company.as_deref(),
            location: self.location.as_deref(),
            url: &self.url,
        }
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// ===== Request Payloads =====

#[derive(Debug, Serialize)]
pub struct JobDetailsQuery<'a> {
    pub linkedin_job_id: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    pub url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedUpdate {
    pub linkedin_job_id: String,
    pub applied: bool,
}

/// Sort order accepted by `/jobs/list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "R")]
    Relevance,
    #[serde(rename = "DD")]
    Recency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    pub start: u32,
    pub limit: u32,
    /// Posting age in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_filter: Option<u32>,
    #[serde(default)]
    pub sort_by: SortBy,
}

pub const MAX_SEARCH_LIMIT: u32 = 50;

impl SearchQuery {
    pub fn new(keywords: impl Into<String>, location: impl Into<String>, limit: u32) -> Self {
        Self {
            keywords: keywords.into(),
            location: location.into(),
            start: 0,
            limit: limit.clamp(1, MAX_SEARCH_LIMIT),
            time_filter: None,
            sort_by: SortBy::default(),
        }
    }
}

/// Which suggestions to list, keyed on the `applied` flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedFilter {
    #[default]
    All,
    Applied,
    NotApplied,
}

impl AppliedFilter {
    pub fn as_query(self) -> Option<bool> {
        match self {
            AppliedFilter::All => None,
            AppliedFilter::Applied => Some(true),
            AppliedFilter::NotApplied => Some(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterQuery {
    pub limit: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
}
