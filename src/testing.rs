// src/testing.rs
//! In-memory backend used by the unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::{JobBackend, SharedBackend};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    AnalysisState, AnalysisStatus, FilterQuery, Job, Preferences, SearchQuery, TriggerResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReply {
    Started,
    Conflict,
    Fails,
}

#[derive(Debug, Clone)]
pub enum StatusReply {
    State(AnalysisState),
    Unreachable,
}

#[derive(Debug)]
pub struct FakeState {
    pub trigger: TriggerReply,
    /// Delay before the trigger request answers
    pub trigger_delay: Option<Duration>,
    pub statuses: VecDeque<StatusReply>,
    /// Served once the scripted statuses run out
    pub fallback_status: AnalysisState,
    pub profile_unreachable: bool,
    pub preferences: Preferences,
    pub suggestions: Vec<Job>,
    pub listing: Vec<Job>,
    pub fail_listing: bool,
    pub fail_details: bool,
    pub trigger_calls: usize,
    pub status_calls: usize,
    pub filter_queries: Vec<FilterQuery>,
    pub search_queries: Vec<SearchQuery>,
    pub applied_posts: Vec<(String, bool)>,
    pub detail_requests: Vec<String>,
    pub saves: usize,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            trigger: TriggerReply::Started,
            trigger_delay: None,
            statuses: VecDeque::new(),
            fallback_status: AnalysisState::Running,
            profile_unreachable: false,
            preferences: complete_preferences(),
            suggestions: Vec::new(),
            listing: Vec::new(),
            fail_listing: false,
            fail_details: false,
            trigger_calls: 0,
            status_calls: 0,
            filter_queries: Vec::new(),
            search_queries: Vec::new(),
            applied_posts: Vec::new(),
            detail_requests: Vec::new(),
            saves: 0,
        }
    }
}

pub fn complete_preferences() -> Preferences {
    Preferences {
        resume: "Senior backend engineer with eight years of Rust, Go and Python. ".repeat(2),
        instructions: "Avoid Java roles".to_string(),
        countries: vec!["Denmark".to_string()],
        titles: vec!["Backend Engineer".to_string()],
    }
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new(state: FakeState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    pub fn shared(self: &Arc<Self>) -> SharedBackend {
        self.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn unreachable() -> ApiError {
        ApiError::Status {
            status: 503,
            body: "backend unavailable".to_string(),
        }
    }

    fn profile_guard(&self) -> ApiResult<()> {
        if self.with(|s| s.profile_unreachable) {
            return Err(Self::unreachable());
        }
        Ok(())
    }
}

#[async_trait]
impl JobBackend for FakeBackend {
    async fn search_jobs(&self, query: &SearchQuery) -> ApiResult<Vec<Job>> {
        self.with(|s| {
            s.search_queries.push(query.clone());
            if s.fail_listing {
                return Err(Self::unreachable());
            }
            Ok(s.listing
                .iter()
                .skip(query.start as usize)
                .take(query.limit as usize)
                .cloned()
                .collect())
        })
    }

    async fn job_details(&self, job: &Job) -> ApiResult<Job> {
        let fail = self.with(|s| {
            s.detail_requests.push(job.linkedin_job_id.clone());
            s.fail_details
        });
        if fail {
            return Err(Self::unreachable());
        }
        let mut details = job.clone();
        details.description = Some(format!("Full description of {}", job.title));
        Ok(details)
    }

    async fn mark_applied(&self, linkedin_job_id: &str, applied: bool) -> ApiResult<()> {
        self.with(|s| {
            s.applied_posts.push((linkedin_job_id.to_string(), applied));
            for job in s
                .suggestions
                .iter_mut()
                .filter(|job| job.linkedin_job_id == linkedin_job_id)
            {
                job.applied = applied;
            }
        });
        Ok(())
    }

    async fn filtered_jobs(&self, query: &FilterQuery) -> ApiResult<Vec<Job>> {
        self.with(|s| {
            s.filter_queries.push(query.clone());
            if s.fail_listing {
                return Err(Self::unreachable());
            }
            Ok(s.suggestions
                .iter()
                .filter(|job| query.applied.map_or(true, |applied| job.applied == applied))
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .cloned()
                .collect())
        })
    }

    async fn trigger_analysis(&self) -> ApiResult<TriggerResponse> {
        let (reply, delay) = self.with(|s| {
            s.trigger_calls += 1;
            (s.trigger, s.trigger_delay)
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match reply {
            TriggerReply::Started => Ok(TriggerResponse {
                message: Some("Analysis started".to_string()),
                task_id: Some("task-1".to_string()),
            }),
            TriggerReply::Conflict => Err(ApiError::Conflict("already running".to_string())),
            TriggerReply::Fails => Err(ApiError::Status {
                status: 500,
                body: "queue down".to_string(),
            }),
        }
    }

    async fn analysis_status(&self) -> ApiResult<AnalysisStatus> {
        let reply = self.with(|s| {
            s.status_calls += 1;
            s.statuses
                .pop_front()
                .unwrap_or_else(|| StatusReply::State(s.fallback_status.clone()))
        });
        match reply {
            StatusReply::State(status) => Ok(AnalysisStatus {
                status,
                task_id: Some("task-1".to_string()),
                ..AnalysisStatus::default()
            }),
            StatusReply::Unreachable => Err(Self::unreachable()),
        }
    }

    async fn resume(&self) -> ApiResult<String> {
        self.profile_guard()?;
        Ok(self.with(|s| s.preferences.resume.clone()))
    }

    async fn save_resume(&self, resume: &str) -> ApiResult<()> {
        self.profile_guard()?;
        self.with(|s| {
            s.saves += 1;
            s.preferences.resume = resume.to_string();
        });
        Ok(())
    }

    async fn instructions(&self) -> ApiResult<String> {
        self.profile_guard()?;
        Ok(self.with(|s| s.preferences.instructions.clone()))
    }

    async fn save_instructions(&self, instructions: &str) -> ApiResult<()> {
        self.profile_guard()?;
        self.with(|s| {
            s.saves += 1;
            s.preferences.instructions = instructions.to_string();
        });
        Ok(())
    }

    async fn countries(&self) -> ApiResult<Vec<String>> {
        self.profile_guard()?;
        Ok(self.with(|s| s.preferences.countries.clone()))
    }

    async fn save_countries(&self, countries: &[String]) -> ApiResult<()> {
        self.profile_guard()?;
        self.with(|s| {
            s.saves += 1;
            s.preferences.countries = countries.to_vec();
        });
        Ok(())
    }

    async fn titles(&self) -> ApiResult<Vec<String>> {
        self.profile_guard()?;
        Ok(self.with(|s| s.preferences.titles.clone()))
    }

    async fn save_titles(&self, titles: &[String]) -> ApiResult<()> {
        self.profile_guard()?;
        self.with(|s| {
            s.saves += 1;
            s.preferences.titles = titles.to_vec();
        });
        Ok(())
    }
}
