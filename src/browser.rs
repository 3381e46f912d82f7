// src/browser.rs
//! Dashboard: keyword/location search, paging and job details

use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::SharedBackend;
use crate::list_view::{ApplyLink, JobListView, Page};
use crate::types::{Job, SearchQuery};

#[derive(Debug, Clone, Serialize)]
pub struct BrowserSnapshot {
    pub keywords: String,
    pub location: String,
    pub view: JobListView,
    pub has_previous: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

pub struct JobBrowser {
    backend: SharedBackend,
    query: SearchQuery,
    view: JobListView,
    loading: bool,
    last_error: Option<String>,
}

impl JobBrowser {
    pub fn new(backend: SharedBackend, page_size: u32) -> Self {
        let query = SearchQuery::new("", "", page_size);
        let view = JobListView::new(query.limit);
        Self {
            backend,
            query,
            view,
            loading: false,
            last_error: None,
        }
    }

    pub fn view(&self) -> &JobListView {
        &self.view
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        BrowserSnapshot {
            keywords: self.query.keywords.clone(),
            location: self.query.location.clone(),
            view: self.view.clone(),
            has_previous: self.view.has_previous(),
            loading: self.loading,
            last_error: self.last_error.clone(),
        }
    }

    /// New search, starting from the first page
    pub async fn search(&mut self, keywords: &str, location: &str) -> bool {
        self.query.keywords = keywords.trim().to_string();
        self.query.location = location.trim().to_string();
        self.view.clear();
        self.goto_page(1).await
    }

    pub async fn goto_page(&mut self, number: u32) -> bool {
        let page = Page::nth(number, self.query.limit);
        let mut query = self.query.clone();
        query.start = page.offset();

        self.loading = true;
        self.last_error = None;
        let result = self.backend.search_jobs(&query).await;
        self.loading = false;

        match result {
            Ok(jobs) => {
                info!(
                    "Fetched {} jobs for '{}' in '{}' (page {})",
                    jobs.len(),
                    query.keywords,
                    query.location,
                    page.number
                );
                self.query.start = query.start;
                self.view.replace(page, jobs);
                true
            }
            Err(e) => {
                error!("Error fetching jobs: {}", e);
                self.last_error = Some(format!("Error fetching jobs: {}", e));
                false
            }
        }
    }

    /// No-op when the current page came back short
    pub async fn next_page(&mut self) -> bool {
        if !self.view.has_next {
            return false;
        }
        self.goto_page(self.view.page.next().number).await
    }

    pub async fn prev_page(&mut self) -> bool {
        if !self.view.has_previous() {
            return false;
        }
        self.goto_page(self.view.page.previous().number).await
    }

    /// Select a job and fetch its full description
    /// Select a listed job and fetch its description. A failed fetch keeps the
    /// listing copy selected and records `last_error`.
    pub async fn select(&mut self, linkedin_job_id: &str) -> Option<&Job> {
        self.last_error = None;
        let job = self.view.select(linkedin_job_id)?.clone();

        match self.backend.job_details(&job).await {
            Ok(details) => self.view.set_selected_details(details),
            Err(e) => {
                warn!("Failed to fetch details for {}: {}", linkedin_job_id, e);
                self.last_error = Some(format!("Failed to load job details: {}", e));
            }
        }

        self.view.selected.as_ref()
    }

    pub fn open_apply_link(&mut self, linkedin_job_id: &str) -> Option<ApplyLink> {
        self.view.open_apply_link(linkedin_job_id)
    }

    /// Answer the "did you apply?" prompt. Only "yes" reaches the backend.
    pub async fn confirm_applied(&mut self, confirmed: bool) -> bool {
        let Some(linkedin_job_id) = self.view.take_pending_apply() else {
            return false;
        };
        if !confirmed {
            return false;
        }

        match self.backend.mark_applied(&linkedin_job_id, true).await {
            Ok(()) => {
                info!("Marked job {} as applied", linkedin_job_id);
                self.view.mark_applied(&linkedin_job_id);
                true
            }
            Err(e) => {
                error!("Failed to mark job {} as applied: {}", linkedin_job_id, e);
                self.last_error = Some(format!("Failed to mark job as applied: {}", e));
                false
            }
        }
    }
}
