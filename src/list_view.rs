// src/list_view.rs
//! Paged job list with selection and the "did you apply?" prompt

use serde::{Deserialize, Serialize};

use crate::types::Job;

/// One-based page cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn first(size: u32) -> Self {
        Self {
            number: 1,
            size: size.max(1),
        }
    }

    pub fn nth(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> u32 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn next(&self) -> Self {
        Self::nth(self.number.saturating_add(1), self.size)
    }

    pub fn previous(&self) -> Self {
        Self::nth(self.number.saturating_sub(1), self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyLink {
    pub url: String,
    /// True when the user should be asked whether they applied
    pub needs_confirmation: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobListView {
    pub jobs: Vec<Job>,
    pub page: Page,
    pub has_next: bool,
    pub selected: Option<Job>,
    /// `linkedin_job_id` awaiting an applied confirmation
    pub pending_apply: Option<String>,
}

impl JobListView {
    pub fn new(page_size: u32) -> Self {
        Self {
            jobs: Vec::new(),
            page: Page::first(page_size),
            has_next: false,
            selected: None,
            pending_apply: None,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page.number > 1
    }

    /// Replace the cached page. Selection survives when the same id is in the new list.
    pub fn replace(&mut self, page: Page, jobs: Vec<Job>) {
        self.has_next = jobs.len() as u32 >= page.size;
        self.page = page;
        self.jobs = jobs;

        if let Some(previous) = self.selected.take() {
            self.selected = self
                .jobs
                .iter()
                .find(|job| job.linkedin_job_id == previous.linkedin_job_id)
                .cloned()
                .map(|mut fresh| {
                    if fresh.description.is_none() {
                        fresh.description = previous.description;
                    }
                    fresh
                });
        }
    }

    pub fn clear(&mut self) {
        let size = self.page.size;
        *self = Self::new(size);
    }

    pub fn find(&self, linkedin_job_id: &str) -> Option<&Job> {
        self.jobs
            .iter()
            .find(|job| job.linkedin_job_id == linkedin_job_id)
    }

    pub fn select(&mut self, linkedin_job_id: &str) -> Option<&Job> {
        let job = self.find(linkedin_job_id)?.clone();
        self.selected = Some(job);
        self.selected.as_ref()
    }

    /// Store a detailed copy as the selection and refresh the list entry's description
    pub fn set_selected_details(&mut self, details: Job) {
        if let Some(entry) = self
            .jobs
            .iter_mut()
            .find(|job| job.linkedin_job_id == details.linkedin_job_id)
        {
            if details.description.is_some() {
                entry.description = details.description.clone();
            }
        }
        self.selected = Some(details);
    }

    pub fn open_apply_link(&mut self, linkedin_job_id: &str) -> Option<ApplyLink> {
        let job = self.find(linkedin_job_id).or_else(|| {
            self.selected
                .as_ref()
                .filter(|job| job.linkedin_job_id == linkedin_job_id)
        })?;

        let link = ApplyLink {
            url: job.url.clone(),
            needs_confirmation: !job.applied,
        };

        if link.needs_confirmation {
            self.pending_apply = Some(linkedin_job_id.to_string());
        }

        Some(link)
    }

    pub fn take_pending_apply(&mut self) -> Option<String> {
        self.pending_apply.take()
    }

    pub fn mark_applied(&mut self, linkedin_job_id: &str) {
        for job in self
            .jobs
            .iter_mut()
            .filter(|job| job.linkedin_job_id == linkedin_job_id)
        {
            job.applied = true;
        }

        if let Some(selected) = self
            .selected
            .as_mut()
            .filter(|job| job.linkedin_job_id == linkedin_job_id)
        {
            selected.applied = true;
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_job(id: &str) -> Job {
    Job {
        id: None,
        linkedin_job_id: id.to_string(),
        title: format!("Job {}", id),
        company: Some("Acme".to_string()),
        location: Some("Copenhagen".to_string()),
        url: format!("https://example.com/jobs/{}", id),
        description: None,
        relevant: false,
        relevancy_reason: None,
        applied: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs(ids: &[&str]) -> Vec<Job> {
        ids.iter().map(|id| sample_job(id)).collect()
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::nth(1, 10).offset(), 0);
        assert_eq!(Page::nth(3, 10).offset(), 20);
        assert_eq!(Page::nth(0, 10).number, 1);
        assert_eq!(Page::first(10).previous().number, 1);
    }

    #[test]
    fn test_short_page_disables_next() {
        let mut view = JobListView::new(3);
        view.replace(Page::first(3), jobs(&["a", "b", "c"]));
        assert!(view.has_next);
        assert!(!view.has_previous());

        view.replace(Page::nth(2, 3), jobs(&["d"]));
        assert!(!view.has_next);
        assert!(view.has_previous());
    }

    #[test]
    fn test_selection_survives_refetch_by_id() {
        let mut view = JobListView::new(10);
        view.replace(Page::first(10), jobs(&["a", "b"]));
        view.select("b");

        let mut fresh = jobs(&["b", "c"]);
        fresh[0].relevancy_reason = Some("Strong Rust match".to_string());
        view.replace(Page::first(10), fresh);

        let selected = view.selected.as_ref().unwrap();
        assert_eq!(selected.linkedin_job_id, "b");
        assert_eq!(selected.relevancy_reason.as_deref(), Some("Strong Rust match"));
    }

    #[test]
    fn test_selection_cleared_when_missing_from_refetch() {
        let mut view = JobListView::new(10);
        view.replace(Page::first(10), jobs(&["a"]));
        view.select("a");
        view.replace(Page::first(10), jobs(&["z"]));
        assert!(view.selected.is_none());
    }

    #[test]
    fn test_details_kept_when_refetch_has_no_description() {
        let mut view = JobListView::new(10);
        view.replace(Page::first(10), jobs(&["a"]));
        let mut details = sample_job("a");
        details.description = Some("Full text".to_string());
        view.set_selected_details(details);
        assert_eq!(view.jobs[0].description.as_deref(), Some("Full text"));

        view.replace(Page::first(10), jobs(&["a"]));
        assert_eq!(
            view.selected.unwrap().description.as_deref(),
            Some("Full text")
        );
    }

    #[test]
    fn test_apply_link_prompts_only_when_not_applied() {
        let mut view = JobListView::new(10);
        let mut list = jobs(&["a", "b"]);
        list[1].applied = true;
        view.replace(Page::first(10), list);

        let link = view.open_apply_link("a").unwrap();
        assert!(link.needs_confirmation);
        assert_eq!(view.pending_apply.as_deref(), Some("a"));

        view.take_pending_apply();
        let link = view.open_apply_link("b").unwrap();
        assert!(!link.needs_confirmation);
        assert!(view.pending_apply.is_none());

        assert!(view.open_apply_link("missing").is_none());
    }

    #[test]
    fn test_mark_applied_updates_list_and_selection() {
        let mut view = JobListView::new(10);
        view.replace(Page::first(10), jobs(&["a", "b"]));
        view.select("a");
        view.mark_applied("a");

        assert!(view.jobs[0].applied);
        assert!(!view.jobs[1].applied);
        assert!(view.selected.unwrap().applied);
    }
}
