// src/suggestions/controller.rs
//! Drives one scouting run at a time and keeps the suggestion list in sync

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::poller::{self, PollSettings};
use super::preconditions::missing_profile_fields;
use super::state::SuggestionState;
use crate::core::SharedBackend;
use crate::error::StartError;
use crate::list_view::{ApplyLink, Page};
use crate::types::{AppliedFilter, Job};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartOutcome {
    /// The backend accepted a new run
    Started { task_id: Option<String> },
    /// The backend already had a run in progress; polling that one
    Attached,
    /// This controller is already polling a run
    AlreadyPolling,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub poll: PollSettings,
    pub min_resume_chars: usize,
    pub page_size: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll: PollSettings::default(),
            min_resume_chars: 50,
            page_size: 10,
        }
    }
}

pub struct SuggestionController {
    backend: SharedBackend,
    settings: ControllerSettings,
    state: Arc<watch::Sender<SuggestionState>>,
    task: Mutex<Option<JoinHandle<()>>>,
    start_gate: tokio::sync::Mutex<()>,
}

impl SuggestionController {
    pub fn new(backend: SharedBackend, settings: ControllerSettings) -> Self {
        let (state, _) = watch::channel(SuggestionState::new(settings.page_size));
        Self {
            backend,
            settings,
            state: Arc::new(state),
            task: Mutex::new(None),
            start_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.state.borrow().analyzing
    }

    /// Start a scouting run, or attach to the one already in progress
    pub async fn start(&self) -> Result<StartOutcome, StartError> {
        let _gate = self.start_gate.lock().await;

        if self.is_polling() {
            info!("Analysis already being polled, re-showing progress");
            self.state.send_modify(|s| s.show_overlay());
            return Ok(StartOutcome::AlreadyPolling);
        }

        let missing =
            missing_profile_fields(self.backend.as_ref(), self.settings.min_resume_chars)
                .await
                .map_err(|e| {
                    error!("Failed to validate profile before analysis: {}", e);
                    StartError::Validation(e)
                })?;

        if !missing.is_empty() {
            warn!("Refusing to start analysis, missing: {:?}", missing);
            return Err(StartError::MissingFields(missing));
        }

        // A pending grace-period hide belongs to the previous run
        self.abort_task();
        self.state.send_modify(|s| s.begin_run());

        let outcome = match self.backend.trigger_analysis().await {
            Ok(response) => {
                info!("Analysis started (task {:?})", response.task_id);
                StartOutcome::Started {
                    task_id: response.task_id,
                }
            }
            Err(e) if e.is_conflict() => {
                info!("Analysis already running on the backend, attaching");
                StartOutcome::Attached
            }
            Err(e) => {
                error!("Failed to start analysis: {}", e);
                self.state
                    .send_modify(|s| s.abort_run(format!("Failed to start analysis: {}", e)));
                return Err(StartError::Trigger(e));
            }
        };

        // shutdown() may have run while the trigger request was in flight
        if !self.is_polling() {
            info!("Controller shut down during start, not polling");
            return Ok(outcome);
        }

        self.spawn_poll();
        Ok(outcome)
    }

    fn spawn_poll(&self) {
        let backend = self.backend.clone();
        let state = self.state.clone();
        let settings = self.settings.poll.clone();

        let handle = tokio::spawn(async move {
            poller::run_to_completion(backend.as_ref(), &state, &settings).await;
        });

        *self.task_slot() = Some(handle);
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn abort_task(&self) {
        if let Some(handle) = self.task_slot().take() {
            handle.abort();
        }
    }

    /// Hide the overlay; the run keeps going in the background
    pub fn dismiss_overlay(&self) {
        self.state.send_modify(|s| s.dismiss());
    }

    /// Wait until the run has ended and the overlay is gone
    pub async fn wait_until_settled(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| !s.analyzing && !s.overlay_visible).await;
    }

    /// Cancel any polling task, e.g. when the view goes away
    pub fn shutdown(&self) {
        self.abort_task();
        self.state.send_modify(|s| s.teardown());
    }

    // ===== List browsing =====

    pub async fn load_page(&self, number: u32) -> bool {
        let page = Page::nth(number, self.settings.page_size);
        poller::refresh_list(self.backend.as_ref(), &self.state, page).await
    }

    pub async fn next_page(&self) -> bool {
        let (has_next, page) = {
            let state = self.state.borrow();
            (state.list.has_next, state.list.page)
        };
        if !has_next {
            return false;
        }
        self.load_page(page.next().number).await
    }

    pub async fn prev_page(&self) -> bool {
        let page = self.state.borrow().list.page;
        if page.number <= 1 {
            return false;
        }
        self.load_page(page.previous().number).await
    }

    pub async fn set_filter(&self, filter: AppliedFilter) -> bool {
        self.state.send_modify(|s| s.filter = filter);
        self.load_page(1).await
    }

    pub fn select(&self, linkedin_job_id: &str) -> Option<Job> {
        let mut selected = None;
        self.state
            .send_modify(|s| selected = s.list.select(linkedin_job_id).cloned());
        selected
    }

    // ===== Applied confirmation =====

    pub fn open_apply_link(&self, linkedin_job_id: &str) -> Option<ApplyLink> {
        let mut link = None;
        self.state
            .send_modify(|s| link = s.list.open_apply_link(linkedin_job_id));
        link
    }

    /// Answer the "did you apply?" prompt. Only "yes" reaches the backend.
    pub async fn confirm_applied(&self, confirmed: bool) -> bool {
        let mut pending = None;
        self.state
            .send_modify(|s| pending = s.list.take_pending_apply());

        let Some(linkedin_job_id) = pending else {
            return false;
        };
        if !confirmed {
            return false;
        }

        match self.backend.mark_applied(&linkedin_job_id, true).await {
            Ok(()) => {
                info!("Marked job {} as applied", linkedin_job_id);
                self.state
                    .send_modify(|s| s.list.mark_applied(&linkedin_job_id));
                true
            }
            Err(e) => {
                error!("Failed to mark job {} as applied: {}", linkedin_job_id, e);
                self.state.send_modify(|s| {
                    s.last_error = Some(format!("Failed to mark job as applied: {}", e))
                });
                false
            }
        }
    }
}

impl Drop for SuggestionController {
    fn drop(&mut self) {
        let slot = match self.task.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
