// src/suggestions/poller.rs
//! Status polling loop and list reconciliation for a scouting run

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::state::{RunOutcome, SuggestionState};
use crate::core::JobBackend;
use crate::list_view::Page;
use crate::types::{AnalysisState, FilterQuery};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
    pub completion_grace: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 200,
            completion_grace: Duration::from_millis(2000),
        }
    }
}

/// Poll until the run leaves the running state or the attempt ceiling is hit.
///
/// Each tick awaits its request before waiting for the next one, so requests
/// never overlap. A failed request still uses up an attempt.
pub(crate) async fn poll_until_settled(
    backend: &dyn JobBackend,
    state: &watch::Sender<SuggestionState>,
    settings: &PollSettings,
) -> RunOutcome {
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    for attempt in 1..=settings.max_attempts {
        ticker.tick().await;
        state.send_modify(|s| s.attempts = attempt);

        match backend.analysis_status().await {
            Ok(status) => {
                debug!("Poll {}: analysis status {}", attempt, status.status);
                let current = status.status.clone();
                state.send_modify(|s| s.status = status);

                match current {
                    AnalysisState::Running => continue,
                    AnalysisState::Completed | AnalysisState::Idle => {
                        return RunOutcome::Completed
                    }
                    AnalysisState::Failed | AnalysisState::Unknown(_) => {
                        return RunOutcome::Failed
                    }
                }
            }
            Err(e) => {
                warn!("Poll {} failed, will retry on next tick: {}", attempt, e);
            }
        }
    }

    warn!(
        "Analysis still running after {} polls, giving up",
        settings.max_attempts
    );
    RunOutcome::TimedOut
}

/// Replace the cached list with the given page under the current filter
pub(crate) async fn refresh_list(
    backend: &dyn JobBackend,
    state: &watch::Sender<SuggestionState>,
    page: Page,
) -> bool {
    let filter = state.borrow().filter;
    let query = FilterQuery {
        limit: page.size,
        offset: page.offset(),
        applied: filter.as_query(),
    };

    match backend.filtered_jobs(&query).await {
        Ok(jobs) => {
            debug!("Fetched {} suggestions (page {})", jobs.len(), page.number);
            state.send_modify(|s| s.list.replace(page, jobs));
            true
        }
        Err(e) => {
            error!("Failed to fetch suggestions: {}", e);
            state.send_modify(|s| s.last_error = Some(format!("Failed to fetch suggestions: {}", e)));
            false
        }
    }
}

/// Body of the spawned polling task: poll, reconcile, then settle the overlay
pub(crate) async fn run_to_completion(
    backend: &dyn JobBackend,
    state: &watch::Sender<SuggestionState>,
    settings: &PollSettings,
) {
    let outcome = poll_until_settled(backend, state, settings).await;

    let first_page = Page::first(state.borrow().list.page.size);
    refresh_list(backend, state, first_page).await;

    let mut show_complete = false;
    state.send_modify(|s| show_complete = s.finish(outcome));
    info!("Analysis run finished: {:?}", outcome);

    if show_complete {
        tokio::time::sleep(settings.completion_grace).await;
        state.send_modify(|s| s.hide_overlay());
    }
}
