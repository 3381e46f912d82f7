// src/suggestions/state.rs
use serde::Serialize;

use crate::list_view::JobListView;
use crate::types::{AnalysisStatus, AppliedFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayMessage {
    Scouting,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Failed,
    TimedOut,
}

/// Everything the suggestions view renders.
///
/// `analyzing` tracks the backend run and `overlay_visible` tracks the progress
/// overlay. They are set together on start but diverge once the user dismisses
/// the overlay, so neither is ever computed from the other.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionState {
    pub analyzing: bool,
    pub overlay_visible: bool,
    pub dismissed: bool,
    pub overlay_message: OverlayMessage,
    pub status: AnalysisStatus,
    pub attempts: u32,
    pub last_outcome: Option<RunOutcome>,
    pub last_error: Option<String>,
    pub filter: AppliedFilter,
    pub list: JobListView,
}

impl SuggestionState {
    pub fn new(page_size: u32) -> Self {
        Self {
            analyzing: false,
            overlay_visible: false,
            dismissed: false,
            overlay_message: OverlayMessage::Scouting,
            status: AnalysisStatus::default(),
            attempts: 0,
            last_outcome: None,
            last_error: None,
            filter: AppliedFilter::default(),
            list: JobListView::new(page_size),
        }
    }

    pub(crate) fn show_overlay(&mut self) {
        self.overlay_visible = true;
        self.dismissed = false;
        self.overlay_message = OverlayMessage::Scouting;
    }

    pub(crate) fn begin_run(&mut self) {
        self.show_overlay();
        self.analyzing = true;
        self.status = AnalysisStatus::running();
        self.attempts = 0;
        self.last_outcome = None;
        self.last_error = None;
    }

    pub(crate) fn abort_run(&mut self, error: String) {
        self.teardown();
        self.last_error = Some(error);
    }

    /// Leave the run without an outcome; the status no longer reads as running
    pub(crate) fn teardown(&mut self) {
        if self.status.status.is_running() {
            self.status = AnalysisStatus::default();
        }
        self.analyzing = false;
        self.overlay_visible = false;
        self.dismissed = false;
    }

    pub(crate) fn dismiss(&mut self) {
        self.dismissed = true;
        self.overlay_visible = false;
    }

    /// Record the end of a run. Returns true when the "complete" overlay is
    /// showing and should be hidden after the grace period.
    pub(crate) fn finish(&mut self, outcome: RunOutcome) -> bool {
        self.analyzing = false;
        self.last_outcome = Some(outcome);

        let show_complete =
            outcome == RunOutcome::Completed && self.overlay_visible && !self.dismissed;

        if show_complete {
            self.overlay_message = OverlayMessage::Complete;
        } else {
            self.overlay_visible = false;
        }

        self.dismissed = false;
        show_complete
    }

    pub(crate) fn hide_overlay(&mut self) {
        self.overlay_visible = false;
        self.overlay_message = OverlayMessage::Scouting;
    }
}
