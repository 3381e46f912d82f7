// src/web/handlers/suggestion_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::error::StartError;
use crate::list_view::ApplyLink;
use crate::suggestions::{StartOutcome, SuggestionState};
use crate::types::Job;
use crate::web::types::{failure, ApiFailure, AppState, DataResponse, FilterRequest};

pub async fn get_suggestions_handler(state: &State<AppState>) -> Json<DataResponse<SuggestionState>> {
    Json(DataResponse::success(
        "Suggestions",
        state.suggestions.snapshot(),
    ))
}

pub async fn run_suggestions_handler(
    state: &State<AppState>,
) -> Result<Json<DataResponse<StartOutcome>>, ApiFailure> {
    match state.suggestions.start().await {
        Ok(outcome) => {
            info!("Scouting requested: {:?}", outcome);
            Ok(Json(DataResponse::success("Scouting matches", outcome)))
        }
        Err(StartError::MissingFields(fields)) => {
            let hints = fields
                .iter()
                .map(|field| format!("Add your {} in Settings", field.label()))
                .collect();
            Err(failure(
                Status::UnprocessableEntity,
                StartError::MissingFields(fields).to_string(),
                "MISSING_PROFILE_FIELDS",
                hints,
            ))
        }
        Err(e @ StartError::Validation(_)) => {
            warn!("Profile validation failed: {}", e);
            Err(failure(
                Status::BadGateway,
                e.to_string(),
                "VALIDATION_ERROR",
                vec!["Check that the backend is reachable".to_string()],
            ))
        }
        Err(e @ StartError::Trigger(_)) => Err(failure(
            Status::BadGateway,
            e.to_string(),
            "ANALYSIS_START_FAILED",
            vec!["Try again in a few moments".to_string()],
        )),
    }
}

pub async fn dismiss_overlay_handler(state: &State<AppState>) -> Json<DataResponse<SuggestionState>> {
    state.suggestions.dismiss_overlay();
    Json(DataResponse::success(
        "Browsing while the agent works",
        state.suggestions.snapshot(),
    ))
}

pub async fn suggestions_page_handler(
    number: u32,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SuggestionState>>, ApiFailure> {
    if state.suggestions.load_page(number).await {
        Ok(Json(DataResponse::success(
            format!("Page {}", number),
            state.suggestions.snapshot(),
        )))
    } else {
        Err(list_failure(state))
    }
}

pub async fn suggestions_filter_handler(
    request: Json<FilterRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SuggestionState>>, ApiFailure> {
    if state.suggestions.set_filter(request.filter).await {
        Ok(Json(DataResponse::success(
            "Filter applied",
            state.suggestions.snapshot(),
        )))
    } else {
        Err(list_failure(state))
    }
}

fn list_failure(state: &State<AppState>) -> ApiFailure {
    let error = state
        .suggestions
        .snapshot()
        .last_error
        .unwrap_or_else(|| "Failed to fetch suggestions".to_string());
    failure(
        Status::BadGateway,
        error,
        "LIST_FETCH_FAILED",
        vec!["Try again in a few moments".to_string()],
    )
}

pub async fn suggestions_select_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Job>>, ApiFailure> {
    state
        .suggestions
        .select(id)
        .map(|job| Json(DataResponse::success("Selected", job)))
        .ok_or_else(|| job_not_found(id))
}

pub async fn suggestions_apply_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ApplyLink>>, ApiFailure> {
    state
        .suggestions
        .open_apply_link(id)
        .map(|link| Json(DataResponse::success("Open apply link", link)))
        .ok_or_else(|| job_not_found(id))
}

pub async fn suggestions_confirm_handler(
    confirmed: bool,
    state: &State<AppState>,
) -> Json<DataResponse<SuggestionState>> {
    let updated = state.suggestions.confirm_applied(confirmed).await;
    let message = if updated {
        "Marked as applied"
    } else {
        "No change"
    };
    Json(DataResponse::success(message, state.suggestions.snapshot()))
}

pub(crate) fn job_not_found(id: &str) -> ApiFailure {
    failure(
        Status::NotFound,
        format!("Job {} is not in the current list", id),
        "JOB_NOT_FOUND",
        vec!["Refresh the list and try again".to_string()],
    )
}
