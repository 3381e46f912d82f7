// src/web/handlers/dashboard_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use super::suggestion_handlers::job_not_found;
use crate::browser::{BrowserSnapshot, JobBrowser};
use crate::list_view::ApplyLink;
use crate::types::Job;
use crate::web::types::{failure, ApiFailure, AppState, DataResponse, SearchRequest};

pub async fn get_dashboard_handler(state: &State<AppState>) -> Json<DataResponse<BrowserSnapshot>> {
    let browser = state.browser.lock().await;
    Json(DataResponse::success("Dashboard", browser.snapshot()))
}

pub async fn search_handler(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<BrowserSnapshot>>, ApiFailure> {
    let mut browser = state.browser.lock().await;
    let ok = browser.search(&request.keywords, &request.location).await;
    respond(&browser, ok, "Search complete")
}

pub async fn dashboard_page_handler(
    number: u32,
    state: &State<AppState>,
) -> Result<Json<DataResponse<BrowserSnapshot>>, ApiFailure> {
    let mut browser = state.browser.lock().await;
    let ok = browser.goto_page(number).await;
    respond(&browser, ok, &format!("Page {}", number))
}

fn respond(
    browser: &JobBrowser,
    ok: bool,
    message: &str,
) -> Result<Json<DataResponse<BrowserSnapshot>>, ApiFailure> {
    if ok {
        return Ok(Json(DataResponse::success(message, browser.snapshot())));
    }
    Err(failure(
        Status::BadGateway,
        browser.last_error().unwrap_or("Error fetching jobs"),
        "JOB_SEARCH_FAILED",
        vec![
            "Check the keywords and location".to_string(),
            "Try again in a few moments".to_string(),
        ],
    ))
}

pub async fn dashboard_select_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Job>>, ApiFailure> {
    let mut browser = state.browser.lock().await;
    let job = browser
        .select(id)
        .await
        .cloned()
        .ok_or_else(|| job_not_found(id))?;

    if let Some(e) = browser.last_error() {
        return Err(failure(
            Status::BadGateway,
            e,
            "JOB_DETAILS_FAILED",
            vec!["Try selecting the job again".to_string()],
        ));
    }
    Ok(Json(DataResponse::success("Selected", job)))
}

pub async fn dashboard_apply_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ApplyLink>>, ApiFailure> {
    let mut browser = state.browser.lock().await;
    browser
        .open_apply_link(id)
        .map(|link| Json(DataResponse::success("Open apply link", link)))
        .ok_or_else(|| job_not_found(id))
}

pub async fn dashboard_confirm_handler(
    confirmed: bool,
    state: &State<AppState>,
) -> Json<DataResponse<BrowserSnapshot>> {
    let mut browser = state.browser.lock().await;
    let updated = browser.confirm_applied(confirmed).await;
    let message = if updated {
        "Marked as applied"
    } else {
        "No change"
    };
    Json(DataResponse::success(message, browser.snapshot()))
}
