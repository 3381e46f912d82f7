// src/web/mod.rs
//! Local JSON server mirroring the dashboard, suggestions and settings views

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::browser::{BrowserSnapshot, JobBrowser};
use crate::core::{AppConfig, ServiceClient, SharedBackend};
use crate::list_view::ApplyLink;
use crate::settings::{PreferencesStore, SettingsSnapshot};
use crate::suggestions::{StartOutcome, SuggestionController, SuggestionState};
use crate::types::{Job, Preferences};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

// ===== Dashboard =====

#[get("/dashboard")]
pub async fn get_dashboard(state: &State<AppState>) -> Json<DataResponse<BrowserSnapshot>> {
    handlers::get_dashboard_handler(state).await
}

#[post("/dashboard/search", data = "<request>")]
pub async fn search_jobs(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<BrowserSnapshot>>, ApiFailure> {
    handlers::search_handler(request, state).await
}

#[post("/dashboard/page/<number>")]
pub async fn dashboard_page(
    number: u32,
    state: &State<AppState>,
) -> Result<Json<DataResponse<BrowserSnapshot>>, ApiFailure> {
    handlers::dashboard_page_handler(number, state).await
}

#[post("/dashboard/select/<id>")]
pub async fn dashboard_select(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Job>>, ApiFailure> {
    handlers::dashboard_select_handler(id, state).await
}

#[post("/dashboard/apply/<id>")]
pub async fn dashboard_apply(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ApplyLink>>, ApiFailure> {
    handlers::dashboard_apply_handler(id, state).await
}

#[post("/dashboard/apply-confirmation", data = "<request>")]
pub async fn dashboard_confirm(
    request: Json<ConfirmRequest>,
    state: &State<AppState>,
) -> Json<DataResponse<BrowserSnapshot>> {
    handlers::dashboard_confirm_handler(request.confirmed, state).await
}

// ===== Suggestions =====

#[get("/suggestions")]
pub async fn get_suggestions(state: &State<AppState>) -> Json<DataResponse<SuggestionState>> {
    handlers::get_suggestions_handler(state).await
}

#[post("/suggestions/run")]
pub async fn run_suggestions(
    state: &State<AppState>,
) -> Result<Json<DataResponse<StartOutcome>>, ApiFailure> {
    handlers::run_suggestions_handler(state).await
}

#[post("/suggestions/dismiss")]
pub async fn dismiss_overlay(state: &State<AppState>) -> Json<DataResponse<SuggestionState>> {
    handlers::dismiss_overlay_handler(state).await
}

#[post("/suggestions/page/<number>")]
pub async fn suggestions_page(
    number: u32,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SuggestionState>>, ApiFailure> {
    handlers::suggestions_page_handler(number, state).await
}

#[post("/suggestions/filter", data = "<request>")]
pub async fn suggestions_filter(
    request: Json<FilterRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SuggestionState>>, ApiFailure> {
    handlers::suggestions_filter_handler(request, state).await
}

#[post("/suggestions/select/<id>")]
pub async fn suggestions_select(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Job>>, ApiFailure> {
    handlers::suggestions_select_handler(id, state).await
}

#[post("/suggestions/apply/<id>")]
pub async fn suggestions_apply(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ApplyLink>>, ApiFailure> {
    handlers::suggestions_apply_handler(id, state).await
}

#[post("/suggestions/apply-confirmation", data = "<request>")]
pub async fn suggestions_confirm(
    request: Json<ConfirmRequest>,
    state: &State<AppState>,
) -> Json<DataResponse<SuggestionState>> {
    handlers::suggestions_confirm_handler(request.confirmed, state).await
}

// ===== Settings =====

#[get("/settings")]
pub async fn get_settings(
    state: &State<AppState>,
) -> Result<Json<DataResponse<SettingsSnapshot>>, ApiFailure> {
    handlers::get_settings_handler(state).await
}

#[post("/settings", data = "<request>")]
pub async fn save_settings(
    request: Json<Preferences>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SettingsSnapshot>>, ApiFailure> {
    handlers::save_settings_handler(request, state).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    Json("OK")
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format",
        "BAD_REQUEST",
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be read",
        "UNPROCESSABLE_ENTITY",
        vec!["Verify all required fields are present".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error",
        "INTERNAL_ERROR",
        vec!["Try again in a few moments".to_string()],
    ))
}

impl AppState {
    pub fn new(backend: SharedBackend, config: &AppConfig) -> Self {
        Self {
            suggestions: SuggestionController::new(backend.clone(), config.controller_settings()),
            browser: Mutex::new(JobBrowser::new(backend.clone(), config.page_size)),
            settings: Mutex::new(PreferencesStore::new(backend)),
        }
    }
}

pub fn build_rocket(state: AppState, figment: rocket::figment::Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register("/api", catchers![bad_request, unprocessable, internal_error])
        .mount(
            "/api",
            routes![
                get_dashboard,
                search_jobs,
                dashboard_page,
                dashboard_select,
                dashboard_apply,
                dashboard_confirm,
                get_suggestions,
                run_suggestions,
                dismiss_overlay,
                suggestions_page,
                suggestions_filter,
                suggestions_select,
                suggestions_apply,
                suggestions_confirm,
                get_settings,
                save_settings,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let client = ServiceClient::new(config.api_base_url.clone(), config.request_timeout_secs)?;
    let backend: SharedBackend = Arc::new(client);
    let state = AppState::new(backend, &config);

    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", config.server_port));

    info!("Starting job-scout local server");
    info!("Backend: {}", config.api_base_url);
    info!("Server: http://127.0.0.1:{}", config.server_port);

    build_rocket(state, figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_view::sample_job;
    use crate::testing::{FakeBackend, FakeState};
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use rocket::serde::json::Value;

    async fn client_with(state: FakeState) -> (Arc<FakeBackend>, Client) {
        let backend = FakeBackend::new(state);
        let app = AppState::new(backend.shared(), &AppConfig::default());
        let rocket = build_rocket(app, rocket::Config::figment());
        let client = Client::tracked(rocket).await.unwrap();
        (backend, client)
    }

    #[rocket::async_test]
    async fn test_health() {
        let (_, client) = client_with(FakeState::default()).await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
    }

    #[rocket::async_test]
    async fn test_run_with_missing_fields_is_rejected() {
        let mut state = FakeState::default();
        state.preferences.titles.clear();
        let (backend, client) = client_with(state).await;

        let response = client.post("/api/suggestions/run").dispatch().await;
        assert_eq!(response.status(), Status::UnprocessableEntity);

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "MISSING_PROFILE_FIELDS");
        assert_eq!(body["suggestions"][0], "Add your Job Titles in Settings");
        backend.with(|s| assert_eq!(s.trigger_calls, 0));
    }

    #[rocket::async_test]
    async fn test_run_starts_and_dismiss_hides_overlay() {
        let (backend, client) = client_with(FakeState::default()).await;

        let response = client.post("/api/suggestions/run").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["outcome"], "started");

        let response = client.post("/api/suggestions/dismiss").dispatch().await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["analyzing"], true);
        assert_eq!(body["data"]["overlay_visible"], false);
        assert_eq!(body["data"]["dismissed"], true);
        backend.with(|s| assert_eq!(s.trigger_calls, 1));
    }

    #[rocket::async_test]
    async fn test_dashboard_search_and_apply_flow() {
        let (backend, client) = client_with(FakeState {
            listing: vec![sample_job("11"), sample_job("12")],
            ..FakeState::default()
        })
        .await;

        let response = client
            .post("/api/dashboard/search")
            .header(ContentType::JSON)
            .body(r#"{"keywords":"Python","location":"Denmark"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["view"]["jobs"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["view"]["has_next"], false);

        let response = client.post("/api/dashboard/apply/12").dispatch().await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["needs_confirmation"], true);

        let response = client
            .post("/api/dashboard/apply-confirmation")
            .header(ContentType::JSON)
            .body(r#"{"confirmed":true}"#)
            .dispatch()
            .await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["message"], "Marked as applied");
        assert_eq!(body["data"]["view"]["jobs"][1]["applied"], true);
        backend.with(|s| assert_eq!(s.applied_posts, vec![("12".to_string(), true)]));
    }

    #[rocket::async_test]
    async fn test_failed_detail_fetch_is_reported() {
        let (backend, client) = client_with(FakeState {
            listing: vec![sample_job("11")],
            fail_details: true,
            ..FakeState::default()
        })
        .await;

        client
            .post("/api/dashboard/search")
            .header(ContentType::JSON)
            .body(r#"{"keywords":"Rust","location":"Italy"}"#)
            .dispatch()
            .await;

        let response = client.post("/api/dashboard/select/11").dispatch().await;
        assert_eq!(response.status(), Status::BadGateway);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "JOB_DETAILS_FAILED");

        backend.with(|s| s.fail_details = false);
        let response = client.post("/api/dashboard/select/11").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["description"], "Full description of Job 11");
    }

    #[rocket::async_test]
    async fn test_unknown_job_is_not_found() {
        let (_, client) = client_with(FakeState::default()).await;
        let response = client.post("/api/suggestions/select/nope").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_settings_round_trip_through_server() {
        let (backend, client) = client_with(FakeState::default()).await;

        let response = client.get("/api/settings").dispatch().await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["preferences"]["countries"][0], "Denmark");
        assert_eq!(body["data"]["offered_countries"].as_array().unwrap().len(), 4);

        let response = client
            .post("/api/settings")
            .header(ContentType::JSON)
            .body(
                r#"{"resume":"r","instructions":"i","countries":["Italy"],"titles":["SRE"]}"#,
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        backend.with(|s| {
            assert_eq!(s.saves, 4);
            assert_eq!(s.preferences.countries, vec!["Italy".to_string()]);
        });
    }
}
