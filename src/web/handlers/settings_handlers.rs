// src/web/handlers/settings_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::settings::SettingsSnapshot;
use crate::types::Preferences;
use crate::web::types::{failure, ApiFailure, AppState, DataResponse};

pub async fn get_settings_handler(
    state: &State<AppState>,
) -> Result<Json<DataResponse<SettingsSnapshot>>, ApiFailure> {
    let mut settings = state.settings.lock().await;
    if !settings.load().await {
        return Err(failure(
            Status::BadGateway,
            "Failed to load settings",
            "SETTINGS_LOAD_FAILED",
            vec!["Check that the backend is reachable".to_string()],
        ));
    }
    Ok(Json(DataResponse::success("Settings", settings.snapshot())))
}

pub async fn save_settings_handler(
    request: Json<Preferences>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SettingsSnapshot>>, ApiFailure> {
    let mut settings = state.settings.lock().await;
    settings.replace(request.into_inner());

    if !settings.save().await {
        return Err(failure(
            Status::BadGateway,
            "Failed to save settings",
            "SETTINGS_SAVE_FAILED",
            vec!["Try again in a few moments".to_string()],
        ));
    }

    info!("Settings updated through the local server");
    Ok(Json(DataResponse::success(
        "Settings saved successfully",
        settings.snapshot(),
    )))
}
