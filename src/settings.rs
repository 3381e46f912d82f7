// src/settings.rs
//! Resume, instructions and search preferences

use serde::Serialize;
use tracing::{error, info};

use crate::core::{JobBackend, SharedBackend};
use crate::error::ApiResult;
use crate::types::preferences::{MAX_JOB_TITLES, OFFERED_COUNTRIES};
use crate::types::Preferences;

/// Load all four profile fields concurrently
pub async fn fetch_preferences(backend: &dyn JobBackend) -> ApiResult<Preferences> {
    let (resume, instructions, countries, titles) = tokio::try_join!(
        backend.resume(),
        backend.instructions(),
        backend.countries(),
        backend.titles()
    )?;

    Ok(Preferences {
        resume,
        instructions,
        countries,
        titles,
    })
}

/// Save all four profile fields concurrently
pub async fn persist_preferences(backend: &dyn JobBackend, preferences: &Preferences) -> ApiResult<()> {
    tokio::try_join!(
        backend.save_instructions(&preferences.instructions),
        backend.save_resume(&preferences.resume),
        backend.save_countries(&preferences.countries),
        backend.save_titles(&preferences.titles)
    )?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsMessage {
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleRejection {
    Empty,
    Duplicate,
    LimitReached,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsSnapshot {
    pub preferences: Preferences,
    pub offered_countries: Vec<String>,
    pub max_titles: usize,
    pub loaded: bool,
    pub message: Option<SettingsMessage>,
}

pub struct PreferencesStore {
    backend: SharedBackend,
    preferences: Preferences,
    loaded: bool,
    message: Option<SettingsMessage>,
}

impl PreferencesStore {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            preferences: Preferences::default(),
            loaded: false,
            message: None,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            preferences: self.preferences.clone(),
            offered_countries: OFFERED_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            max_titles: MAX_JOB_TITLES,
            loaded: self.loaded,
            message: self.message.clone(),
        }
    }

    /// Failures leave the current values in place
    pub async fn load(&mut self) -> bool {
        self.clear_message();
        match fetch_preferences(self.backend.as_ref()).await {
            Ok(preferences) => {
                self.preferences = preferences;
                self.loaded = true;
                true
            }
            Err(e) => {
                error!("Failed to load user settings: {}", e);
                self.message = Some(SettingsMessage {
                    text: "Failed to load settings".to_string(),
                    kind: MessageKind::Error,
                });
                false
            }
        }
    }

    pub async fn save(&mut self) -> bool {
        self.message = None;
        match persist_preferences(self.backend.as_ref(), &self.preferences).await {
            Ok(()) => {
                info!("Settings saved");
                self.message = Some(SettingsMessage {
                    text: "Settings saved successfully".to_string(),
                    kind: MessageKind::Success,
                });
                true
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                self.message = Some(SettingsMessage {
                    text: "Failed to save settings".to_string(),
                    kind: MessageKind::Error,
                });
                false
            }
        }
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn replace(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    pub fn set_resume(&mut self, resume: impl Into<String>) {
        self.preferences.resume = resume.into();
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.preferences.instructions = instructions.into();
    }

    /// Returns whether the country is selected afterwards
    pub fn toggle_country(&mut self, country: &str) -> bool {
        let countries = &mut self.preferences.countries;
        if let Some(index) = countries.iter().position(|c| c == country) {
            countries.remove(index);
            false
        } else {
            countries.push(country.to_string());
            true
        }
    }

    pub fn add_title(&mut self, title: &str) -> Result<(), TitleRejection> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TitleRejection::Empty);
        }
        let titles = &mut self.preferences.titles;
        if titles.len() >= MAX_JOB_TITLES {
            return Err(TitleRejection::LimitReached);
        }
        if titles.iter().any(|t| t.eq_ignore_ascii_case(title)) {
            return Err(TitleRejection::Duplicate);
        }
        titles.push(title.to_string());
        Ok(())
    }

    pub fn remove_title(&mut self, index: usize) -> Option<String> {
        if index < self.preferences.titles.len() {
            Some(self.preferences.titles.remove(index))
        } else {
            None
        }
    }
}
