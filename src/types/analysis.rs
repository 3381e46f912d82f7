// src/types/analysis.rs
//! Status of the background relevance-analysis task

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
    Unknown(String),
}

impl AnalysisState {
    /// Accepts both the lowercase and the uppercase forms, plus celery task states
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => AnalysisState::Idle,
            "running" | "in_progress" | "pending" | "started" | "retry" => AnalysisState::Running,
            "completed" | "success" => AnalysisState::Completed,
            "failed" | "failure" | "revoked" => AnalysisState::Failed,
            _ => AnalysisState::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Running => "running",
            AnalysisState::Completed => "completed",
            AnalysisState::Failed => "failed",
            AnalysisState::Unknown(raw) => raw,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, AnalysisState::Running)
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnalysisState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnalysisState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AnalysisState::parse(&raw))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStatus {
    pub status: AnalysisState,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub celery_state: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub started_at: Option<DateTime<Utc>>,
}

impl AnalysisStatus {
    pub fn running() -> Self {
        Self {
            status: AnalysisState::Running,
            ..Self::default()
        }
    }
}

// The backend may send naive ISO timestamps; those are read as UTC and
// anything unparseable is dropped rather than failing the whole poll.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    Ok(NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}
