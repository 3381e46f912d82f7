// src/types/preferences.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Countries the settings view offers as search targets
pub const OFFERED_COUNTRIES: [&str; 4] = ["Denmark", "Netherlands", "Canada", "Italy"];

pub const MAX_JOB_TITLES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub resume: String,
    pub instructions: String,
    pub countries: Vec<String>,
    pub titles: Vec<String>,
}

/// Profile fields a scouting run depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileField {
    Resume,
    TargetCountries,
    JobTitles,
}

impl ProfileField {
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Resume => "Resume",
            ProfileField::TargetCountries => "Target Countries",
            ProfileField::JobTitles => "Job Titles",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== POST bodies for /user/* =====

#[derive(Debug, Serialize, Deserialize)]
pub struct ResumeBody {
    pub resume: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstructionsBody {
    pub instructions: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountriesBody {
    pub job_search_countries: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitlesBody {
    pub job_search_titles: Vec<String>,
}
