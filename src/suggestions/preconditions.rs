// src/suggestions/preconditions.rs
//! Profile checks that gate a scouting run

use crate::core::JobBackend;
use crate::error::ApiResult;
use crate::types::ProfileField;

/// Fetch the profile fields a run depends on and report the ones that are missing
pub async fn missing_profile_fields(
    backend: &dyn JobBackend,
    min_resume_chars: usize,
) -> ApiResult<Vec<ProfileField>> {
    let (resume, countries, titles) =
        tokio::try_join!(backend.resume(), backend.countries(), backend.titles())?;

    Ok(evaluate(&resume, &countries, &titles, min_resume_chars))
}

pub fn evaluate(
    resume: &str,
    countries: &[String],
    titles: &[String],
    min_resume_chars: usize,
) -> Vec<ProfileField> {
    let mut missing = Vec::new();

    if resume.trim().chars().count() < min_resume_chars.max(1) {
        missing.push(ProfileField::Resume);
    }
    if countries.iter().all(|c| c.trim().is_empty()) {
        missing.push(ProfileField::TargetCountries);
    }
    if titles.iter().all(|t| t.trim().is_empty()) {
        missing.push(ProfileField::JobTitles);
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_complete_profile_passes() {
        let resume = "x".repeat(60);
        let missing = evaluate(&resume, &strings(&["Denmark"]), &strings(&["SRE"]), 50);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_whitespace_does_not_count_toward_resume() {
        let resume = format!("   {}   ", "x".repeat(49));
        let missing = evaluate(&resume, &strings(&["Denmark"]), &strings(&["SRE"]), 50);
        assert_eq!(missing, vec![ProfileField::Resume]);
    }

    #[test]
    fn test_reports_every_missing_field_in_order() {
        let missing = evaluate("", &[], &strings(&["  "]), 50);
        assert_eq!(
            missing,
            vec![
                ProfileField::Resume,
                ProfileField::TargetCountries,
                ProfileField::JobTitles
            ]
        );
    }

    #[test]
    fn test_zero_threshold_still_requires_text() {
        let missing = evaluate(" ", &strings(&["Italy"]), &strings(&["SRE"]), 0);
        assert_eq!(missing, vec![ProfileField::Resume]);
    }
}
