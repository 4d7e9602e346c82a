//! Onboarding profile validation and canonicalization.
//!
//! Raw onboarding input arrives with everything optional and personal
//! records as free-form time strings. Normalization validates required
//! fields in a fixed order (the first invalid field wins), parses PR
//! times to seconds, and produces a canonical [`RunnerProfile`]. It is a
//! pure transform with no side effects.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::models::{
    ExperienceLevel, PersonalRecords, RaceDistance, RaceGoal, RunnerProfile,
};

/// Unvalidated onboarding input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    pub runner_id: String,
    pub age: Option<i64>,
    pub height_cm: Option<i64>,
    pub weight_kg: Option<Decimal>,
    pub experience_level: Option<String>,
    pub weekly_mileage_km: Option<Decimal>,
    pub available_days: Vec<i64>,
    pub injury_history: Option<String>,
    pub personal_records: RawPersonalRecords,
    pub race_goal: Option<RawRaceGoal>,
}

/// Personal records as entered, e.g. "22:30" or "1:45:00"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPersonalRecords {
    pub five_k: Option<String>,
    pub ten_k: Option<String>,
    pub half_marathon: Option<String>,
    pub marathon: Option<String>,
}

/// Race goal as entered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRaceGoal {
    pub distance: String,
    pub target_date: NaiveDate,
    pub target_time: Option<String>,
}

/// Validate raw onboarding input and produce a canonical profile.
///
/// Fails with a `ValidationError` naming the first missing or invalid
/// field, in declaration order.
pub fn normalize(raw: &RawProfile, now: DateTime<Utc>) -> Result<RunnerProfile> {
    if raw.runner_id.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "runner_id" }.into());
    }

    let age = require_positive(raw.age, "age")?;
    if age > 120 {
        return Err(ValidationError::InvalidField {
            field: "age",
            reason: format!("{} is not a plausible age", age),
        }
        .into());
    }

    let height_cm = require_positive(raw.height_cm, "height_cm")?;
    if height_cm > 250 {
        return Err(ValidationError::InvalidField {
            field: "height_cm",
            reason: format!("{} is not a plausible height", height_cm),
        }
        .into());
    }

    let weight_kg = raw
        .weight_kg
        .ok_or(ValidationError::MissingField { field: "weight_kg" })?;
    if weight_kg <= Decimal::ZERO {
        return Err(ValidationError::InvalidField {
            field: "weight_kg",
            reason: "must be positive".to_string(),
        }
        .into());
    }

    let experience_level = match raw.experience_level.as_deref() {
        None => {
            return Err(ValidationError::MissingField {
                field: "experience_level",
            }
            .into())
        }
        Some(s) => parse_experience_level(s)?,
    };

    let weekly_mileage_km = raw.weekly_mileage_km.ok_or(ValidationError::MissingField {
        field: "weekly_mileage_km",
    })?;
    if weekly_mileage_km < Decimal::ZERO {
        return Err(ValidationError::InvalidField {
            field: "weekly_mileage_km",
            reason: "must be zero or positive".to_string(),
        }
        .into());
    }

    let available_days = normalize_days(&raw.available_days)?;

    let personal_records = PersonalRecords {
        five_k: parse_optional_time(&raw.personal_records.five_k, "five_k")?,
        ten_k: parse_optional_time(&raw.personal_records.ten_k, "ten_k")?,
        half_marathon: parse_optional_time(&raw.personal_records.half_marathon, "half_marathon")?,
        marathon: parse_optional_time(&raw.personal_records.marathon, "marathon")?,
    };

    let race_goal = match &raw.race_goal {
        None => None,
        Some(goal) => Some(RaceGoal {
            distance: parse_race_distance(&goal.distance)?,
            target_date: goal.target_date,
            target_time: parse_optional_time(&goal.target_time, "target_time")?,
        }),
    };

    Ok(RunnerProfile {
        id: raw.runner_id.clone(),
        age: age as u8,
        height_cm: height_cm as u16,
        weight_kg,
        experience_level,
        weekly_mileage_km,
        available_days,
        injury_history: raw
            .injury_history
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        personal_records,
        race_goal,
        created_at: now,
        updated_at: now,
    })
}

/// Parse an experience level string
pub fn parse_experience_level(s: &str) -> Result<ExperienceLevel> {
    match s.trim().to_lowercase().as_str() {
        "beginner" => Ok(ExperienceLevel::Beginner),
        "intermediate" => Ok(ExperienceLevel::Intermediate),
        "advanced" => Ok(ExperienceLevel::Advanced),
        other => Err(ValidationError::InvalidField {
            field: "experience_level",
            reason: format!(
                "{:?} is not one of beginner, intermediate, advanced",
                other
            ),
        }
        .into()),
    }
}

/// Parse a race distance string
pub fn parse_race_distance(s: &str) -> Result<RaceDistance> {
    match s.trim().to_lowercase().as_str() {
        "5k" => Ok(RaceDistance::FiveK),
        "10k" => Ok(RaceDistance::TenK),
        "half marathon" | "half" | "half-marathon" => Ok(RaceDistance::HalfMarathon),
        "marathon" => Ok(RaceDistance::Marathon),
        other => Err(ValidationError::InvalidField {
            field: "race_goal.distance",
            reason: format!("{:?} is not a recognized race distance", other),
        }
        .into()),
    }
}

/// Parse a time string to seconds.
///
/// Accepts "mm:ss" and "h:mm:ss". Minute and second components past the
/// leading one must be below 60.
pub fn parse_time_seconds(input: &str, field: &'static str) -> Result<u32> {
    let parts: Vec<&str> = input.trim().split(':').collect();

    let invalid = || ValidationError::UnparseableTime {
        field,
        input: input.to_string(),
    };

    let numbers: Vec<u32> = parts
        .iter()
        .map(|p| p.parse::<u32>().map_err(|_| invalid()))
        .collect::<std::result::Result<_, _>>()?;

    let seconds = match numbers.as_slice() {
        [m, s] if *s < 60 => m * 60 + s,
        [h, m, s] if *m < 60 && *s < 60 => h * 3600 + m * 60 + s,
        _ => return Err(invalid().into()),
    };

    if seconds == 0 {
        return Err(invalid().into());
    }
    Ok(seconds)
}

fn parse_optional_time(input: &Option<String>, field: &'static str) -> Result<Option<u32>> {
    match input {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_time_seconds(s, field).map(Some),
    }
}

fn require_positive(value: Option<i64>, field: &'static str) -> Result<i64> {
    let v = value.ok_or(ValidationError::MissingField { field })?;
    if v <= 0 {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must be positive".to_string(),
        }
        .into());
    }
    Ok(v)
}

fn normalize_days(days: &[i64]) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::with_capacity(days.len());
    for &d in days {
        if !(1..=7).contains(&d) {
            return Err(ValidationError::InvalidField {
                field: "available_days",
                reason: format!("{} is not a weekday number (1-7)", d),
            }
            .into());
        }
        let d = d as u8;
        if !out.contains(&d) {
            out.push(d);
        }
    }
    out.sort_unstable();
    if out.len() < 2 {
        return Err(ValidationError::InvalidField {
            field: "available_days",
            reason: "at least 2 distinct training days are required".to_string(),
        }
        .into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunPlanError;
    use rust_decimal_macros::dec;

    fn valid_raw() -> RawProfile {
        RawProfile {
            runner_id: "runner-1".to_string(),
            age: Some(32),
            height_cm: Some(175),
            weight_kg: Some(dec!(70)),
            experience_level: Some("intermediate".to_string()),
            weekly_mileage_km: Some(dec!(35)),
            available_days: vec![1, 2, 4, 5, 6],
            injury_history: None,
            personal_records: RawPersonalRecords {
                five_k: Some("22:00".to_string()),
                ten_k: Some("47:00".to_string()),
                half_marathon: Some("1:45:00".to_string()),
                marathon: None,
            },
            race_goal: Some(RawRaceGoal {
                distance: "Half Marathon".to_string(),
                target_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
                target_time: Some("1:35:00".to_string()),
            }),
        }
    }

    #[test]
    fn test_normalize_valid_profile() {
        let profile = normalize(&valid_raw(), Utc::now()).unwrap();
        assert_eq!(profile.age, 32);
        assert_eq!(profile.experience_level, ExperienceLevel::Intermediate);
        assert_eq!(profile.available_days, vec![1, 2, 4, 5, 6]);
        assert_eq!(profile.personal_records.five_k, Some(1320));
        assert_eq!(profile.personal_records.half_marathon, Some(6300));
        let goal = profile.race_goal.unwrap();
        assert_eq!(goal.distance, RaceDistance::HalfMarathon);
        assert_eq!(goal.target_time, Some(5700));
    }

    #[test]
    fn test_first_invalid_field_wins() {
        let mut raw = valid_raw();
        raw.age = None;
        raw.weight_kg = None;
        let err = normalize(&raw, Utc::now()).unwrap_err();
        match err {
            RunPlanError::Validation(ValidationError::MissingField { field }) => {
                assert_eq!(field, "age")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_implausible_height_rejected() {
        let mut raw = valid_raw();
        raw.height_cm = Some(70_000);
        let err = normalize(&raw, Utc::now()).unwrap_err();
        match err {
            RunPlanError::Validation(ValidationError::InvalidField { field, .. }) => {
                assert_eq!(field, "height_cm")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut raw = valid_raw();
        raw.weight_kg = Some(dec!(-5));
        assert!(normalize(&raw, Utc::now()).is_err());
    }

    #[test]
    fn test_zero_mileage_allowed() {
        let mut raw = valid_raw();
        raw.weekly_mileage_km = Some(Decimal::ZERO);
        assert!(normalize(&raw, Utc::now()).is_ok());
    }

    #[test]
    fn test_unknown_experience_level() {
        let mut raw = valid_raw();
        raw.experience_level = Some("elite".to_string());
        assert!(normalize(&raw, Utc::now()).is_err());
    }

    #[test]
    fn test_days_deduplicated_and_sorted() {
        let mut raw = valid_raw();
        raw.available_days = vec![5, 1, 5, 3];
        let profile = normalize(&raw, Utc::now()).unwrap();
        assert_eq!(profile.available_days, vec![1, 3, 5]);
    }

    #[test]
    fn test_single_day_rejected() {
        let mut raw = valid_raw();
        raw.available_days = vec![3, 3];
        assert!(normalize(&raw, Utc::now()).is_err());
    }

    #[test]
    fn test_day_out_of_range_rejected() {
        let mut raw = valid_raw();
        raw.available_days = vec![1, 8];
        assert!(normalize(&raw, Utc::now()).is_err());
    }

    #[test]
    fn test_parse_time_seconds() {
        assert_eq!(parse_time_seconds("22:30", "five_k").unwrap(), 1350);
        assert_eq!(parse_time_seconds("1:45:00", "half_marathon").unwrap(), 6300);
        assert_eq!(parse_time_seconds("0:59", "five_k").unwrap(), 59);
        assert!(parse_time_seconds("22:70", "five_k").is_err());
        assert!(parse_time_seconds("fast", "five_k").is_err());
        assert!(parse_time_seconds("1350", "five_k").is_err());
        assert!(parse_time_seconds("0:00", "five_k").is_err());
    }

    #[test]
    fn test_unparseable_pr_names_field() {
        let mut raw = valid_raw();
        raw.personal_records.ten_k = Some("quick".to_string());
        let err = normalize(&raw, Utc::now()).unwrap_err();
        match err {
            RunPlanError::Validation(ValidationError::UnparseableTime { field, .. }) => {
                assert_eq!(field, "ten_k")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_injury_history_dropped() {
        let mut raw = valid_raw();
        raw.injury_history = Some("   ".to_string());
        let profile = normalize(&raw, Utc::now()).unwrap();
        assert!(profile.injury_history.is_none());
    }
}
