//! Readiness scoring and in-week plan adjustment.
//!
//! A daily stress/sleep entry maps to a readiness score
//! `(6 - stress) + sleep` (2-10, higher is better) and a coarse band.
//! A Low band rewrites the current week's remaining workouts: quality
//! sessions are downgraded to easy and everything is scaled to 80%,
//! never below a 15-minute floor. Moderate and High never add load;
//! planned load only ever increases through the periodization planner.
//!
//! Every evaluation starts from the workout's original planned snapshot,
//! so repeated entries for the same week never compound and an improved
//! readiness restores the planned sessions.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::error::{Result, ValidationError};
use crate::models::{StressEntry, TrainingPlan, Workout, WorkoutKind};

/// Coarse readiness categories derived from stress and sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessBand {
    /// Score 2-4: back off today
    Low,
    /// Score 5-7: train as planned
    Moderate,
    /// Score 8-10: well recovered
    High,
}

impl fmt::Display for ReadinessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessBand::Low => write!(f, "Low"),
            ReadinessBand::Moderate => write!(f, "Moderate"),
            ReadinessBand::High => write!(f, "High"),
        }
    }
}

impl ReadinessBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => ReadinessBand::Low,
            5..=7 => ReadinessBand::Moderate,
            _ => ReadinessBand::High,
        }
    }

    pub fn from_entry(entry: &StressEntry) -> Self {
        Self::from_score(readiness_score(entry))
    }
}

/// Readiness score for an entry: `(6 - stress) + sleep`, range 2-10.
///
/// Missing sleep quality counts as a neutral 3 so the band boundaries
/// are unchanged. Out-of-range levels are clamped to their valid range
/// first; `validate_entry` is the place that rejects them.
pub fn readiness_score(entry: &StressEntry) -> u8 {
    let stress = entry.stress_level.clamp(1, 5);
    let sleep = entry.sleep_quality.unwrap_or(3).clamp(1, 5);
    (6 - stress) + sleep
}

/// Validate a stress entry's ranges before it is stored or applied
pub fn validate_entry(entry: &StressEntry) -> Result<()> {
    if entry.runner_id.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "runner_id" }.into());
    }
    if !(1..=5).contains(&entry.stress_level) {
        return Err(ValidationError::InvalidField {
            field: "stress_level",
            reason: format!("{} is outside 1-5", entry.stress_level),
        }
        .into());
    }
    if let Some(sleep) = entry.sleep_quality {
        if !(1..=5).contains(&sleep) {
            return Err(ValidationError::InvalidField {
                field: "sleep_quality",
                reason: format!("{} is outside 1-5", sleep),
            }
            .into());
        }
    }
    Ok(())
}

/// Applies readiness entries to the current week of a plan
pub struct ReadinessAdjuster;

impl ReadinessAdjuster {
    /// Re-evaluate the current week against today's entry.
    ///
    /// Returns a new plan value; the caller persists it. Weeks other
    /// than the one containing the entry date, completed workouts, and
    /// days before the entry date are never touched.
    pub fn adjust(
        plan: &TrainingPlan,
        entry: &StressEntry,
        config: &PlannerConfig,
    ) -> Result<TrainingPlan> {
        validate_entry(entry)?;
        let band = ReadinessBand::from_entry(entry);

        let mut adjusted = plan.clone();
        let Some(week) = adjusted.week_containing_mut(entry.date) else {
            debug!(date = %entry.date, "entry date outside plan; nothing to adjust");
            return Ok(adjusted);
        };

        let week_start = week.start_date;
        for scheduled in week.workouts.iter_mut() {
            let slot_date = week_start + chrono::Duration::days(i64::from(scheduled.day) - 1);
            if scheduled.workout.is_completed() || slot_date < entry.date {
                continue;
            }
            Self::apply_band(&mut scheduled.workout, band, config);
        }

        debug!(band = %band, week = week.week_number, "readiness adjustment applied");
        Ok(adjusted)
    }

    /// Rewrite one workout according to the band, always starting from
    /// the original planned snapshot.
    fn apply_band(workout: &mut Workout, band: ReadinessBand, config: &PlannerConfig) {
        let snapshot = workout.planned_snapshot();

        // Restore the planned session first; Moderate/High stop here.
        workout.kind = snapshot.kind;
        workout.title = snapshot.title.clone();
        workout.description = snapshot.description.clone();
        workout.duration_minutes = snapshot.duration_minutes;
        workout.distance_km = snapshot.distance_km;
        workout.target_pace = snapshot.target_pace;
        workout.intervals = snapshot.intervals.clone();
        workout.planned = None;

        if band != ReadinessBand::Low {
            return;
        }

        let multiplier = config.low_readiness_multiplier;
        let scaled_duration = (Decimal::from(snapshot.duration_minutes) * multiplier)
            .round()
            .to_u32()
            .unwrap_or(snapshot.duration_minutes)
            .max(config.min_workout_minutes);
        let scaled_distance = snapshot.distance_km.map(|d| (d * multiplier).round_dp(1));

        if snapshot.kind.is_quality() {
            workout.kind = WorkoutKind::Easy;
            workout.title = "Easy Run".to_string();
            workout.description =
                "Dialed back for low readiness. Keep the effort genuinely easy.".to_string();
            workout.target_pace = None;
            workout.intervals = None;
        }
        workout.duration_minutes = scaled_duration;
        workout.distance_km = scaled_distance;
        workout.planned = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Phase, ScheduledWorkout, TrainingWeek, Workout, WorkoutCompletion,
    };
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn workout(kind: WorkoutKind, duration: u32, distance: Decimal) -> Workout {
        Workout {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: format!("{} session", kind),
            description: "test".to_string(),
            duration_minutes: duration,
            distance_km: Some(distance),
            target_pace: None,
            intervals: None,
            completion: None,
            planned: None,
        }
    }

    fn test_plan() -> TrainingPlan {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(); // Monday
        TrainingPlan {
            id: "plan-1".to_string(),
            runner_id: "runner-1".to_string(),
            name: "Test Plan".to_string(),
            goal: None,
            start_date: start,
            end_date: start + chrono::Duration::days(6),
            weeks: vec![TrainingWeek {
                week_number: 1,
                phase: Phase::Build,
                focus: "test".to_string(),
                start_date: start,
                end_date: start + chrono::Duration::days(6),
                target_mileage_km: dec!(40),
                is_recovery_week: false,
                workouts: vec![
                    ScheduledWorkout {
                        day: 1,
                        workout: workout(WorkoutKind::Easy, 40, dec!(6)),
                    },
                    ScheduledWorkout {
                        day: 3,
                        workout: workout(WorkoutKind::Tempo, 45, dec!(8)),
                    },
                    ScheduledWorkout {
                        day: 5,
                        workout: workout(WorkoutKind::Interval, 50, dec!(5)),
                    },
                    ScheduledWorkout {
                        day: 6,
                        workout: workout(WorkoutKind::Long, 90, dec!(14)),
                    },
                ],
            }],
            created_at: Utc::now(),
        }
    }

    fn low_entry(date: NaiveDate) -> StressEntry {
        StressEntry {
            runner_id: "runner-1".to_string(),
            date,
            stress_level: 5,
            sleep_quality: Some(1),
            notes: None,
        }
    }

    #[test]
    fn test_score_and_bands() {
        let entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(readiness_score(&entry), 2);
        assert_eq!(ReadinessBand::from_entry(&entry), ReadinessBand::Low);

        assert_eq!(ReadinessBand::from_score(4), ReadinessBand::Low);
        assert_eq!(ReadinessBand::from_score(5), ReadinessBand::Moderate);
        assert_eq!(ReadinessBand::from_score(7), ReadinessBand::Moderate);
        assert_eq!(ReadinessBand::from_score(8), ReadinessBand::High);
        assert_eq!(ReadinessBand::from_score(10), ReadinessBand::High);
    }

    #[test]
    fn test_score_clamps_out_of_range_levels() {
        let mut entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        entry.stress_level = 7;
        entry.sleep_quality = Some(9);
        assert_eq!(readiness_score(&entry), 6);
        assert!(validate_entry(&entry).is_err());

        entry.stress_level = 0;
        entry.sleep_quality = Some(0);
        assert_eq!(readiness_score(&entry), 6);
    }

    #[test]
    fn test_missing_sleep_is_neutral() {
        let entry = StressEntry {
            runner_id: "runner-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            stress_level: 3,
            sleep_quality: None,
            notes: None,
        };
        assert_eq!(readiness_score(&entry), 6);
        assert_eq!(ReadinessBand::from_entry(&entry), ReadinessBand::Moderate);
    }

    #[test]
    fn test_entry_validation() {
        let mut entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        entry.stress_level = 6;
        assert!(validate_entry(&entry).is_err());

        let mut entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        entry.sleep_quality = Some(0);
        assert!(validate_entry(&entry).is_err());
    }

    #[test]
    fn test_low_band_downgrades_remaining_quality() {
        let plan = test_plan();
        let config = PlannerConfig::default();
        // Tuesday entry: Monday is past, Wed/Fri/Sat remain
        let entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        let adjusted = ReadinessAdjuster::adjust(&plan, &entry, &config).unwrap();

        let week = &adjusted.weeks[0];
        // Monday easy run untouched (already past)
        assert_eq!(week.workouts[0].workout.duration_minutes, 40);
        assert!(week.workouts[0].workout.planned.is_none());

        // Tempo downgraded to easy at 80%
        let tempo_slot = &week.workouts[1].workout;
        assert_eq!(tempo_slot.kind, WorkoutKind::Easy);
        assert_eq!(tempo_slot.duration_minutes, 36);
        assert_eq!(tempo_slot.distance_km, Some(dec!(6.4)));
        assert!(tempo_slot.planned.is_some());

        // Interval downgraded too, repeats dropped
        let interval_slot = &week.workouts[2].workout;
        assert_eq!(interval_slot.kind, WorkoutKind::Easy);
        assert!(interval_slot.intervals.is_none());

        // Long run keeps its type but is scaled
        let long_slot = &week.workouts[3].workout;
        assert_eq!(long_slot.kind, WorkoutKind::Long);
        assert_eq!(long_slot.duration_minutes, 72);
        assert_eq!(long_slot.distance_km, Some(dec!(11.2)));
    }

    #[test]
    fn test_adjustment_is_idempotent() {
        let plan = test_plan();
        let config = PlannerConfig::default();
        let entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());

        let once = ReadinessAdjuster::adjust(&plan, &entry, &config).unwrap();
        let twice = ReadinessAdjuster::adjust(&once, &entry, &config).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_moderate_entry_restores_planned_workouts() {
        let plan = test_plan();
        let config = PlannerConfig::default();
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();

        let low = ReadinessAdjuster::adjust(&plan, &low_entry(date), &config).unwrap();
        let moderate_entry = StressEntry {
            stress_level: 2,
            sleep_quality: Some(4),
            ..low_entry(date)
        };
        let restored = ReadinessAdjuster::adjust(&low, &moderate_entry, &config).unwrap();
        assert_eq!(restored, plan);
    }

    #[test]
    fn test_completed_workouts_never_touched() {
        let mut plan = test_plan();
        plan.weeks[0].workouts[1].workout.completion = Some(WorkoutCompletion {
            completed_at: Utc::now(),
            actual_distance_km: Some(dec!(8)),
            actual_duration_minutes: Some(44),
        });
        let config = PlannerConfig::default();
        let entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());

        let adjusted = ReadinessAdjuster::adjust(&plan, &entry, &config).unwrap();
        let tempo_slot = &adjusted.weeks[0].workouts[1].workout;
        assert_eq!(tempo_slot.kind, WorkoutKind::Tempo);
        assert_eq!(tempo_slot.duration_minutes, 45);
        assert!(tempo_slot.planned.is_none());
    }

    #[test]
    fn test_duration_floor() {
        let mut plan = test_plan();
        plan.weeks[0].workouts[0].workout.duration_minutes = 16;
        let config = PlannerConfig::default();
        let entry = low_entry(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());

        let adjusted = ReadinessAdjuster::adjust(&plan, &entry, &config).unwrap();
        // 16 * 0.8 = 12.8, floored at 15
        assert_eq!(adjusted.weeks[0].workouts[0].workout.duration_minutes, 15);
    }

    #[test]
    fn test_entry_outside_plan_is_noop() {
        let plan = test_plan();
        let config = PlannerConfig::default();
        let entry = low_entry(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let adjusted = ReadinessAdjuster::adjust(&plan, &entry, &config).unwrap();
        assert_eq!(adjusted, plan);
    }
}
