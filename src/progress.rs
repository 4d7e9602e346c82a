//! Progress statistics derived from completed workouts.
//!
//! Everything here is computed from the plan's completion records; no
//! extra state is stored. Distances prefer the logged actuals and fall
//! back to the planned distance when the runner only ticked the box.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{format_pace, TrainingPlan};

/// Distance run on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDistance {
    /// Short weekday label ("Mon")
    pub day: String,
    pub date: NaiveDate,
    pub distance_km: Decimal,
}

/// Aggregate training statistics for one runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    /// Kilometres in the 7 days ending today
    pub weekly_mileage_km: Decimal,

    /// Kilometres in the 30 days ending today
    pub monthly_mileage_km: Decimal,

    pub total_runs: u32,

    /// Average pace over all completed runs with both distance and
    /// duration, formatted as "m:ss/km"
    pub average_pace: Option<String>,

    /// Consecutive days with a completed run, ending today or yesterday
    pub streak_days: u32,

    /// Per-day distances for the last 7 days, oldest first
    pub weekly_data: Vec<DayDistance>,
}

/// Derives `ProgressStats` from a plan's completion records
pub struct ProgressTracker;

struct DayTotals {
    distance_km: Decimal,
    duration_minutes: u32,
    runs: u32,
}

impl ProgressTracker {
    pub fn stats(plan: &TrainingPlan, today: NaiveDate) -> ProgressStats {
        let mut by_day: HashMap<NaiveDate, DayTotals> = HashMap::new();
        let mut total_runs = 0u32;
        let mut paced_distance = Decimal::ZERO;
        let mut paced_minutes = Decimal::ZERO;

        for week in &plan.weeks {
            for scheduled in &week.workouts {
                let Some(completion) = &scheduled.workout.completion else {
                    continue;
                };
                let date = completion.completed_at.date_naive();
                let distance = completion
                    .actual_distance_km
                    .or(scheduled.workout.distance_km)
                    .unwrap_or(Decimal::ZERO);
                let duration = completion
                    .actual_duration_minutes
                    .unwrap_or(scheduled.workout.duration_minutes);

                total_runs += 1;
                if distance > Decimal::ZERO {
                    paced_distance += distance;
                    paced_minutes += Decimal::from(duration);
                }
                let totals = by_day.entry(date).or_insert(DayTotals {
                    distance_km: Decimal::ZERO,
                    duration_minutes: 0,
                    runs: 0,
                });
                totals.distance_km += distance;
                totals.duration_minutes += duration;
                totals.runs += 1;
            }
        }

        let sum_since = |cutoff: NaiveDate| -> Decimal {
            by_day
                .iter()
                .filter(|(date, _)| **date > cutoff && **date <= today)
                .map(|(_, totals)| totals.distance_km)
                .sum()
        };
        let weekly_mileage_km = sum_since(today - Duration::days(7)).round_dp(1);
        let monthly_mileage_km = sum_since(today - Duration::days(30)).round_dp(1);

        let average_pace = if paced_distance > Decimal::ZERO {
            Some(format!(
                "{}/km",
                format_pace((paced_minutes / paced_distance).round_dp(2))
            ))
        } else {
            None
        };

        ProgressStats {
            weekly_mileage_km,
            monthly_mileage_km,
            total_runs,
            average_pace,
            streak_days: Self::streak(&by_day, today),
            weekly_data: Self::weekly_data(&by_day, today),
        }
    }

    /// Consecutive run days counting back from today; a rest day today
    /// does not break a streak that ran through yesterday.
    fn streak(by_day: &HashMap<NaiveDate, DayTotals>, today: NaiveDate) -> u32 {
        let mut cursor = if by_day.contains_key(&today) {
            today
        } else {
            today - Duration::days(1)
        };
        let mut streak = 0u32;
        while by_day.contains_key(&cursor) {
            streak += 1;
            cursor -= Duration::days(1);
        }
        streak
    }

    fn weekly_data(by_day: &HashMap<NaiveDate, DayTotals>, today: NaiveDate) -> Vec<DayDistance> {
        (0..7)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                DayDistance {
                    day: weekday_label(date.weekday()).to_string(),
                    date,
                    distance_km: by_day
                        .get(&date)
                        .map(|totals| totals.distance_km)
                        .unwrap_or(Decimal::ZERO),
                }
            })
            .collect()
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Phase, ScheduledWorkout, TrainingWeek, Workout, WorkoutCompletion, WorkoutKind,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn completed_workout(
        kind: WorkoutKind,
        distance: Decimal,
        minutes: u32,
        date: NaiveDate,
    ) -> Workout {
        Workout {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: "run".to_string(),
            description: "run".to_string(),
            duration_minutes: minutes,
            distance_km: Some(distance),
            target_pace: None,
            intervals: None,
            completion: Some(WorkoutCompletion {
                completed_at: Utc
                    .from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap()),
                actual_distance_km: Some(distance),
                actual_duration_minutes: Some(minutes),
            }),
            planned: None,
        }
    }

    fn plan_with(workouts: Vec<(u8, Workout)>) -> TrainingPlan {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        TrainingPlan {
            id: "plan-1".to_string(),
            runner_id: "runner-1".to_string(),
            name: "Test".to_string(),
            goal: None,
            start_date: start,
            end_date: start + Duration::days(6),
            weeks: vec![TrainingWeek {
                week_number: 1,
                phase: Phase::Base,
                focus: "test".to_string(),
                start_date: start,
                end_date: start + Duration::days(6),
                target_mileage_km: dec!(30),
                is_recovery_week: false,
                workouts: workouts
                    .into_iter()
                    .map(|(day, workout)| ScheduledWorkout { day, workout })
                    .collect(),
            }],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_mileage_windows_and_pace() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let plan = plan_with(vec![
            (1, completed_workout(WorkoutKind::Easy, dec!(6), 36, monday)),
            (
                3,
                completed_workout(
                    WorkoutKind::Tempo,
                    dec!(8),
                    40,
                    monday + Duration::days(2),
                ),
            ),
        ]);
        let today = monday + Duration::days(3);
        let stats = ProgressTracker::stats(&plan, today);

        assert_eq!(stats.total_runs, 2);
        assert_eq!(stats.weekly_mileage_km, dec!(14));
        assert_eq!(stats.monthly_mileage_km, dec!(14));
        // 76 minutes over 14 km = 5.43 min/km
        assert_eq!(stats.average_pace.as_deref(), Some("5:26/km"));
    }

    #[test]
    fn test_streak_counting() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let plan = plan_with(vec![
            (1, completed_workout(WorkoutKind::Easy, dec!(5), 30, monday)),
            (
                2,
                completed_workout(WorkoutKind::Easy, dec!(5), 30, monday + Duration::days(1)),
            ),
            (
                3,
                completed_workout(WorkoutKind::Easy, dec!(5), 30, monday + Duration::days(2)),
            ),
        ]);

        // Checked on the last run day
        let stats = ProgressTracker::stats(&plan, monday + Duration::days(2));
        assert_eq!(stats.streak_days, 3);

        // Rest day today keeps yesterday's streak
        let stats = ProgressTracker::stats(&plan, monday + Duration::days(3));
        assert_eq!(stats.streak_days, 3);

        // Two rest days break it
        let stats = ProgressTracker::stats(&plan, monday + Duration::days(4));
        assert_eq!(stats.streak_days, 0);
    }

    #[test]
    fn test_weekly_data_shape() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let plan = plan_with(vec![(
            1,
            completed_workout(WorkoutKind::Easy, dec!(5.2), 30, monday),
        )]);
        let stats = ProgressTracker::stats(&plan, monday + Duration::days(6));

        assert_eq!(stats.weekly_data.len(), 7);
        assert_eq!(stats.weekly_data[0].day, "Mon");
        assert_eq!(stats.weekly_data[0].distance_km, dec!(5.2));
        assert_eq!(stats.weekly_data[6].day, "Sun");
        assert_eq!(stats.weekly_data[6].distance_km, Decimal::ZERO);
    }

    #[test]
    fn test_empty_plan_stats() {
        let plan = plan_with(vec![]);
        let stats =
            ProgressTracker::stats(&plan, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(stats.total_runs, 0);
        assert_eq!(stats.streak_days, 0);
        assert_eq!(stats.average_pace, None);
        assert_eq!(stats.weekly_mileage_km, Decimal::ZERO);
    }
}
