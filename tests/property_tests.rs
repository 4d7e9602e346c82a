//! Property tests for the periodization and assignment invariants.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use runplan::assignment::WorkoutAssigner;
use runplan::config::PlannerConfig;
use runplan::models::{
    ExperienceLevel, PersonalRecords, Phase, RaceDistance, RaceGoal, RunnerProfile,
};
use runplan::periodization::PeriodizationPlanner;

fn profile(
    mileage_tenths: u32,
    experience: ExperienceLevel,
    days: Vec<u8>,
    goal: Option<(RaceDistance, i64)>,
) -> RunnerProfile {
    let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    RunnerProfile {
        id: "runner-prop".to_string(),
        age: 30,
        height_cm: 175,
        weight_kg: dec!(70),
        experience_level: experience,
        weekly_mileage_km: Decimal::new(i64::from(mileage_tenths), 1),
        available_days: days,
        injury_history: None,
        personal_records: PersonalRecords::default(),
        race_goal: goal.map(|(distance, weeks)| RaceGoal {
            distance,
            target_date: today + Duration::weeks(weeks),
            target_time: None,
        }),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn experience_strategy() -> impl Strategy<Value = ExperienceLevel> {
    prop_oneof![
        Just(ExperienceLevel::Beginner),
        Just(ExperienceLevel::Intermediate),
        Just(ExperienceLevel::Advanced),
    ]
}

fn distance_strategy() -> impl Strategy<Value = RaceDistance> {
    prop_oneof![
        Just(RaceDistance::FiveK),
        Just(RaceDistance::TenK),
        Just(RaceDistance::HalfMarathon),
        Just(RaceDistance::Marathon),
    ]
}

fn days_strategy() -> impl Strategy<Value = Vec<u8>> {
    // Any subset of 1..=7 with at least two days
    proptest::collection::btree_set(1u8..=7, 2..=7)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn growth_never_exceeds_ten_percent(
        mileage_tenths in 50u32..800,
        experience in experience_strategy(),
        distance in distance_strategy(),
        horizon_weeks in 5i64..30,
    ) {
        let profile = profile(
            mileage_tenths,
            experience,
            vec![1, 3, 5, 6],
            Some((distance, horizon_weeks)),
        );
        let config = PlannerConfig::default();
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let goal = profile.race_goal.as_ref().unwrap();
        let shells = PeriodizationPlanner::plan_weeks(
            &profile,
            Some(goal.distance),
            Some(goal.target_date),
            today,
            &config,
        )
        .unwrap();

        prop_assert!(shells.len() >= 4 && shells.len() <= 20);
        for pair in shells.windows(2) {
            // Weeks after a recovery dip return to trend, so compare only
            // consecutive on-trend weeks
            if pair[0].is_recovery_week
                || pair[1].is_recovery_week
                || pair[1].phase == Phase::Taper
            {
                continue;
            }
            // Stored values are rounded to 0.1 km, so allow that much slack
            let cap = pair[0].target_mileage_km * dec!(1.1) + dec!(0.11);
            prop_assert!(
                pair[1].target_mileage_km <= cap,
                "week {} jumped from {} to {}",
                pair[1].week_number,
                pair[0].target_mileage_km,
                pair[1].target_mileage_km
            );
        }
    }

    #[test]
    fn assignment_covers_days_and_target(
        mileage_tenths in 100u32..600,
        experience in experience_strategy(),
        days in days_strategy(),
        horizon_weeks in 5i64..25,
    ) {
        let profile = profile(
            mileage_tenths,
            experience,
            days.clone(),
            Some((RaceDistance::TenK, horizon_weeks)),
        );
        let config = PlannerConfig::default();
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let goal = profile.race_goal.as_ref().unwrap();
        let shells = PeriodizationPlanner::plan_weeks(
            &profile,
            Some(goal.distance),
            Some(goal.target_date),
            today,
            &config,
        )
        .unwrap();
        let weeks = WorkoutAssigner::assign(&shells, &profile, &config).unwrap();

        for week in &weeks {
            // One workout per available day, in day order
            let assigned_days: Vec<u8> = week.workouts.iter().map(|s| s.day).collect();
            prop_assert_eq!(&assigned_days, &days);

            // Distances sum to the weekly target within tolerance
            let assigned = week.assigned_distance_km();
            let tolerance = week.target_mileage_km * config.mileage_tolerance;
            prop_assert!(
                (assigned - week.target_mileage_km).abs() <= tolerance,
                "week {}: assigned {} target {}",
                week.week_number,
                assigned,
                week.target_mileage_km
            );

            // Never more than two quality sessions
            let quality = week
                .workouts
                .iter()
                .filter(|s| s.workout.kind.is_quality())
                .count();
            prop_assert!(quality <= 2);

            // Durations respect the configured floor
            for scheduled in &week.workouts {
                prop_assert!(
                    scheduled.workout.duration_minutes >= config.min_workout_minutes
                );
            }
        }
    }
}
