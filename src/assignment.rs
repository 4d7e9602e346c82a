//! Workout assignment.
//!
//! Fills each planned week's available days with concrete workouts. The
//! rotation of workout types is keyed by phase, the long run is anchored
//! to the weekend, distances are distributed by fixed per-type ratios of
//! the week's target mileage (remainder to the long run), and target
//! paces come from [`PaceCalculator`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::models::{
    IntervalSegment, PaceBand, Phase, RunnerProfile, ScheduledWorkout, TrainingWeek, Workout,
    WorkoutKind,
};
use crate::pace::PaceCalculator;
use crate::periodization::WeekShell;

/// Quality sessions allowed per week; further rotation picks become easy runs
const MAX_QUALITY_PER_WEEK: usize = 2;

/// Fills week shells with concrete workouts
pub struct WorkoutAssigner;

impl WorkoutAssigner {
    /// Assign workouts to every shell, one per available training day
    pub fn assign(
        shells: &[WeekShell],
        profile: &RunnerProfile,
        config: &PlannerConfig,
    ) -> Result<Vec<TrainingWeek>> {
        shells
            .iter()
            .map(|shell| Self::assign_week(shell, profile, config))
            .collect()
    }

    /// Populate one week
    pub fn assign_week(
        shell: &WeekShell,
        profile: &RunnerProfile,
        config: &PlannerConfig,
    ) -> Result<TrainingWeek> {
        let days = &profile.available_days;
        let long_day = Self::long_run_day(days, config.weekend_anchor_day);
        let kinds = Self::kinds_for_week(shell, days, long_day);

        let total = shell.target_mileage_km;
        let mut slots: Vec<(u8, WorkoutKind, Decimal)> = Vec::with_capacity(days.len());
        let mut filler_weight_total = Decimal::ZERO;

        // First pass: fixed-ratio distances for long and quality sessions
        for (&day, &kind) in days.iter().zip(kinds.iter()) {
            let distance = match kind {
                WorkoutKind::Long => (total * config.long_run_ratio).round_dp(1),
                WorkoutKind::Tempo => {
                    let ratio = if shell.phase == Phase::Taper {
                        // Taper keeps one shorter quality session
                        config.tempo_ratio / Decimal::TWO
                    } else {
                        config.tempo_ratio
                    };
                    (total * ratio).round_dp(1)
                }
                WorkoutKind::Interval => {
                    let segment = Self::interval_segment_km(shell.phase);
                    let repeats = Self::interval_repeats(total, segment, config);
                    (segment * Decimal::from(repeats)).round_dp(1)
                }
                WorkoutKind::Easy | WorkoutKind::Recovery | WorkoutKind::Race => {
                    filler_weight_total += Self::filler_weight(kind);
                    Decimal::ZERO
                }
            };
            slots.push((day, kind, distance));
        }

        // Second pass: split what's left across easy/recovery slots
        let allocated: Decimal = slots.iter().map(|(_, _, d)| *d).sum();
        let remaining = (total - allocated).max(Decimal::ZERO);
        if filler_weight_total > Decimal::ZERO {
            for (_, kind, distance) in slots.iter_mut() {
                if matches!(kind, WorkoutKind::Easy | WorkoutKind::Recovery) {
                    *distance =
                        (remaining * Self::filler_weight(*kind) / filler_weight_total).round_dp(1);
                }
            }
        }

        // Rounding remainder goes to the long run (or the long-day slot)
        let assigned: Decimal = slots.iter().map(|(_, _, d)| *d).sum();
        let remainder = total - assigned;
        if remainder != Decimal::ZERO {
            let slot_index = slots
                .iter()
                .position(|(_, kind, _)| *kind == WorkoutKind::Long)
                .or_else(|| slots.iter().position(|(day, _, _)| *day == long_day));
            if let Some(index) = slot_index {
                let slot = &mut slots[index];
                slot.2 = (slot.2 + remainder).max(Decimal::ZERO).round_dp(1);
            }
        }

        let workouts = slots
            .into_iter()
            .map(|(day, kind, distance)| ScheduledWorkout {
                day,
                workout: Self::build_workout(kind, distance, shell, profile),
            })
            .collect();

        Ok(TrainingWeek {
            week_number: shell.week_number,
            phase: shell.phase,
            focus: shell.focus.clone(),
            start_date: shell.start_date,
            end_date: shell.end_date,
            target_mileage_km: shell.target_mileage_km,
            is_recovery_week: shell.is_recovery_week,
            workouts,
        })
    }

    /// The available day closest to, but not after, the weekend anchor;
    /// falls back to the last available day of the week.
    pub fn long_run_day(days: &[u8], anchor: u8) -> u8 {
        days.iter()
            .copied()
            .filter(|&d| d <= anchor)
            .max()
            .or_else(|| days.iter().copied().max())
            .unwrap_or(anchor)
    }

    /// Workout type for each available day, in day order
    fn kinds_for_week(shell: &WeekShell, days: &[u8], long_day: u8) -> Vec<WorkoutKind> {
        let rotation: &[WorkoutKind] = if shell.is_recovery_week {
            &[WorkoutKind::Easy, WorkoutKind::Recovery]
        } else {
            match shell.phase {
                Phase::Base => &[WorkoutKind::Easy, WorkoutKind::Recovery],
                Phase::Build => &[
                    WorkoutKind::Tempo,
                    WorkoutKind::Easy,
                    WorkoutKind::Interval,
                    WorkoutKind::Easy,
                ],
                Phase::Peak => &[WorkoutKind::Interval, WorkoutKind::Tempo, WorkoutKind::Easy],
                Phase::Taper => &[WorkoutKind::Easy, WorkoutKind::Recovery],
            }
        };

        let has_long = shell.phase != Phase::Taper;
        let mut quality_assigned = 0usize;
        let mut rotation_index = 0usize;
        let mut first_taper_slot = true;

        days.iter()
            .map(|&day| {
                if has_long && day == long_day {
                    return WorkoutKind::Long;
                }
                if shell.phase == Phase::Taper && !shell.is_recovery_week && first_taper_slot {
                    first_taper_slot = false;
                    return WorkoutKind::Tempo;
                }
                let mut kind = rotation[rotation_index % rotation.len()];
                rotation_index += 1;
                if kind.is_quality() {
                    if quality_assigned >= MAX_QUALITY_PER_WEEK {
                        kind = WorkoutKind::Easy;
                    } else {
                        quality_assigned += 1;
                    }
                }
                kind
            })
            .collect()
    }

    fn filler_weight(kind: WorkoutKind) -> Decimal {
        match kind {
            WorkoutKind::Recovery => dec!(0.6),
            _ => Decimal::ONE,
        }
    }

    fn interval_segment_km(phase: Phase) -> Decimal {
        match phase {
            Phase::Peak => Decimal::ONE,
            _ => dec!(0.8),
        }
    }

    fn interval_repeats(total: Decimal, segment: Decimal, config: &PlannerConfig) -> u32 {
        let target = total * config.interval_ratio;
        let repeats = (target / segment).round().to_u32().unwrap_or(0);
        repeats.clamp(3, 10)
    }

    fn build_workout(
        kind: WorkoutKind,
        distance: Decimal,
        shell: &WeekShell,
        profile: &RunnerProfile,
    ) -> Workout {
        let pace = PaceCalculator::band_for(
            kind,
            &profile.personal_records,
            profile.experience_level,
        );
        let (title, description) = Self::describe(kind, distance, shell.phase);

        let intervals = if kind == WorkoutKind::Interval {
            Some(Self::build_intervals(distance, shell.phase, pace))
        } else {
            None
        };

        let duration = Self::duration_minutes(kind, distance, &pace, intervals.as_deref());

        Workout {
            id: Uuid::new_v4().to_string(),
            kind,
            title,
            description,
            duration_minutes: duration,
            distance_km: Some(distance),
            target_pace: Some(pace),
            intervals,
            completion: None,
            planned: None,
        }
    }

    fn build_intervals(
        total_distance: Decimal,
        phase: Phase,
        pace: PaceBand,
    ) -> Vec<IntervalSegment> {
        let segment = Self::interval_segment_km(phase);
        let repeats = (total_distance / segment).round().to_u32().unwrap_or(3).max(1);
        (0..repeats)
            .map(|_| IntervalSegment {
                distance_km: segment,
                pace,
                rest_seconds: 90,
            })
            .collect()
    }

    fn duration_minutes(
        kind: WorkoutKind,
        distance: Decimal,
        pace: &PaceBand,
        intervals: Option<&[IntervalSegment]>,
    ) -> u32 {
        let running = (distance * pace.midpoint()).round().to_u32().unwrap_or(30);
        match kind {
            WorkoutKind::Interval => {
                let rest_minutes = intervals
                    .map(|segs| segs.iter().map(|s| s.rest_seconds).sum::<u32>() / 60)
                    .unwrap_or(0);
                // Plus warmup and cooldown around the repeats
                running + rest_minutes + 15
            }
            _ => running.max(15),
        }
    }

    fn describe(kind: WorkoutKind, distance: Decimal, phase: Phase) -> (String, String) {
        match kind {
            WorkoutKind::Easy => (
                "Easy Run".to_string(),
                "Keep it conversational. Relaxed effort, nose-breathing pace.".to_string(),
            ),
            WorkoutKind::Recovery => (
                "Active Recovery".to_string(),
                "Very easy jog. Focus on blood flow and loosening up.".to_string(),
            ),
            WorkoutKind::Tempo => (
                "Tempo Run".to_string(),
                "Comfortably hard effort. You should manage short sentences only.".to_string(),
            ),
            WorkoutKind::Interval => {
                let segment = Self::interval_segment_km(phase);
                let repeats = (distance / segment).round().to_u32().unwrap_or(3);
                let metres = (segment * dec!(1000)).to_u32().unwrap_or(800);
                (
                    format!("{}x{}m Repeats", repeats, metres),
                    "Speed work with jog recoveries. Warm up and cool down well.".to_string(),
                )
            }
            WorkoutKind::Long => (
                "Long Run".to_string(),
                "Building endurance at a comfortable pace. Time on feet is the goal.".to_string(),
            ),
            WorkoutKind::Race => (
                "Race".to_string(),
                "Race day. Trust the training and pace it evenly.".to_string(),
            ),
        }
    }
}
