//! Target pace derivation.
//!
//! Each workout type maps to a pace band derived from the runner's
//! personal records with fixed offsets from 5K pace. When no usable
//! record exists the band falls back to an experience-level default.
//! Paces are decimal minutes per kilometre.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{ExperienceLevel, PaceBand, PersonalRecords, RaceDistance, WorkoutKind};

/// Derives per-workout-type pace bands for one runner
pub struct PaceCalculator;

impl PaceCalculator {
    /// Pace band for a workout type.
    ///
    /// Offsets are applied to the runner's 5K pace (actual or estimated
    /// from another record); without any record, an experience-level
    /// reference pace is used instead.
    pub fn band_for(
        kind: WorkoutKind,
        records: &PersonalRecords,
        experience: ExperienceLevel,
    ) -> PaceBand {
        let reference = Self::reference_pace(records, experience);
        let (lower_offset, upper_offset) = match kind {
            WorkoutKind::Interval => (dec!(-0.15), dec!(0.00)),
            WorkoutKind::Tempo => (dec!(0.25), dec!(0.40)),
            WorkoutKind::Race => (dec!(0.05), dec!(0.15)),
            WorkoutKind::Long => (dec!(0.75), dec!(1.25)),
            WorkoutKind::Easy => (dec!(1.00), dec!(1.50)),
            WorkoutKind::Recovery => (dec!(1.50), dec!(2.00)),
        };
        PaceBand {
            lower: (reference + lower_offset).round_dp(2),
            upper: (reference + upper_offset).round_dp(2),
        }
    }

    /// The runner's 5K pace in minutes per km, estimated when necessary.
    ///
    /// Records for longer distances are converted with a fixed per-class
    /// offset; preference order is 5K, 10K, half, marathon.
    pub fn reference_pace(records: &PersonalRecords, experience: ExperienceLevel) -> Decimal {
        let candidates = [
            (RaceDistance::FiveK, dec!(0.00)),
            (RaceDistance::TenK, dec!(0.10)),
            (RaceDistance::HalfMarathon, dec!(0.25)),
            (RaceDistance::Marathon, dec!(0.45)),
        ];
        for (distance, offset) in candidates {
            if let Some(seconds) = records.for_distance(distance) {
                return (Self::pace_of(seconds, distance) - offset).round_dp(2);
            }
        }
        Self::default_reference(experience)
    }

    /// Per-km pace of a recorded race time
    pub fn pace_of(seconds: u32, distance: RaceDistance) -> Decimal {
        (Decimal::from(seconds) / dec!(60) / distance.distance_km()).round_dp(2)
    }

    /// Experience-level 5K reference pace used when no records exist
    fn default_reference(experience: ExperienceLevel) -> Decimal {
        match experience {
            ExperienceLevel::Beginner => dec!(6.40),
            ExperienceLevel::Intermediate => dec!(5.40),
            ExperienceLevel::Advanced => dec!(4.50),
        }
    }
}
