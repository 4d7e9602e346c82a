//! Periodized week planning.
//!
//! Divides the weeks until a race into Base, Build, Peak and Taper
//! phases, ramps weekly mileage under a hard 10% week-over-week growth
//! ceiling toward a peak scaled by goal distance and experience, inserts
//! periodic recovery weeks, and tapers to 40-60% of peak before the
//! race. Without a race goal it produces an open-ended fitness block
//! with no taper.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{Result, ValidationError};
use crate::models::{ExperienceLevel, Phase, RaceDistance, RunnerProfile};

/// A planned week before workouts are assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekShell {
    pub week_number: u32,
    pub phase: Phase,
    pub focus: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_mileage_km: Decimal,
    pub is_recovery_week: bool,
}

/// Number of weeks allocated to each phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAllocation {
    pub base: u32,
    pub build: u32,
    pub peak: u32,
    pub taper: u32,
}

/// Week-shell generator
pub struct PeriodizationPlanner;

impl PeriodizationPlanner {
    /// Plan the week shells for a runner.
    ///
    /// `goal` carries the target distance; `target_date` defaults to the
    /// configured horizon when absent. Without a goal an open-ended
    /// fitness plan (Base/Build/Peak, no taper) is produced.
    pub fn plan_weeks(
        profile: &RunnerProfile,
        goal: Option<RaceDistance>,
        target_date: Option<NaiveDate>,
        today: NaiveDate,
        config: &PlannerConfig,
    ) -> Result<Vec<WeekShell>> {
        let start = week_start(today);

        let (total_weeks, allocation) = match goal {
            Some(_) => {
                let target =
                    target_date.unwrap_or(today + Duration::days(config.default_horizon_days));
                if target <= today {
                    return Err(ValidationError::InvalidField {
                        field: "target_date",
                        reason: format!("{} is not in the future", target),
                    }
                    .into());
                }
                let weeks_until = ((target - start).num_days() as f64 / 7.0).ceil() as u32;
                let total = weeks_until.clamp(config.min_plan_weeks, config.max_plan_weeks);
                (total, Self::allocate_phases(total, true))
            }
            None => {
                let total = config.open_plan_weeks;
                (total, Self::allocate_phases(total, false))
            }
        };

        let starting_mileage = if profile.weekly_mileage_km == Decimal::ZERO {
            config.base_mileage_floor_km
        } else {
            profile.weekly_mileage_km
        };
        let peak_mileage = Self::peak_mileage(starting_mileage, goal, profile.experience_level);

        let mut weeks = Vec::with_capacity(total_weeks as usize);
        let mut trend = starting_mileage;
        let growth = Decimal::ONE + config.weekly_growth_cap;
        let taper_start = total_weeks - allocation.taper;

        for week_number in 1..=total_weeks {
            let phase = Self::phase_of(week_number, allocation);
            let week_start_date = start + Duration::weeks(i64::from(week_number) - 1);

            if week_number > 1 && phase != Phase::Taper {
                trend = (trend * growth).min(peak_mileage);
            }

            let is_recovery = phase != Phase::Taper
                && week_number % config.recovery_week_interval == 0
                && week_number > 1;

            let target = if phase == Phase::Taper {
                // Linear reduction from peak down to the taper floor
                let taper_index = Decimal::from(week_number - taper_start);
                let taper_len = Decimal::from(allocation.taper);
                let cut = (Decimal::ONE - config.taper_floor_fraction) * taper_index / taper_len;
                trend * (Decimal::ONE - cut)
            } else if is_recovery {
                // Overrides the growth schedule for this week only
                trend * (Decimal::ONE - config.recovery_reduction)
            } else {
                trend
            };

            weeks.push(WeekShell {
                week_number,
                phase,
                focus: Self::focus_of(phase, is_recovery).to_string(),
                start_date: week_start_date,
                end_date: week_start_date + Duration::days(6),
                target_mileage_km: target.round_dp(1),
                is_recovery_week: is_recovery,
            });
        }

        Ok(weeks)
    }

    /// Split a plan into phase lengths.
    ///
    /// Standard split is Base 40% / Build 30% / Peak 20% / Taper 10%
    /// with at least one week per phase. Plans shorter than four weeks
    /// collapse to Base, Peak, Taper. Open-ended plans have no taper and
    /// give its share to Peak.
    pub fn allocate_phases(total_weeks: u32, has_taper: bool) -> PhaseAllocation {
        if !has_taper {
            let base = ((total_weeks as f64 * 0.4).round() as u32).max(1);
            let build = ((total_weeks as f64 * 0.3).round() as u32).max(1);
            let peak = total_weeks.saturating_sub(base + build).max(1);
            // Rounding can overshoot on tiny plans; give base what remains
            let base = total_weeks.saturating_sub(build + peak);
            return PhaseAllocation {
                base,
                build,
                peak,
                taper: 0,
            };
        }

        if total_weeks < 4 {
            let taper = if total_weeks >= 2 { 1 } else { 0 };
            let peak = if total_weeks >= 3 { 1 } else { 0 };
            return PhaseAllocation {
                base: total_weeks - peak - taper,
                build: 0,
                peak,
                taper,
            };
        }

        let mut base = ((total_weeks as f64 * 0.4).round() as u32).max(1);
        let mut build = ((total_weeks as f64 * 0.3).round() as u32).max(1);
        let mut peak = ((total_weeks as f64 * 0.2).round() as u32).max(1);
        loop {
            let used = base + build + peak;
            if used < total_weeks {
                break;
            }
            // Taper needs at least one week; shrink the largest phase
            if base >= build && base >= peak && base > 1 {
                base -= 1;
            } else if build >= peak && build > 1 {
                build -= 1;
            } else {
                peak -= 1;
            }
        }
        PhaseAllocation {
            base,
            build,
            peak,
            taper: total_weeks - base - build - peak,
        }
    }

    /// Peak weekly mileage scaled by goal distance and experience
    fn peak_mileage(
        starting: Decimal,
        goal: Option<RaceDistance>,
        experience: ExperienceLevel,
    ) -> Decimal {
        let goal_factor = match goal {
            Some(RaceDistance::FiveK) => dec!(1.3),
            Some(RaceDistance::TenK) => dec!(1.5),
            Some(RaceDistance::HalfMarathon) => dec!(1.8),
            Some(RaceDistance::Marathon) => dec!(2.2),
            None => dec!(1.4),
        };
        let experience_factor = match experience {
            ExperienceLevel::Beginner => dec!(0.85),
            ExperienceLevel::Intermediate => dec!(1.0),
            ExperienceLevel::Advanced => dec!(1.15),
        };
        (starting * goal_factor * experience_factor).max(starting)
    }

    fn phase_of(week_number: u32, allocation: PhaseAllocation) -> Phase {
        if week_number <= allocation.base {
            Phase::Base
        } else if week_number <= allocation.base + allocation.build {
            Phase::Build
        } else if week_number <= allocation.base + allocation.build + allocation.peak {
            Phase::Peak
        } else {
            Phase::Taper
        }
    }

    fn focus_of(phase: Phase, is_recovery: bool) -> &'static str {
        if is_recovery {
            return "Recovery week";
        }
        match phase {
            Phase::Base => "Aerobic base",
            Phase::Build => "Threshold development",
            Phase::Peak => "Race-specific sharpening",
            Phase::Taper => "Freshen up",
        }
    }
}

/// Monday on or before the given date; plan weeks run Monday to Sunday
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().number_from_monday()) - 1)
}
