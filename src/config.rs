use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tunable parameters for plan generation and adjustment.
///
/// Defaults follow common training practice (the 10% rule, 3:1 loading,
/// a 40-60% race taper). All values can be overridden from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Shortest plan that will be generated
    pub min_plan_weeks: u32,

    /// Longest plan that will be generated
    pub max_plan_weeks: u32,

    /// Horizon used when a race goal has no target date
    pub default_horizon_days: i64,

    /// Length of the open-ended plan generated without a race goal
    pub open_plan_weeks: u32,

    /// Hard ceiling on week-over-week mileage growth (0.10 = 10%)
    pub weekly_growth_cap: Decimal,

    /// Every Nth week is a recovery week
    pub recovery_week_interval: u32,

    /// Mileage reduction applied on recovery weeks (0.25 = 25% below trend)
    pub recovery_reduction: Decimal,

    /// Final taper week mileage as a fraction of peak
    pub taper_floor_fraction: Decimal,

    /// Weekly mileage floor for runners starting from zero (km)
    pub base_mileage_floor_km: Decimal,

    /// Preferred long-run day (1=Monday .. 7=Sunday)
    pub weekend_anchor_day: u8,

    /// Allowed deviation between assigned and target weekly mileage
    pub mileage_tolerance: Decimal,

    /// Long run share of weekly mileage
    pub long_run_ratio: Decimal,

    /// Tempo run share of weekly mileage
    pub tempo_ratio: Decimal,

    /// Interval work share of weekly mileage (before repeat rounding)
    pub interval_ratio: Decimal,

    /// Duration/distance multiplier applied on low-readiness days
    pub low_readiness_multiplier: Decimal,

    /// No adjustment may shorten a workout below this (minutes)
    pub min_workout_minutes: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_plan_weeks: 4,
            max_plan_weeks: 20,
            default_horizon_days: 90,
            open_plan_weeks: 8,
            weekly_growth_cap: dec!(0.10),
            recovery_week_interval: 4,
            recovery_reduction: dec!(0.25),
            taper_floor_fraction: dec!(0.5),
            base_mileage_floor_km: dec!(10),
            weekend_anchor_day: 6,
            mileage_tolerance: dec!(0.10),
            long_run_ratio: dec!(0.35),
            tempo_ratio: dec!(0.18),
            interval_ratio: dec!(0.15),
            low_readiness_multiplier: dec!(0.8),
            min_workout_minutes: 15,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: PlannerConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Default config path under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("runplan").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.min_plan_weeks == 0 || self.min_plan_weeks > self.max_plan_weeks {
            anyhow::bail!(
                "min_plan_weeks must be in 1..=max_plan_weeks (got {}..{})",
                self.min_plan_weeks,
                self.max_plan_weeks
            );
        }
        if !(1..=7).contains(&self.weekend_anchor_day) {
            anyhow::bail!(
                "weekend_anchor_day must be 1-7, got {}",
                self.weekend_anchor_day
            );
        }
        if self.weekly_growth_cap <= Decimal::ZERO || self.weekly_growth_cap >= Decimal::ONE {
            anyhow::bail!("weekly_growth_cap must be between 0 and 1");
        }
        if self.recovery_week_interval < 2 {
            anyhow::bail!("recovery_week_interval must be at least 2");
        }
        if self.open_plan_weeks < 3 {
            anyhow::bail!(
                "open_plan_weeks must be at least 3, got {}",
                self.open_plan_weeks
            );
        }
        Ok(())
    }
}
