use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runner experience levels used for pace fallbacks and peak mileage scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "beginner"),
            ExperienceLevel::Intermediate => write!(f, "intermediate"),
            ExperienceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

/// Standard race distance classes a plan can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceDistance {
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
}

impl RaceDistance {
    /// Race distance in kilometres
    pub fn distance_km(&self) -> Decimal {
        match self {
            RaceDistance::FiveK => Decimal::new(5, 0),
            RaceDistance::TenK => Decimal::new(10, 0),
            RaceDistance::HalfMarathon => Decimal::new(211, 1),
            RaceDistance::Marathon => Decimal::new(422, 1),
        }
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceDistance::FiveK => write!(f, "5K"),
            RaceDistance::TenK => write!(f, "10K"),
            RaceDistance::HalfMarathon => write!(f, "Half Marathon"),
            RaceDistance::Marathon => write!(f, "Marathon"),
        }
    }
}

/// Personal record times in seconds for the standard distances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalRecords {
    pub five_k: Option<u32>,
    pub ten_k: Option<u32>,
    pub half_marathon: Option<u32>,
    pub marathon: Option<u32>,
}

impl PersonalRecords {
    /// Look up the record for a distance class, if recorded
    pub fn for_distance(&self, distance: RaceDistance) -> Option<u32> {
        match distance {
            RaceDistance::FiveK => self.five_k,
            RaceDistance::TenK => self.ten_k,
            RaceDistance::HalfMarathon => self.half_marathon,
            RaceDistance::Marathon => self.marathon,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.five_k.is_none()
            && self.ten_k.is_none()
            && self.half_marathon.is_none()
            && self.marathon.is_none()
    }
}

/// A target race the runner is training toward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceGoal {
    pub distance: RaceDistance,
    pub target_date: NaiveDate,

    /// Goal finish time in seconds, if the runner has one
    pub target_time: Option<u32>,
}

/// Canonical runner profile produced by onboarding validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerProfile {
    /// Unique runner identifier
    pub id: String,

    pub age: u8,

    /// Height in centimetres
    pub height_cm: u16,

    /// Weight in kilograms
    pub weight_kg: Decimal,

    pub experience_level: ExperienceLevel,

    /// Current weekly running volume in kilometres
    pub weekly_mileage_km: Decimal,

    /// Weekday numbers (1=Monday .. 7=Sunday) the runner can train on.
    /// Sorted, deduplicated, always at least two entries.
    pub available_days: Vec<u8>,

    pub injury_history: Option<String>,

    pub personal_records: PersonalRecords,

    pub race_goal: Option<RaceGoal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workout categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Easy,
    Tempo,
    Interval,
    Long,
    Recovery,
    Race,
}

impl WorkoutKind {
    /// Whether this is a quality (higher-intensity) session
    pub fn is_quality(&self) -> bool {
        matches!(
            self,
            WorkoutKind::Tempo | WorkoutKind::Interval | WorkoutKind::Race
        )
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutKind::Easy => write!(f, "easy"),
            WorkoutKind::Tempo => write!(f, "tempo"),
            WorkoutKind::Interval => write!(f, "interval"),
            WorkoutKind::Long => write!(f, "long"),
            WorkoutKind::Recovery => write!(f, "recovery"),
            WorkoutKind::Race => write!(f, "race"),
        }
    }
}

/// A pace window in minutes per kilometre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceBand {
    /// Faster bound (smaller number)
    pub lower: Decimal,
    /// Slower bound
    pub upper: Decimal,
}

impl PaceBand {
    pub fn midpoint(&self) -> Decimal {
        (self.lower + self.upper) / Decimal::TWO
    }
}

impl fmt::Display for PaceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}/km",
            format_pace(self.lower),
            format_pace(self.upper)
        )
    }
}

/// Format a decimal minutes-per-km pace as m:ss
pub fn format_pace(minutes_per_km: Decimal) -> String {
    use rust_decimal::prelude::ToPrimitive;
    let total_seconds = (minutes_per_km * Decimal::new(60, 0))
        .round()
        .to_i64()
        .unwrap_or(0)
        .max(0);
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// One repeat within an interval workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSegment {
    pub distance_km: Decimal,
    pub pace: PaceBand,
    pub rest_seconds: u32,
}

/// Completion record attached to a workout once it has been done
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCompletion {
    pub completed_at: DateTime<Utc>,
    pub actual_distance_km: Option<Decimal>,
    pub actual_duration_minutes: Option<u32>,
}

/// The originally planned shape of a workout slot.
///
/// Captured the first time a readiness adjustment rewrites a workout so
/// later entries are always evaluated against the planned session rather
/// than compounding on a previous adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSnapshot {
    pub kind: WorkoutKind,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub distance_km: Option<Decimal>,
    pub target_pace: Option<PaceBand>,
    pub intervals: Option<Vec<IntervalSegment>>,
}

/// A single scheduled training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique workout identifier
    pub id: String,

    pub kind: WorkoutKind,

    pub title: String,

    pub description: String,

    /// Planned duration in minutes
    pub duration_minutes: u32,

    /// Planned distance in kilometres
    pub distance_km: Option<Decimal>,

    pub target_pace: Option<PaceBand>,

    /// Repeat structure for interval sessions
    pub intervals: Option<Vec<IntervalSegment>>,

    /// Present once the workout has been completed
    pub completion: Option<WorkoutCompletion>,

    /// Original planned values, present only after a readiness adjustment
    pub planned: Option<PlannedSnapshot>,
}

impl Workout {
    pub fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    /// Snapshot of the planned session: the stored snapshot if an
    /// adjustment already ran, otherwise the current values.
    pub fn planned_snapshot(&self) -> PlannedSnapshot {
        self.planned.clone().unwrap_or(PlannedSnapshot {
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            duration_minutes: self.duration_minutes,
            distance_km: self.distance_km,
            target_pace: self.target_pace,
            intervals: self.intervals.clone(),
        })
    }
}

/// Training plan phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Base,
    Build,
    Peak,
    Taper,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Base => write!(f, "Base"),
            Phase::Build => write!(f, "Build"),
            Phase::Peak => write!(f, "Peak"),
            Phase::Taper => write!(f, "Taper"),
        }
    }
}

/// A workout bound to a weekday slot within a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledWorkout {
    /// Weekday number (1=Monday .. 7=Sunday), unique within the week
    pub day: u8,
    pub workout: Workout,
}

/// One week of a training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingWeek {
    /// 1-based position within the plan
    pub week_number: u32,

    pub phase: Phase,

    /// Short description of the week's emphasis
    pub focus: String,

    /// Monday of this week
    pub start_date: NaiveDate,

    /// Sunday of this week
    pub end_date: NaiveDate,

    /// Target volume in kilometres
    pub target_mileage_km: Decimal,

    pub is_recovery_week: bool,

    pub workouts: Vec<ScheduledWorkout>,
}

impl TrainingWeek {
    /// Calendar date of a weekday slot within this week
    pub fn date_of(&self, day: u8) -> NaiveDate {
        self.start_date + Duration::days(i64::from(day) - 1)
    }

    /// Whether a calendar date falls inside this week
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Sum of planned workout distances
    pub fn assigned_distance_km(&self) -> Decimal {
        self.workouts
            .iter()
            .filter_map(|s| s.workout.distance_km)
            .sum()
    }
}

/// A complete generated training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: String,

    /// Owning runner
    pub runner_id: String,

    pub name: String,

    /// Target distance class; None for an open-ended fitness plan
    pub goal: Option<RaceDistance>,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Contiguous weeks, week_number strictly increasing from 1
    pub weeks: Vec<TrainingWeek>,

    pub created_at: DateTime<Utc>,
}

impl TrainingPlan {
    /// The week containing a given date, if any
    pub fn week_containing(&self, date: NaiveDate) -> Option<&TrainingWeek> {
        self.weeks.iter().find(|w| w.contains(date))
    }

    pub fn week_containing_mut(&mut self, date: NaiveDate) -> Option<&mut TrainingWeek> {
        self.weeks.iter_mut().find(|w| w.contains(date))
    }

    /// Locate a workout anywhere in the plan by id
    pub fn find_workout_mut(&mut self, workout_id: &str) -> Option<&mut Workout> {
        self.weeks
            .iter_mut()
            .flat_map(|w| w.workouts.iter_mut())
            .map(|s| &mut s.workout)
            .find(|w| w.id == workout_id)
    }
}

/// Daily self-reported stress/sleep entry.
///
/// One entry per runner per date; a later entry for the same date
/// replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressEntry {
    pub runner_id: String,
    pub date: NaiveDate,

    /// 1 (best) to 5 (worst)
    pub stress_level: u8,

    /// 1 (worst) to 5 (best)
    pub sleep_quality: Option<u8>,

    pub notes: Option<String>,
}

/// Advisory message categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Motivation,
    Tip,
    Feedback,
    Warning,
}

/// Short advisory text from the coach layer; never mutates the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachMessage {
    pub id: String,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_race_distance_km() {
        assert_eq!(RaceDistance::FiveK.distance_km(), dec!(5));
        assert_eq!(RaceDistance::HalfMarathon.distance_km(), dec!(21.1));
        assert_eq!(RaceDistance::Marathon.distance_km(), dec!(42.2));
    }

    #[test]
    fn test_experience_level_serialization() {
        let json = serde_json::to_string(&ExperienceLevel::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
        let level: ExperienceLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(level, ExperienceLevel::Intermediate);
    }

    #[test]
    fn test_workout_kind_quality() {
        assert!(WorkoutKind::Tempo.is_quality());
        assert!(WorkoutKind::Interval.is_quality());
        assert!(!WorkoutKind::Easy.is_quality());
        assert!(!WorkoutKind::Long.is_quality());
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(dec!(5.5)), "5:30");
        assert_eq!(format_pace(dec!(6.0)), "6:00");
        assert_eq!(format_pace(dec!(4.25)), "4:15");
    }

    #[test]
    fn test_pace_band_display() {
        let band = PaceBand {
            lower: dec!(5.25),
            upper: dec!(5.5),
        };
        assert_eq!(band.to_string(), "5:15-5:30/km");
        assert_eq!(band.midpoint(), dec!(5.375));
    }

    #[test]
    fn test_personal_records_lookup() {
        let prs = PersonalRecords {
            five_k: Some(1320),
            half_marathon: Some(6300),
            ..Default::default()
        };
        assert_eq!(prs.for_distance(RaceDistance::FiveK), Some(1320));
        assert_eq!(prs.for_distance(RaceDistance::TenK), None);
        assert!(!prs.is_empty());
        assert!(PersonalRecords::default().is_empty());
    }

    #[test]
    fn test_week_date_helpers() {
        let week = TrainingWeek {
            week_number: 1,
            phase: Phase::Base,
            focus: "Aerobic base".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), // a Monday
            end_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            target_mileage_km: dec!(30),
            is_recovery_week: false,
            workouts: Vec::new(),
        };
        assert_eq!(
            week.date_of(1),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        assert_eq!(
            week.date_of(7),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert!(week.contains(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()));
        assert!(!week.contains(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
    }

    #[test]
    fn test_planned_snapshot_falls_back_to_current_values() {
        let workout = Workout {
            id: "w1".to_string(),
            kind: WorkoutKind::Tempo,
            title: "Tempo Run".to_string(),
            description: "Comfortably hard".to_string(),
            duration_minutes: 45,
            distance_km: Some(dec!(8)),
            target_pace: None,
            intervals: None,
            completion: None,
            planned: None,
        };
        let snap = workout.planned_snapshot();
        assert_eq!(snap.kind, WorkoutKind::Tempo);
        assert_eq!(snap.duration_minutes, 45);
        assert_eq!(snap.distance_km, Some(dec!(8)));
    }
}
