//! Orchestration facade over the planning pipeline.
//!
//! `TrainingEngine` wires the normalizer, periodization planner,
//! workout assigner, readiness adjuster, and coach messenger together.
//! The pure operations (`generate_plan`, `adjust_for_readiness`,
//! `compose_coach_message`) hold no state between calls; the
//! store-mediated operations load through a `PlanStore`, apply a pure
//! operation, and persist with an optimistic version check.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::assignment::WorkoutAssigner;
use crate::coach::CoachMessenger;
use crate::config::PlannerConfig;
use crate::error::{NotFoundError, Result, RunPlanError, ValidationError};
use crate::models::{
    CoachMessage, RaceDistance, RunnerProfile, StressEntry, TrainingPlan, TrainingWeek, Workout,
    WorkoutCompletion,
};
use crate::periodization::{PeriodizationPlanner, WeekShell};
use crate::profile::{self, RawProfile};
use crate::readiness::{ReadinessAdjuster, ReadinessBand};
use crate::storage::PlanStore;

/// Stateless orchestrator for all plan operations
pub struct TrainingEngine {
    config: PlannerConfig,
}

impl TrainingEngine {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate a complete plan for a profile.
    ///
    /// `goal` and `target_date` default to the profile's race goal when
    /// not given; without either an open-ended fitness plan is produced.
    pub fn generate_plan(
        &self,
        profile: &RunnerProfile,
        goal: Option<RaceDistance>,
        target_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<TrainingPlan> {
        let goal = goal.or_else(|| profile.race_goal.as_ref().map(|g| g.distance));
        let target_date =
            target_date.or_else(|| profile.race_goal.as_ref().map(|g| g.target_date));

        let shells =
            PeriodizationPlanner::plan_weeks(profile, goal, target_date, today, &self.config)?;
        let weeks = WorkoutAssigner::assign(&shells, profile, &self.config)?;

        let (start_date, end_date) = match (weeks.first(), weeks.last()) {
            (Some(first), Some(last)) => (first.start_date, last.end_date),
            _ => {
                return Err(RunPlanError::Internal(
                    "periodization produced no weeks".to_string(),
                ))
            }
        };
        let name = match goal {
            Some(distance) => format!("{} Training Plan", distance),
            None => "Base Fitness Plan".to_string(),
        };

        info!(
            runner_id = %profile.id,
            weeks = weeks.len(),
            goal = ?goal,
            "plan generated"
        );

        Ok(TrainingPlan {
            id: Uuid::new_v4().to_string(),
            runner_id: profile.id.clone(),
            name,
            goal,
            start_date,
            end_date,
            weeks,
            created_at: Utc::now(),
        })
    }

    /// Fill week shells with concrete workouts. Used internally by
    /// `generate_plan` and independently testable.
    pub fn assign_workouts(
        &self,
        shells: &[WeekShell],
        profile: &RunnerProfile,
    ) -> Result<Vec<TrainingWeek>> {
        WorkoutAssigner::assign(shells, profile, &self.config)
    }

    /// Re-evaluate the current week against a readiness entry.
    /// Pure; the caller persists the returned plan.
    pub fn adjust_for_readiness(
        &self,
        plan: &TrainingPlan,
        entry: &StressEntry,
    ) -> Result<TrainingPlan> {
        ReadinessAdjuster::adjust(plan, entry, &self.config)
    }

    /// Compose an advisory message; the rotation cursor is derived from
    /// the date so the non-priority message changes daily but is stable
    /// within a day.
    pub fn compose_coach_message(
        band: Option<ReadinessBand>,
        just_completed_workout: bool,
        now: DateTime<Utc>,
    ) -> CoachMessage {
        let rotation = now.date_naive().num_days_from_ce().unsigned_abs() as usize;
        CoachMessenger::compose(band, just_completed_workout, rotation, now)
    }

    /// Validate a raw onboarding profile and persist the result
    pub fn onboard<S: PlanStore>(
        &self,
        store: &mut S,
        raw: &RawProfile,
        now: DateTime<Utc>,
    ) -> Result<RunnerProfile> {
        let profile = profile::normalize(raw, now)?;
        store.save_profile(&profile)?;
        Ok(profile)
    }

    /// Generate a fresh plan for a stored profile and persist it,
    /// replacing any previous plan
    pub fn regenerate_plan<S: PlanStore>(
        &self,
        store: &mut S,
        runner_id: &str,
        today: NaiveDate,
    ) -> Result<TrainingPlan> {
        let profile = store.load_profile(runner_id)?;
        let plan = self.generate_plan(&profile, None, None, today)?;
        let version = match store.load_plan(runner_id) {
            Ok((_, version)) => version,
            Err(RunPlanError::NotFound(_)) => crate::storage::NEW_PLAN_VERSION,
            Err(err) => return Err(err),
        };
        store.save_plan(&plan, version)?;
        Ok(plan)
    }

    /// Record a stress entry and apply it to the stored plan.
    ///
    /// The entry is stored even when no plan exists yet; in that case
    /// the plan lookup error propagates after the entry is saved.
    pub fn apply_readiness_entry<S: PlanStore>(
        &self,
        store: &mut S,
        entry: &StressEntry,
    ) -> Result<TrainingPlan> {
        crate::readiness::validate_entry(entry)?;
        store.record_stress_entry(entry)?;

        let (plan, version) = store.load_plan(&entry.runner_id)?;
        let adjusted = self.adjust_for_readiness(&plan, entry)?;
        if adjusted != plan {
            store.save_plan(&adjusted, version)?;
        }
        Ok(adjusted)
    }

    /// Mark a workout as completed and persist the plan
    pub fn complete_workout<S: PlanStore>(
        &self,
        store: &mut S,
        runner_id: &str,
        workout_id: &str,
        completion: WorkoutCompletion,
    ) -> Result<TrainingPlan> {
        let (mut plan, version) = store.load_plan(runner_id)?;
        let workout = plan.find_workout_mut(workout_id).ok_or_else(|| {
            RunPlanError::from(NotFoundError::Workout {
                workout_id: workout_id.to_string(),
            })
        })?;
        if workout.is_completed() {
            return Err(ValidationError::InvalidState {
                reason: format!("workout {workout_id} is already completed"),
            }
            .into());
        }
        workout.completion = Some(completion);
        store.save_plan(&plan, version)?;
        Ok(plan)
    }

    /// The workout scheduled for a given date, if any
    pub fn todays_workout<S: PlanStore>(
        &self,
        store: &S,
        runner_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Workout>> {
        let (plan, _) = store.load_plan(runner_id)?;
        let Some(week) = plan.week_containing(date) else {
            return Ok(None);
        };
        Ok(week
            .workouts
            .iter()
            .find(|scheduled| week.date_of(scheduled.day) == date)
            .map(|scheduled| scheduled.workout.clone()))
    }

    /// Compose a coach message from the runner's stored state: today's
    /// readiness entry and whether a workout was completed today
    pub fn coach_message<S: PlanStore>(
        &self,
        store: &S,
        runner_id: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CoachMessage> {
        let band = store
            .stress_entry_on(runner_id, today)?
            .map(|entry| ReadinessBand::from_entry(&entry));

        let just_completed = match store.load_plan(runner_id) {
            Ok((plan, _)) => plan
                .weeks
                .iter()
                .flat_map(|week| week.workouts.iter())
                .filter_map(|scheduled| scheduled.workout.completion.as_ref())
                .any(|completion| completion.completed_at.date_naive() == today),
            Err(RunPlanError::NotFound(_)) => false,
            Err(err) => return Err(err),
        };

        Ok(Self::compose_coach_message(band, just_completed, now))
    }
}
