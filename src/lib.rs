//! RunPlan - adaptive training plan engine for runners
//!
//! RunPlan turns a validated runner profile into a phased multi-week
//! training plan, fills each week with concrete workouts, adapts the
//! current week to daily stress/sleep readiness, and produces short
//! advisory coach messages. All load math uses decimal arithmetic and
//! every operation is deterministic for a given input.

pub mod assignment;
pub mod catalog;
pub mod coach;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod pace;
pub mod periodization;
pub mod profile;
pub mod progress;
pub mod readiness;
pub mod storage;

pub use crate::config::PlannerConfig;
pub use crate::engine::TrainingEngine;
pub use crate::error::{Result, RunPlanError};
pub use crate::models::{
    CoachMessage, ExperienceLevel, Phase, RaceDistance, RaceGoal, RunnerProfile, StressEntry,
    TrainingPlan, TrainingWeek, Workout, WorkoutCompletion, WorkoutKind,
};
pub use crate::readiness::ReadinessBand;
pub use crate::storage::{MemoryStore, PlanStore, SqliteStore};
