//! Static content catalog: challenges, nutrition tips, strength
//! routines, and the community leaderboard.
//!
//! Plain records with category lookups. Nothing here is derived from a
//! runner's plan; the data is fixed program content.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// What a challenge measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Distance,
    Streak,
    Time,
}

/// A time-boxed community challenge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Challenge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: ChallengeKind,
    pub target: u32,
    pub unit: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub participants: u32,
}

/// Nutrition tip categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NutritionCategory {
    PreRun,
    PostRun,
    RaceDay,
    Hydration,
}

impl std::str::FromStr for NutritionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre-run" | "pre_run" => Ok(NutritionCategory::PreRun),
            "post-run" | "post_run" => Ok(NutritionCategory::PostRun),
            "race-day" | "race_day" => Ok(NutritionCategory::RaceDay),
            "hydration" => Ok(NutritionCategory::Hydration),
            other => Err(format!("unknown nutrition category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionTip {
    pub id: &'static str,
    pub category: NutritionCategory,
    pub title: &'static str,
    pub content: &'static str,
    pub timing: Option<&'static str>,
}

/// Strength routine difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exercise {
    pub name: &'static str,
    pub reps: u32,
    pub sets: u32,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthRoutine {
    pub id: &'static str,
    pub name: &'static str,
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
    pub target_areas: &'static [&'static str],
    pub exercises: &'static [Exercise],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub runner_name: &'static str,
    pub distance_km: Decimal,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "challenge-1",
            title: "January 100K",
            description: "Run 100 kilometers this month. Every kilometer counts!",
            kind: ChallengeKind::Distance,
            target: 100,
            unit: "km",
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 31),
            participants: 1234,
        },
        Challenge {
            id: "challenge-2",
            title: "7-Day Streak",
            description: "Run every day for 7 days straight. Any distance counts!",
            kind: ChallengeKind::Streak,
            target: 7,
            unit: "days",
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            participants: 856,
        },
        Challenge {
            id: "challenge-3",
            title: "Speed Demon",
            description: "Log 60 minutes of tempo or interval runs this week.",
            kind: ChallengeKind::Time,
            target: 60,
            unit: "min",
            start_date: date(2025, 1, 6),
            end_date: date(2025, 1, 12),
            participants: 423,
        },
    ]
}

pub fn nutrition_tips() -> Vec<NutritionTip> {
    vec![
        NutritionTip {
            id: "nutrition-1",
            category: NutritionCategory::PreRun,
            title: "Pre-Run Fueling",
            content: "Eat 2-3 hours before your run. Focus on easily digestible carbs \
                      with moderate protein. Avoid high fiber and fat close to your run.",
            timing: Some("2-3 hours before"),
        },
        NutritionTip {
            id: "nutrition-2",
            category: NutritionCategory::PreRun,
            title: "Quick Pre-Run Snack",
            content: "If you need a quick snack 30-60 minutes before, try a banana, \
                      toast with honey, or a small energy bar.",
            timing: Some("30-60 minutes before"),
        },
        NutritionTip {
            id: "nutrition-3",
            category: NutritionCategory::PostRun,
            title: "Recovery Window",
            content: "Consume protein and carbs within 30 minutes of finishing. Aim for \
                      a 3:1 or 4:1 carb-to-protein ratio.",
            timing: Some("Within 30 minutes"),
        },
        NutritionTip {
            id: "nutrition-4",
            category: NutritionCategory::PostRun,
            title: "Recovery Meal Ideas",
            content: "Greek yogurt with berries and granola, chocolate milk, or a \
                      turkey sandwich are excellent post-run options.",
            timing: None,
        },
        NutritionTip {
            id: "nutrition-5",
            category: NutritionCategory::RaceDay,
            title: "Race Morning",
            content: "Stick to familiar foods you've tested in training. Eat 3 hours \
                      before start time. Avoid experimenting with new foods.",
            timing: Some("3 hours before race"),
        },
        NutritionTip {
            id: "nutrition-6",
            category: NutritionCategory::Hydration,
            title: "Daily Hydration",
            content: "Aim for half your body weight in ounces of water daily. Increase \
                      during hot weather or intense training periods.",
            timing: None,
        },
    ]
}

pub fn tips_in_category(category: NutritionCategory) -> Vec<NutritionTip> {
    nutrition_tips()
        .into_iter()
        .filter(|tip| tip.category == category)
        .collect()
}

pub fn strength_routines() -> Vec<StrengthRoutine> {
    vec![
        StrengthRoutine {
            id: "strength-1",
            name: "Runner's Core Basics",
            duration_minutes: 15,
            difficulty: Difficulty::Easy,
            target_areas: &["core", "glutes"],
            exercises: &[
                Exercise {
                    name: "Plank",
                    reps: 30,
                    sets: 3,
                    description: "Hold a forearm plank position, keeping body straight",
                },
                Exercise {
                    name: "Glute Bridges",
                    reps: 15,
                    sets: 3,
                    description: "Lift hips toward ceiling, squeeze glutes at top",
                },
                Exercise {
                    name: "Bird Dogs",
                    reps: 10,
                    sets: 3,
                    description: "Extend opposite arm and leg while maintaining balance",
                },
                Exercise {
                    name: "Dead Bug",
                    reps: 10,
                    sets: 3,
                    description: "Lower opposite arm and leg while keeping core engaged",
                },
            ],
        },
        StrengthRoutine {
            id: "strength-2",
            name: "Lower Body Power",
            duration_minutes: 25,
            difficulty: Difficulty::Medium,
            target_areas: &["quads", "hamstrings", "glutes"],
            exercises: &[
                Exercise {
                    name: "Bodyweight Squats",
                    reps: 15,
                    sets: 3,
                    description: "Squat down until thighs are parallel to floor",
                },
                Exercise {
                    name: "Lunges",
                    reps: 12,
                    sets: 3,
                    description: "Alternate legs, step forward and lower back knee toward floor",
                },
                Exercise {
                    name: "Single-Leg Deadlift",
                    reps: 10,
                    sets: 3,
                    description: "Balance on one leg while hinging forward",
                },
                Exercise {
                    name: "Calf Raises",
                    reps: 20,
                    sets: 3,
                    description: "Rise up on toes, pause at top, lower slowly",
                },
                Exercise {
                    name: "Wall Sits",
                    reps: 45,
                    sets: 3,
                    description: "Hold seated position against wall (seconds)",
                },
            ],
        },
        StrengthRoutine {
            id: "strength-3",
            name: "Full Body Runner",
            duration_minutes: 30,
            difficulty: Difficulty::Hard,
            target_areas: &["core", "legs", "upper body"],
            exercises: &[
                Exercise {
                    name: "Burpees",
                    reps: 10,
                    sets: 3,
                    description: "Full burpee with push-up and jump",
                },
                Exercise {
                    name: "Mountain Climbers",
                    reps: 20,
                    sets: 3,
                    description: "Alternate driving knees toward chest in plank position",
                },
                Exercise {
                    name: "Jump Squats",
                    reps: 12,
                    sets: 3,
                    description: "Explosive squat with jump at top",
                },
                Exercise {
                    name: "Push-ups",
                    reps: 15,
                    sets: 3,
                    description: "Standard push-up, modify on knees if needed",
                },
                Exercise {
                    name: "Plank with Shoulder Taps",
                    reps: 20,
                    sets: 3,
                    description: "In plank, alternate tapping opposite shoulder",
                },
                Exercise {
                    name: "Split Jumps",
                    reps: 12,
                    sets: 3,
                    description: "Lunge position, jump and switch legs in air",
                },
            ],
        },
    ]
}

pub fn leaderboard() -> Vec<LeaderboardEntry> {
    vec![
        LeaderboardEntry {
            rank: 1,
            runner_name: "Sarah K.",
            distance_km: dec!(156.3),
        },
        LeaderboardEntry {
            rank: 2,
            runner_name: "Mike R.",
            distance_km: dec!(142.8),
        },
        LeaderboardEntry {
            rank: 3,
            runner_name: "Emma L.",
            distance_km: dec!(138.5),
        },
        LeaderboardEntry {
            rank: 4,
            runner_name: "David M.",
            distance_km: dec!(125.2),
        },
        LeaderboardEntry {
            rank: 5,
            runner_name: "Lisa W.",
            distance_km: dec!(118.9),
        },
        LeaderboardEntry {
            rank: 6,
            runner_name: "Tom H.",
            distance_km: dec!(62.4),
        },
        LeaderboardEntry {
            rank: 7,
            runner_name: "Anna P.",
            distance_km: dec!(58.1),
        },
    ]
}
