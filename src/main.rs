use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use runplan::logging::{init_logging, LogConfig, LogLevel};
use runplan::profile::{RawPersonalRecords, RawProfile, RawRaceGoal};
use runplan::progress::ProgressTracker;
use runplan::readiness::{readiness_score, ReadinessBand};
use runplan::{catalog, PlannerConfig, PlanStore, SqliteStore, StressEntry, TrainingEngine,
    TrainingPlan, WorkoutCompletion};

/// RunPlan - Adaptive Training Plan CLI
///
/// Generates phased running plans from a runner profile, adjusts the
/// current week to daily stress/sleep readiness, and tracks progress.
#[derive(Parser)]
#[command(name = "runplan")]
#[command(version = "0.1.0")]
#[command(about = "Adaptive training plan CLI", long_about = None)]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update a runner profile
    Onboard {
        /// Runner identifier
        #[arg(short, long)]
        runner: String,

        #[arg(long)]
        age: i64,

        /// Height in centimetres
        #[arg(long)]
        height: i64,

        /// Weight in kilograms
        #[arg(long)]
        weight: Decimal,

        /// beginner, intermediate, or advanced
        #[arg(short, long)]
        experience: String,

        /// Current weekly volume in kilometres
        #[arg(short = 'm', long)]
        mileage: Decimal,

        /// Available weekdays, 1=Monday .. 7=Sunday (e.g. 1,3,5,6)
        #[arg(short, long, value_delimiter = ',')]
        days: Vec<i64>,

        #[arg(long)]
        injury_history: Option<String>,

        /// 5K PR as mm:ss
        #[arg(long)]
        five_k: Option<String>,

        /// 10K PR as mm:ss
        #[arg(long)]
        ten_k: Option<String>,

        /// Half marathon PR as h:mm:ss
        #[arg(long)]
        half_marathon: Option<String>,

        /// Marathon PR as h:mm:ss
        #[arg(long)]
        marathon: Option<String>,

        /// Goal race distance (5k, 10k, half, marathon)
        #[arg(short, long)]
        goal: Option<String>,

        /// Goal race date (YYYY-MM-DD)
        #[arg(long)]
        goal_date: Option<NaiveDate>,

        /// Goal finish time
        #[arg(long)]
        goal_time: Option<String>,
    },

    /// Generate a fresh training plan from the stored profile
    Generate {
        #[arg(short, long)]
        runner: String,
    },

    /// Display the current plan
    Show {
        #[arg(short, long)]
        runner: String,

        /// Show one week's workouts instead of the week overview
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// Show today's scheduled workout
    Today {
        #[arg(short, long)]
        runner: String,
    },

    /// Log today's stress/sleep and adjust the current week
    Stress {
        #[arg(short, long)]
        runner: String,

        /// Stress level, 1 (calm) to 5 (maxed out)
        #[arg(short, long)]
        stress: u8,

        /// Sleep quality, 1 (poor) to 5 (great)
        #[arg(long)]
        sleep: Option<u8>,

        /// Entry date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a workout as completed
    Complete {
        #[arg(short, long)]
        runner: String,

        /// Workout id (see `show --week N`)
        #[arg(short, long)]
        workout: String,

        /// Actual distance in kilometres
        #[arg(long)]
        distance: Option<Decimal>,

        /// Actual duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Get a coach message
    Coach {
        #[arg(short, long)]
        runner: String,
    },

    /// Show progress statistics
    Progress {
        #[arg(short, long)]
        runner: String,
    },

    /// Browse program content
    Catalog {
        /// challenges, nutrition, strength, or leaderboard
        #[arg(default_value = "challenges")]
        section: String,

        /// Filter nutrition tips: pre-run, post-run, race-day, hydration
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Week")]
    week: u32,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Focus")]
    focus: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Target km")]
    target: String,
}

#[derive(Tabled)]
struct WorkoutRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Id")]
    id: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_logging(&LogConfig {
        level: log_level,
        ..LogConfig::default()
    })?;

    let db_path = match cli.database {
        Some(path) => path,
        None => default_db_path()?,
    };
    let mut store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    let engine = TrainingEngine::new(PlannerConfig::load_or_default());
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Onboard {
            runner,
            age,
            height,
            weight,
            experience,
            mileage,
            days,
            injury_history,
            five_k,
            ten_k,
            half_marathon,
            marathon,
            goal,
            goal_date,
            goal_time,
        } => {
            let race_goal = match (goal, goal_date) {
                (Some(distance), Some(target_date)) => Some(RawRaceGoal {
                    distance,
                    target_date,
                    target_time: goal_time,
                }),
                (Some(_), None) => {
                    return Err(anyhow!("--goal requires --goal-date"));
                }
                _ => None,
            };
            let raw = RawProfile {
                runner_id: runner,
                age: Some(age),
                height_cm: Some(height),
                weight_kg: Some(weight),
                experience_level: Some(experience),
                weekly_mileage_km: Some(mileage),
                available_days: days,
                injury_history,
                personal_records: RawPersonalRecords {
                    five_k,
                    ten_k,
                    half_marathon,
                    marathon,
                },
                race_goal,
            };
            match engine.onboard(&mut store, &raw, Utc::now()) {
                Ok(profile) => {
                    println!(
                        "{}",
                        format!("✓ Profile saved for {}", profile.id).green()
                    );
                    println!(
                        "  {} runner, {} km/week, {} training days",
                        profile.experience_level,
                        profile.weekly_mileage_km,
                        profile.available_days.len()
                    );
                }
                Err(err) => {
                    eprintln!("{}", err.user_message().red());
                    std::process::exit(1);
                }
            }
        }

        Commands::Generate { runner } => {
            let plan = engine.regenerate_plan(&mut store, &runner, today)?;
            println!("{}", format!("✓ {}", plan.name).green().bold());
            println!(
                "  {} weeks, {} to {}",
                plan.weeks.len(),
                plan.start_date,
                plan.end_date
            );
            print_week_overview(&plan);
        }

        Commands::Show { runner, week } => {
            let (plan, _) = store.load_plan(&runner)?;
            println!("{}", plan.name.bold());
            match week {
                None => print_week_overview(&plan),
                Some(number) => {
                    let week = plan
                        .weeks
                        .iter()
                        .find(|w| w.week_number == number)
                        .ok_or_else(|| anyhow!("no week {number} in this plan"))?;
                    println!(
                        "Week {} - {} ({} km target)",
                        week.week_number, week.focus, week.target_mileage_km
                    );
                    let rows: Vec<WorkoutRow> = week
                        .workouts
                        .iter()
                        .map(|scheduled| {
                            let workout = &scheduled.workout;
                            WorkoutRow {
                                day: week.date_of(scheduled.day).format("%a %d %b").to_string(),
                                kind: workout.kind.to_string(),
                                title: workout.title.clone(),
                                distance: workout
                                    .distance_km
                                    .map(|d| format!("{d} km"))
                                    .unwrap_or_default(),
                                duration: format!("{} min", workout.duration_minutes),
                                pace: workout
                                    .target_pace
                                    .map(|band| band.to_string())
                                    .unwrap_or_default(),
                                status: if workout.is_completed() {
                                    "done".green().to_string()
                                } else if workout.planned.is_some() {
                                    "adjusted".yellow().to_string()
                                } else {
                                    "planned".to_string()
                                },
                                id: workout.id.clone(),
                            }
                        })
                        .collect();
                    println!("{}", Table::new(rows).with(Style::rounded()));
                }
            }
        }

        Commands::Today { runner } => {
            match engine.todays_workout(&store, &runner, today)? {
                Some(workout) => {
                    println!("{}", workout.title.bold());
                    println!("  {}", workout.description);
                    if let Some(distance) = workout.distance_km {
                        println!("  Distance: {} km", distance);
                    }
                    println!("  Duration: {} min", workout.duration_minutes);
                    if let Some(pace) = workout.target_pace {
                        println!("  Target pace: {}", pace);
                    }
                    if let Some(intervals) = &workout.intervals {
                        println!("  Repeats:");
                        for (index, segment) in intervals.iter().enumerate() {
                            println!(
                                "    {}. {} km at {} ({}s rest)",
                                index + 1,
                                segment.distance_km,
                                segment.pace,
                                segment.rest_seconds
                            );
                        }
                    }
                }
                None => println!("{}", "Rest day - no workout scheduled.".dimmed()),
            }
        }

        Commands::Stress {
            runner,
            stress,
            sleep,
            date,
            notes,
        } => {
            let entry = StressEntry {
                runner_id: runner,
                date: date.unwrap_or(today),
                stress_level: stress,
                sleep_quality: sleep,
                notes,
            };
            match engine.apply_readiness_entry(&mut store, &entry) {
                Ok(_) => {
                    let band = ReadinessBand::from_entry(&entry);
                    let score = readiness_score(&entry);
                    let label = match band {
                        ReadinessBand::Low => format!("{band}").red(),
                        ReadinessBand::Moderate => format!("{band}").yellow(),
                        ReadinessBand::High => format!("{band}").green(),
                    };
                    println!("✓ Readiness {} (score {}/10)", label, score);
                    if band == ReadinessBand::Low {
                        println!(
                            "  {}",
                            "Remaining quality sessions this week were eased off.".yellow()
                        );
                    }
                }
                Err(err) => {
                    eprintln!("{}", err.user_message().red());
                    std::process::exit(1);
                }
            }
        }

        Commands::Complete {
            runner,
            workout,
            distance,
            duration,
        } => {
            let completion = WorkoutCompletion {
                completed_at: Utc::now(),
                actual_distance_km: distance,
                actual_duration_minutes: duration,
            };
            match engine.complete_workout(&mut store, &runner, &workout, completion) {
                Ok(_) => println!("{}", "✓ Workout completed. Nice work!".green()),
                Err(err) => {
                    eprintln!("{}", err.user_message().red());
                    std::process::exit(1);
                }
            }
        }

        Commands::Coach { runner } => {
            let message = engine.coach_message(&store, &runner, today, Utc::now())?;
            let tag = format!("[{:?}]", message.kind).to_lowercase();
            println!("{} {}", tag.cyan(), message.content);
        }

        Commands::Progress { runner } => {
            let (plan, _) = store.load_plan(&runner)?;
            let stats = ProgressTracker::stats(&plan, today);
            println!("{}", "Progress".bold());
            println!("  This week:  {} km", stats.weekly_mileage_km);
            println!("  This month: {} km", stats.monthly_mileage_km);
            println!("  Total runs: {}", stats.total_runs);
            if let Some(pace) = &stats.average_pace {
                println!("  Avg pace:   {}", pace);
            }
            println!("  Streak:     {} days", stats.streak_days);
            println!("  Last 7 days:");
            for day in &stats.weekly_data {
                println!("    {} {:>6} km", day.day, day.distance_km);
            }
        }

        Commands::Catalog { section, category } => match section.as_str() {
            "challenges" => {
                for challenge in catalog::challenges() {
                    println!("{}", challenge.title.bold());
                    println!("  {}", challenge.description);
                    println!(
                        "  Target: {} {} · {} participants",
                        challenge.target, challenge.unit, challenge.participants
                    );
                }
            }
            "nutrition" => {
                let tips = match &category {
                    Some(raw) => {
                        let parsed = raw.parse().map_err(|e: String| anyhow!(e))?;
                        catalog::tips_in_category(parsed)
                    }
                    None => catalog::nutrition_tips(),
                };
                for tip in tips {
                    println!("{}", tip.title.bold());
                    println!("  {}", tip.content);
                    if let Some(timing) = tip.timing {
                        println!("  When: {}", timing);
                    }
                }
            }
            "strength" => {
                for routine in catalog::strength_routines() {
                    println!(
                        "{} ({} min, {:?})",
                        routine.name.bold(),
                        routine.duration_minutes,
                        routine.difficulty
                    );
                    for exercise in routine.exercises {
                        println!(
                            "  {} - {}x{} ({})",
                            exercise.name, exercise.sets, exercise.reps, exercise.description
                        );
                    }
                }
            }
            "leaderboard" => {
                for entry in catalog::leaderboard() {
                    println!(
                        "  {:>2}. {:<12} {:>7} km",
                        entry.rank, entry.runner_name, entry.distance_km
                    );
                }
            }
            other => return Err(anyhow!("unknown catalog section: {other}")),
        },
    }

    Ok(())
}

fn print_week_overview(plan: &TrainingPlan) {
    let rows: Vec<WeekRow> = plan
        .weeks
        .iter()
        .map(|week| WeekRow {
            week: week.week_number,
            phase: if week.is_recovery_week {
                format!("{} (recovery)", week.phase)
            } else {
                week.phase.to_string()
            },
            focus: week.focus.clone(),
            starts: week.start_date.format("%d %b").to_string(),
            target: week.target_mileage_km.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn default_db_path() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("could not determine the platform data directory")?
        .join("runplan");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("runplan.db"))
}
