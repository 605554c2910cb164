#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

//! Generates training data, trains the plan classifier, assembles workout plans and recommends
//! weights for the next session.
//!
//! ```bash
//! liftplan generate --samples 1000 --seed 42
//! liftplan train
//! liftplan plan --goal strength --body-part Legs --body-part Back
//! liftplan log --item <PLAN_ITEM_ID> --reps 5 --weight 100 --rir 3
//! liftplan history "Barbell Bench Press"
//! liftplan calendar --year 2024 --month 3
//! ```

mod commands;
mod log;
mod settings;

use std::{io, path::PathBuf, process::ExitCode};

use ::log::{LevelFilter, error};
use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "liftplan",
    version,
    about = "Workout plan recommendations from a trained decision tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file
    #[arg(long, short = 'c', global = true, default_value = "liftplan.json")]
    config: PathBuf,

    /// User whose plans are read and written
    #[arg(long, global = true)]
    user: Option<Uuid>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a synthetic training data set
    Generate {
        /// Number of examples
        #[arg(long)]
        samples: Option<usize>,

        /// Seed of the random number generator
        #[arg(long)]
        seed: Option<u64>,

        /// Training data file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Train the plan classifier on the training data set
    Train {
        /// Training data file
        #[arg(long)]
        data: Option<PathBuf>,

        /// Maximum depth of the decision tree
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Generate and save a plan for a goal and a set of body parts
    Plan {
        /// Training goal (strength or hypertrophy)
        #[arg(long)]
        goal: String,

        /// Targeted body part (Legs, Chest, Arms, Back or Full Body)
        #[arg(long = "body-part", required = true)]
        body_parts: Vec<String>,
    },

    /// List saved plans
    Plans,

    /// Delete a plan together with its logged performances
    DeletePlan { id: Uuid },

    /// Log a performance of a plan item and show the next recommended weight
    Log {
        /// Plan item
        #[arg(long)]
        item: Uuid,

        /// Reps performed
        #[arg(long)]
        reps: String,

        /// Weight performed
        #[arg(long)]
        weight: String,

        /// Reps in reserve
        #[arg(long)]
        rir: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the logged performances of an exercise
    History { exercise: String },

    /// Show the days of a month on which sets were logged
    Calendar {
        #[arg(long)]
        year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// List all logged sets with their plan and exercise
    Trackings,

    /// Recommend the weight for the next session
    Recommend {
        /// Weight performed
        #[arg(long)]
        weight: String,

        /// Reps in reserve
        #[arg(long)]
        rir: String,
    },

    /// List the exercise catalog
    Catalog {
        /// Only list exercises of this body part
        #[arg(long)]
        region: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if ::log::max_level() == LevelFilter::Off {
                eprintln!("error: {err:#}");
            } else {
                error!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if cli.verbose {
        settings.log_level = LevelFilter::Debug;
    }
    if let Some(user) = cli.user {
        settings.user = user;
    }
    init_logging(&settings)?;

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Generate {
            samples,
            seed,
            output,
        } => {
            settings.samples = samples.unwrap_or(settings.samples);
            settings.seed = seed.or(settings.seed);
            settings.training_data = output.unwrap_or(settings.training_data);
            commands::generate(&settings, &mut out)
        }
        Command::Train { data, max_depth } => {
            settings.training_data = data.unwrap_or(settings.training_data);
            settings.max_depth = max_depth.or(settings.max_depth);
            commands::train(&settings, &mut out)
        }
        Command::Plan { goal, body_parts } => {
            commands::plan(&settings, &goal, &body_parts, &mut out)
        }
        Command::Plans => commands::plans(&settings, &mut out),
        Command::DeletePlan { id } => commands::delete_plan(&settings, id, &mut out),
        Command::Log {
            item,
            reps,
            weight,
            rir,
            notes,
        } => commands::log_performance(
            &settings,
            item,
            commands::PerformanceArgs {
                reps: &reps,
                weight: &weight,
                reps_in_reserve: &rir,
                notes,
            },
            &mut out,
        ),
        Command::History { exercise } => commands::history(&settings, &exercise, &mut out),
        Command::Calendar { year, month } => commands::calendar(&settings, year, month, &mut out),
        Command::Trackings => commands::trackings(&settings, &mut out),
        Command::Recommend { weight, rir } => {
            commands::recommend(&settings, &weight, &rir, &mut out)
        }
        Command::Catalog { region } => commands::catalog(&settings, region.as_deref(), &mut out),
    }
}

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let journal = match &settings.journal {
        Some(path) => Some(Box::new(
            log::Journal::open(path)
                .with_context(|| format!("failed to open journal {}", path.display()))?,
        ) as Box<dyn log::Repository>),
        None => None,
    };
    log::init(settings.log_level, journal)
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "liftplan",
            "plan",
            "--goal",
            "strength",
            "--body-part",
            "Legs",
            "--body-part",
            "Full Body",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("liftplan.json"));
        assert!(matches!(
            cli.command,
            Command::Plan { goal, body_parts }
                if goal == "strength" && body_parts == ["Legs", "Full Body"]
        ));
    }

    #[test]
    fn test_parse_plan_without_body_parts() {
        assert!(Cli::try_parse_from(["liftplan", "plan", "--goal", "strength"]).is_err());
    }

    #[test]
    fn test_parse_log() {
        let cli = Cli::try_parse_from([
            "liftplan",
            "log",
            "--item",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "--reps",
            "8",
            "--weight",
            "60",
            "--rir",
            "2",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Log { item, notes: None, .. }
                if item.to_string() == "67e55044-10b1-426f-9247-bb680e5fe0c8"
        ));
    }

    #[test]
    fn test_parse_calendar() {
        let cli =
            Cli::try_parse_from(["liftplan", "calendar", "--year", "2024", "--month", "3"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::Calendar {
                year: 2024,
                month: 3
            }
        ));
        assert!(
            Cli::try_parse_from(["liftplan", "calendar", "--year", "2024", "--month", "13"])
                .is_err()
        );
    }
}
