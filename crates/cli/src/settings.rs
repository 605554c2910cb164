use std::path::{Path, PathBuf};

use chrono::Duration;
use liftplan_domain as domain;
use log::{LevelFilter, debug};
use uuid::Uuid;

/// Configuration of the command line interface, read from a JSON file.
///
/// Missing fields take their default value.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub user: Uuid,
    pub store: PathBuf,
    pub artifact_dir: PathBuf,
    pub training_data: PathBuf,
    pub samples: usize,
    pub seed: Option<u64>,
    pub min_exercises: usize,
    pub max_exercises: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub weight_increment: f32,
    pub sets: u32,
    pub reps: u32,
    pub plan_duration: i64,
    #[serde(with = "LevelFilterDef")]
    pub log_level: LevelFilter,
    pub journal: Option<PathBuf>,
}

impl Settings {
    /// Reads the settings at `path`, or the defaults if there is no such file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        debug!("read settings from {}", path.display());
        Ok(settings)
    }

    pub fn plan_settings(&self) -> Result<domain::PlanSettings, SettingsError> {
        Ok(domain::PlanSettings {
            sets: domain::Sets::new(self.sets).map_err(|err| invalid("sets", &err))?,
            reps: domain::Reps::new(self.reps).map_err(|err| invalid("reps", &err))?,
            duration: match Duration::try_minutes(self.plan_duration) {
                Some(duration) if self.plan_duration > 0 => duration,
                _ => {
                    return Err(SettingsError::Invalid {
                        field: "plan_duration",
                        reason: "must be a positive number of minutes".to_string(),
                    });
                }
            },
            weight_increment: domain::WeightIncrement::new(self.weight_increment)
                .map_err(|err| invalid("weight_increment", &err))?,
        })
    }

    pub fn generator_config(&self) -> Result<domain::GeneratorConfig, SettingsError> {
        domain::GeneratorConfig::new(self.min_exercises, self.max_exercises)
            .map_err(|err| invalid("min_exercises", &err))
    }

    #[must_use]
    pub fn tree_params(&self) -> domain::TreeParams {
        domain::TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> domain::UserID {
        self.user.into()
    }
}

impl Default for Settings {
    fn default() -> Self {
        let generator = domain::GeneratorConfig::default();
        let tree = domain::TreeParams::default();
        Self {
            user: Uuid::nil(),
            store: PathBuf::from("data/store.bin"),
            artifact_dir: PathBuf::from("data/models"),
            training_data: PathBuf::from("data/training_data.csv"),
            samples: 1000,
            seed: None,
            min_exercises: generator.min_exercises(),
            max_exercises: generator.max_exercises(),
            max_depth: tree.max_depth,
            min_samples_split: tree.min_samples_split,
            weight_increment: domain::WeightIncrement::DEFAULT.into(),
            sets: domain::Sets::default().into(),
            reps: domain::Reps::DEFAULT.into(),
            plan_duration: domain::PlanSettings::DEFAULT_DURATION_MINUTES,
            log_level: LevelFilter::Info,
            journal: None,
        }
    }
}

fn invalid(field: &'static str, err: &dyn std::error::Error) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: err.to_string(),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(remote = "LevelFilter", rename_all = "lowercase")]
enum LevelFilterDef {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
