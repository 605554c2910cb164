use std::collections::{BTreeMap, HashSet};

use log::debug;
use rand::{Rng, seq::SliceRandom};

use crate::{Exercise, Goal, Region, RegionFlags};

/// Labeled sample used to train the plan classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub goal: Goal,
    pub regions: RegionFlags,
    pub lifts: Vec<String>,
    pub reps: u32,
}

impl TrainingExample {
    pub const LIFT_SEPARATOR: char = ';';

    /// Exercise names joined into a single label.
    #[must_use]
    pub fn label(&self) -> String {
        self.lifts.join(&Self::LIFT_SEPARATOR.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    min_exercises: usize,
    max_exercises: usize,
}

impl GeneratorConfig {
    pub fn new(min_exercises: usize, max_exercises: usize) -> Result<Self, GeneratorConfigError> {
        if min_exercises == 0 {
            return Err(GeneratorConfigError::ZeroMinimum);
        }

        if min_exercises > max_exercises {
            return Err(GeneratorConfigError::InvalidBand(min_exercises, max_exercises));
        }

        Ok(Self {
            min_exercises,
            max_exercises,
        })
    }

    #[must_use]
    pub fn min_exercises(&self) -> usize {
        self.min_exercises
    }

    #[must_use]
    pub fn max_exercises(&self) -> usize {
        self.max_exercises
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_exercises: 6,
            max_exercises: 8,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeneratorConfigError {
    #[error("Minimum number of exercises must be at least 1")]
    ZeroMinimum,
    #[error("Minimum number of exercises must not exceed the maximum ({0} > {1})")]
    InvalidBand(usize, usize),
}

/// Samples plausible (goal, regions) combinations together with a consistent exercise selection.
pub struct Generator {
    names: BTreeMap<Region, Vec<String>>,
    config: GeneratorConfig,
}

impl Generator {
    #[must_use]
    pub fn new(exercises: &[Exercise], config: GeneratorConfig) -> Self {
        let mut names: BTreeMap<Region, Vec<String>> = BTreeMap::new();
        for exercise in exercises {
            let region_names = names.entry(exercise.region).or_default();
            if !region_names.iter().any(|n| exercise.name == *n.as_str()) {
                region_names.push(exercise.name.to_string());
            }
        }
        Self { names, config }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<TrainingExample> {
        let examples = (0..count).map(|_| self.sample(rng)).collect::<Vec<_>>();
        debug!(
            "generated {} training examples from {} exercises",
            examples.len(),
            self.names.values().map(Vec::len).sum::<usize>()
        );
        examples
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TrainingExample {
        let goal = Goal::from(rng.gen_bool(0.5));
        let regions = loop {
            let flags = RegionFlags::new(std::array::from_fn(|_| rng.gen_bool(0.5)));
            if flags.any() {
                break flags;
            }
        };

        let mut lifts: Vec<String> = vec![];
        let mut seen: HashSet<&str> = HashSet::new();

        for region in regions.regions() {
            if lifts.len() >= self.config.max_exercises {
                break;
            }
            if let Some(name) = self.names(region).choose(rng) {
                if seen.insert(name.as_str()) {
                    lifts.push(name.clone());
                }
            }
        }

        while lifts.len() < self.config.min_exercises {
            let open_regions = regions
                .regions()
                .filter(|r| self.names(*r).iter().any(|n| !seen.contains(n.as_str())))
                .collect::<Vec<_>>();
            let Some(region) = open_regions.choose(rng) else {
                break;
            };
            let remaining = self
                .names(*region)
                .iter()
                .filter(|n| !seen.contains(n.as_str()))
                .collect::<Vec<_>>();
            if let Some(name) = remaining.choose(rng) {
                seen.insert(name.as_str());
                lifts.push((*name).clone());
            }
        }

        let reps = rng.gen_range(goal.rep_range());

        TrainingExample {
            goal,
            regions,
            lifts,
            reps,
        }
    }

    fn names(&self, region: Region) -> &[String] {
        self.names.get(&region).map_or(&[], Vec::as_slice)
    }
}
