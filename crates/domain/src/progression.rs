use crate::{RIR, Weight};

/// Smallest weight step that can be loaded on the equipment.
///
/// Recommendations are rounded to the nearest multiple of this step.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct WeightIncrement(f32);

impl WeightIncrement {
    pub const DEFAULT: WeightIncrement = WeightIncrement(0.5);
    pub const MIN: f32 = 0.01;
    pub const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Result<Self, WeightIncrementError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(WeightIncrementError::NotPositive);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(WeightIncrementError::OutOfRange);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn round(self, value: f32) -> f32 {
        let step = f64::from(self.0);
        #[allow(clippy::cast_possible_truncation)]
        let rounded = ((f64::from(value) / step).round() * step) as f32;
        rounded
    }

    /// Largest multiple of the step that is still a valid weight.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_weight(self) -> f32 {
        let step = f64::from(self.0);
        let mut steps = ((f64::from(Weight::LIMIT) / step).ceil() - 1.0).max(0.0);
        while steps > 0.0 && (steps * step) as f32 >= Weight::LIMIT {
            steps -= 1.0;
        }
        (steps * step) as f32
    }
}

impl Default for WeightIncrement {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<WeightIncrement> for f32 {
    fn from(value: WeightIncrement) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightIncrementError {
    #[error("Weight increment must be a positive decimal")]
    NotPositive,
    #[error("Weight increment must be in the range 0.01 to 100")]
    OutOfRange,
}

const CONSOLIDATE_MAX_RIR: u32 = 2;
const MODERATE_MAX_RIR: u32 = 4;
const MODERATE_INCREASE: f32 = 5.0;
const LARGE_INCREASE: f32 = 10.0;

/// Weight to use in the next session for a set performed with `weight` and `reps_in_reserve`.
///
/// Sets taken to within two reps of failure keep the weight, three or four reps in reserve add
/// 5 and anything above adds 10. The result is rounded to `increment` and capped at the heaviest
/// loadable weight below [`Weight::LIMIT`].
pub fn recommend_next_weight(
    weight: Option<Weight>,
    reps_in_reserve: Option<RIR>,
    increment: WeightIncrement,
) -> Result<Weight, ProgressionError> {
    let weight = f32::from(weight.ok_or(ProgressionError::MissingWeight)?);
    let reps_in_reserve = u32::from(reps_in_reserve.ok_or(ProgressionError::MissingRepsInReserve)?);

    let recommended = match reps_in_reserve {
        r if r <= CONSOLIDATE_MAX_RIR => weight,
        r if r <= MODERATE_MAX_RIR => weight + MODERATE_INCREASE,
        _ => weight + LARGE_INCREASE,
    };

    let mut rounded = increment.round(recommended);
    if rounded >= Weight::LIMIT {
        rounded = increment.max_weight();
    }
    Weight::new(rounded).map_err(|_| ProgressionError::OutOfRange(rounded))
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProgressionError {
    #[error("Weight performed is required for a recommendation")]
    MissingWeight,
    #[error("Reps in reserve are required for a recommendation")]
    MissingRepsInReserve,
    #[error("Recommended weight {0} is out of range")]
    OutOfRange(f32),
}
