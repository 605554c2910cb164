use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, ExerciseID, Name, PlanID, PlanItemID, ProgressionError, RIR, ReadError, Reps,
    UserID, ValidationError, Weight,
};

pub trait PerformanceService {
    /// Records a performance of a plan item together with the weight recommended for the
    /// next session.
    fn log_performance(
        &self,
        plan_item_id: PlanItemID,
        input: PerformanceInput,
    ) -> Result<Performance, CreateError>;
    /// Performances of a plan item, newest first.
    fn get_performances(&self, plan_item_id: PlanItemID) -> Result<Vec<Performance>, ReadError>;
    /// Performances of an exercise across all plans of a user, oldest first.
    fn get_exercise_history(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<Performance>, ReadError>;
    /// Days in the given month on which the user logged at least one set, ascending.
    fn get_tracked_dates(
        &self,
        user_id: UserID,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>, ReadError>;
    /// All logged sets of a user with the names of their plan and exercise, newest first.
    fn get_user_performances(&self, user_id: UserID) -> Result<Vec<Tracking>, ReadError>;

    fn validate_reps(&self, reps: &str) -> Result<Reps, ValidationError> {
        if reps.trim().is_empty() {
            return Err(ValidationError::Missing("reps performed".to_string()));
        }
        Reps::try_from(reps).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_weight(&self, weight: &str) -> Result<Weight, ValidationError> {
        if weight.trim().is_empty() {
            return Err(ValidationError::Missing("weight performed".to_string()));
        }
        Weight::try_from(weight).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_reps_in_reserve(&self, reps_in_reserve: &str) -> Result<RIR, ValidationError> {
        if reps_in_reserve.trim().is_empty() {
            return Err(ValidationError::Missing("reps in reserve".to_string()));
        }
        RIR::try_from(reps_in_reserve).map_err(|err| ValidationError::Other(err.into()))
    }
}

pub trait PerformanceRepository {
    /// Performances of a plan item, newest first.
    fn read_performances(&self, plan_item_id: PlanItemID) -> Result<Vec<Performance>, ReadError>;
    fn read_user_performances(&self, user_id: UserID) -> Result<Vec<Performance>, ReadError>;
    fn create_performance(&self, performance: NewPerformance) -> Result<Performance, CreateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    pub id: PerformanceID,
    pub user_id: UserID,
    pub plan_item_id: PlanItemID,
    pub exercise_id: ExerciseID,
    pub reps: Reps,
    pub weight: Weight,
    pub reps_in_reserve: RIR,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub recommended_weight: Weight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPerformance {
    pub plan_item_id: PlanItemID,
    pub reps: Reps,
    pub weight: Weight,
    pub reps_in_reserve: RIR,
    pub notes: Option<String>,
    pub recommended_weight: Weight,
}

/// A logged set in the context of the plan it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracking {
    pub plan_id: PlanID,
    pub plan_name: Name,
    pub exercise_name: Name,
    pub performance: Performance,
}

/// Values entered by the user for one performance of a plan item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceInput {
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub reps_in_reserve: Option<RIR>,
    pub notes: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PerformanceID(Uuid);

impl PerformanceID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PerformanceID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PerformanceID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

impl From<ProgressionError> for ValidationError {
    fn from(value: ProgressionError) -> Self {
        match value {
            ProgressionError::MissingWeight => {
                ValidationError::Missing("weight performed".to_string())
            }
            ProgressionError::MissingRepsInReserve => {
                ValidationError::Missing("reps in reserve".to_string())
            }
            ProgressionError::OutOfRange(_) => ValidationError::Other(value.into()),
        }
    }
}
