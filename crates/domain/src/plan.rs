use chrono::{DateTime, Duration, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, Goal, Name, ReadError, Region, Reps, Sets, UserID,
    ValidationError,
};

pub trait PlanService {
    fn get_plans(&self, user_id: UserID) -> Result<Vec<Plan>, ReadError>;
    fn create_plan(
        &self,
        user_id: UserID,
        name: Name,
        goal: Goal,
        items: Vec<PlanItemInput>,
    ) -> Result<Plan, CreateError>;
    fn generate_plan(
        &self,
        user_id: UserID,
        goal: Goal,
        regions: &[Region],
    ) -> Result<Plan, CreateError>;
    fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;

    fn validate_plan_request(
        &self,
        goal: &str,
        body_parts: &[&str],
    ) -> Result<(Goal, Vec<Region>), ValidationError> {
        if goal.trim().is_empty() {
            return Err(ValidationError::Missing("goal".to_string()));
        }
        if body_parts.is_empty() {
            return Err(ValidationError::Missing("body parts".to_string()));
        }

        let mut regions: Vec<Region> = vec![];
        for part in body_parts {
            let region = Region::try_from(*part).map_err(|err| ValidationError::Other(err.into()))?;
            if !regions.contains(&region) {
                regions.push(region);
            }
        }

        Ok((Goal::from(goal.trim()), regions))
    }
}

pub trait PlanRepository {
    fn read_plans(&self, user_id: UserID) -> Result<Vec<Plan>, ReadError>;
    fn read_plan(&self, id: PlanID) -> Result<Plan, ReadError>;
    /// Stores the plan and all its items, or nothing at all.
    fn create_plan(&self, plan: NewPlan) -> Result<Plan, CreateError>;
    /// Removes the plan together with its items and the performances logged for them.
    fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: PlanID,
    pub user_id: UserID,
    pub name: Name,
    pub goal: Goal,
    pub duration: Duration,
    pub created: DateTime<Utc>,
    pub items: Vec<PlanItem>,
}

impl Plan {
    pub fn exercises(&self) -> impl Iterator<Item = ExerciseID> + '_ {
        self.items.iter().map(|i| i.exercise_id)
    }

    #[must_use]
    pub fn item(&self, id: PlanItemID) -> Option<&PlanItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    pub id: PlanItemID,
    pub exercise_id: ExerciseID,
    pub sets: Sets,
    pub reps: Reps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub user_id: UserID,
    pub name: Name,
    pub goal: Goal,
    pub duration: Duration,
    pub items: Vec<NewPlanItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanItem {
    pub exercise_id: ExerciseID,
    pub sets: Sets,
    pub reps: Reps,
}

/// Item of a manually composed plan. Missing targets fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItemInput {
    pub exercise_id: ExerciseID,
    pub sets: Option<Sets>,
    pub reps: Option<Reps>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanID(Uuid);

impl PlanID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PlanID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PlanID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanItemID(Uuid);

impl PlanItemID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PlanItemID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PlanItemID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Human-readable name of a plan targeting `regions`, e.g. "Legs, Chest, and Back workout".
#[must_use]
pub fn plan_name(regions: &[Region]) -> Option<String> {
    let names = regions.iter().map(ToString::to_string).collect::<Vec<_>>();
    let joined = match names.as_slice() {
        [] => return None,
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    };
    Some(format!("{joined} workout"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct Plans;

    impl PlanService for Plans {
        fn get_plans(&self, _: UserID) -> Result<Vec<Plan>, ReadError> {
            Ok(vec![])
        }
        fn create_plan(
            &self,
            _: UserID,
            _: Name,
            _: Goal,
            _: Vec<PlanItemInput>,
        ) -> Result<Plan, CreateError> {
            Err(CreateError::Other("unused".into()))
        }
        fn generate_plan(&self, _: UserID, _: Goal, _: &[Region]) -> Result<Plan, CreateError> {
            Err(CreateError::Other("unused".into()))
        }
        fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
            Ok(id)
        }
    }

    #[rstest]
    #[case(&[], None)]
    #[case(&[Region::Legs], Some("Legs workout"))]
    #[case(&[Region::Legs, Region::Chest], Some("Legs and Chest workout"))]
    #[case(
        &[Region::Arms, Region::Back, Region::FullBody],
        Some("Arms, Back, and Full Body workout")
    )]
    #[case(
        &[Region::Legs, Region::Chest, Region::Arms, Region::Back, Region::FullBody],
        Some("Legs, Chest, Arms, Back, and Full Body workout")
    )]
    fn test_plan_name(#[case] regions: &[Region], #[case] expected: Option<&str>) {
        assert_eq!(plan_name(regions).as_deref(), expected);
    }

    #[test]
    fn test_validate_plan_request() {
        assert_eq!(
            Plans
                .validate_plan_request("strength", &["Legs", "chest", "Legs"])
                .unwrap(),
            (Goal::Strength, vec![Region::Legs, Region::Chest])
        );
        assert_eq!(
            Plans
                .validate_plan_request("hypertrophy", &["Full Body"])
                .unwrap(),
            (Goal::Hypertrophy, vec![Region::FullBody])
        );
    }

    #[rstest]
    #[case(" ", &["Legs"], "goal is required")]
    #[case("strength", &[], "body parts is required")]
    #[case(
        "strength",
        &["Legs", "Neck"],
        "Unknown body region \"Neck\" (expected Legs, Chest, Arms, Back or Full Body)"
    )]
    fn test_validate_plan_request_invalid(
        #[case] goal: &str,
        #[case] body_parts: &[&str],
        #[case] message: &str,
    ) {
        assert_eq!(
            Plans
                .validate_plan_request(goal, body_parts)
                .unwrap_err()
                .to_string(),
            message
        );
    }

    #[test]
    fn test_plan_id_nil() {
        assert!(PlanID::nil().is_nil());
        assert_eq!(PlanItemID::nil(), PlanItemID::default());
    }
}
