use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use liftplan_domain as domain;
use log::{debug, info};
use uuid::Uuid;

const SNAPSHOT_VERSION: u32 = 1;

/// Repository holding exercises, plans and performances.
///
/// Every write is staged on a copy of the current state and only becomes visible once the copy
/// has been persisted, so a failing write leaves neither the state nor the file changed.
pub struct Store {
    state: Mutex<State>,
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct State {
    exercises: Vec<domain::Exercise>,
    plans: Vec<domain::Plan>,
    performances: Vec<domain::Performance>,
}

impl Store {
    /// Empty store without a backing file.
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(State::default(), None)
    }

    /// Store without a backing file, seeded with the exercise catalog.
    #[must_use]
    pub fn with_catalog() -> Self {
        Self::with_exercises(catalog_exercises())
    }

    /// Store without a backing file, seeded with the given exercises.
    #[must_use]
    pub fn with_exercises(exercises: Vec<domain::Exercise>) -> Self {
        Self::from_state(
            State {
                exercises,
                ..State::default()
            },
            None,
        )
    }

    /// Opens the store persisted at `path`, or creates it seeded with the exercise catalog if
    /// the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            info!("creating store at {}", path.display());
            let state = State {
                exercises: catalog_exercises(),
                ..State::default()
            };
            persist(path, &state)?;
            return Ok(Self::from_state(state, Some(path.to_path_buf())));
        }

        let bytes = std::fs::read(path)?;
        let snapshot: Snapshot = postcard::from_bytes(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion(snapshot.version));
        }
        let state = State::try_from(snapshot).map_err(StoreError::InvalidRecord)?;
        debug!(
            "loaded {} exercises, {} plans and {} performances from {}",
            state.exercises.len(),
            state.plans.len(),
            state.performances.len(),
            path.display()
        );

        Ok(Self::from_state(state, Some(path.to_path_buf())))
    }

    fn from_state(state: State, path: Option<PathBuf>) -> Self {
        Self {
            state: Mutex::new(state),
            path,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, domain::StorageError> {
        self.state
            .lock()
            .map_err(|_| domain::StorageError::Other("store lock poisoned".into()))
    }

    fn read<T, E>(&self, f: impl FnOnce(&State) -> Result<T, E>) -> Result<T, E>
    where
        E: From<domain::StorageError>,
    {
        let state = self.lock()?;
        f(&state)
    }

    fn commit<T, E>(&self, f: impl FnOnce(&mut State) -> Result<T, E>) -> Result<T, E>
    where
        E: From<domain::StorageError>,
    {
        let mut state = self.lock()?;
        let mut staged = state.clone();
        let result = f(&mut staged)?;
        if let Some(path) = &self.path {
            persist(path, &staged).map_err(|err| domain::StorageError::RolledBack(err.to_string()))?;
        }
        *state = staged;
        Ok(result)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn catalog_exercises() -> Vec<domain::Exercise> {
    domain::catalog::EXERCISES
        .iter()
        .filter_map(|e| {
            Some(domain::Exercise {
                id: Uuid::new_v4().into(),
                name: domain::Name::new(e.name).ok()?,
                region: e.region,
            })
        })
        .collect()
}

/// Current time in the precision kept by the store file.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn persist(path: &Path, state: &State) -> Result<(), StoreError> {
    let bytes = postcard::to_stdvec(&Snapshot::from(state))?;
    crate::write_atomically(path, &bytes)?;
    Ok(())
}

impl domain::ExerciseRepository for Store {
    fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        self.read(|state| Ok(state.exercises.clone()))
    }

    fn find_exercise_by_name(
        &self,
        name: &str,
    ) -> Result<Option<domain::Exercise>, domain::ReadError> {
        let name = name.trim();
        self.read(|state| Ok(state.exercises.iter().find(|e| e.name == *name).cloned()))
    }

    fn list_exercises_by_region(
        &self,
        region: domain::Region,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        self.read(|state| {
            Ok(state
                .exercises
                .iter()
                .filter(|e| e.region == region)
                .cloned()
                .collect())
        })
    }
}

impl domain::PlanRepository for Store {
    fn read_plans(&self, user_id: domain::UserID) -> Result<Vec<domain::Plan>, domain::ReadError> {
        self.read(|state| {
            Ok(state
                .plans
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect())
        })
    }

    fn read_plan(&self, id: domain::PlanID) -> Result<domain::Plan, domain::ReadError> {
        self.read(|state| {
            state
                .plans
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(domain::ReadError::NotFound)
        })
    }

    fn create_plan(&self, plan: domain::NewPlan) -> Result<domain::Plan, domain::CreateError> {
        self.commit(|state| {
            if state
                .plans
                .iter()
                .any(|p| p.user_id == plan.user_id && p.name == plan.name)
            {
                return Err(domain::CreateError::Conflict(format!(
                    "a plan named \"{}\" already exists",
                    plan.name
                )));
            }
            if let Some(item) = plan
                .items
                .iter()
                .find(|i| !state.exercises.iter().any(|e| e.id == i.exercise_id))
            {
                return Err(domain::CreateError::MissingReference(format!(
                    "exercise {}",
                    *item.exercise_id
                )));
            }

            let created = domain::Plan {
                id: Uuid::new_v4().into(),
                user_id: plan.user_id,
                name: plan.name,
                goal: plan.goal,
                duration: plan.duration,
                created: now(),
                items: plan
                    .items
                    .into_iter()
                    .map(|i| domain::PlanItem {
                        id: Uuid::new_v4().into(),
                        exercise_id: i.exercise_id,
                        sets: i.sets,
                        reps: i.reps,
                    })
                    .collect(),
            };
            state.plans.push(created.clone());
            Ok(created)
        })
    }

    fn delete_plan(&self, id: domain::PlanID) -> Result<domain::PlanID, domain::DeleteError> {
        self.commit(|state| {
            let position = state
                .plans
                .iter()
                .position(|p| p.id == id)
                .ok_or(domain::DeleteError::NotFound)?;
            let plan = state.plans.remove(position);
            state
                .performances
                .retain(|p| plan.item(p.plan_item_id).is_none());
            Ok(id)
        })
    }
}

impl domain::PerformanceRepository for Store {
    fn read_performances(
        &self,
        plan_item_id: domain::PlanItemID,
    ) -> Result<Vec<domain::Performance>, domain::ReadError> {
        self.read(|state| {
            let mut performances = state
                .performances
                .iter()
                .rev()
                .filter(|p| p.plan_item_id == plan_item_id)
                .cloned()
                .collect::<Vec<_>>();
            performances.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(performances)
        })
    }

    fn read_user_performances(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::Performance>, domain::ReadError> {
        self.read(|state| {
            Ok(state
                .performances
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect())
        })
    }

    fn create_performance(
        &self,
        performance: domain::NewPerformance,
    ) -> Result<domain::Performance, domain::CreateError> {
        self.commit(|state| {
            let (user_id, item) = state
                .plans
                .iter()
                .find_map(|p| p.item(performance.plan_item_id).map(|i| (p.user_id, i)))
                .ok_or_else(|| domain::CreateError::MissingReference("plan item".to_string()))?;

            let created = domain::Performance {
                id: Uuid::new_v4().into(),
                user_id,
                plan_item_id: item.id,
                exercise_id: item.exercise_id,
                reps: performance.reps,
                weight: performance.weight,
                reps_in_reserve: performance.reps_in_reserve,
                notes: performance.notes,
                date: now(),
                recommended_weight: performance.recommended_weight,
            };
            state.performances.push(created.clone());
            Ok(created)
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode or decode store: {0}")]
    Encoding(#[from] postcard::Error),
    #[error("unsupported store version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid record in store: {0}")]
    InvalidRecord(domain::BoxError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
struct Snapshot {
    version: u32,
    exercises: Vec<Exercise>,
    plans: Vec<Plan>,
    performances: Vec<Performance>,
}

impl From<&State> for Snapshot {
    fn from(value: &State) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exercises: value.exercises.iter().map(Exercise::from).collect(),
            plans: value.plans.iter().map(Plan::from).collect(),
            performances: value.performances.iter().map(Performance::from).collect(),
        }
    }
}

impl TryFrom<Snapshot> for State {
    type Error = domain::BoxError;

    fn try_from(value: Snapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            exercises: value
                .exercises
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<_, _>>()?,
            plans: value
                .plans
                .into_iter()
                .map(domain::Plan::try_from)
                .collect::<Result<_, _>>()?,
            performances: value
                .performances
                .into_iter()
                .map(domain::Performance::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
struct Exercise {
    id: u128,
    name: String,
    region: String,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: value.id.as_u128(),
            name: value.name.to_string(),
            region: value.region.to_string(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::BoxError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            region: domain::Region::try_from(value.region.as_str())?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
struct Plan {
    id: u128,
    user_id: u128,
    name: String,
    goal: String,
    duration: i64,
    created: i64,
    items: Vec<PlanItem>,
}

impl From<&domain::Plan> for Plan {
    fn from(value: &domain::Plan) -> Self {
        Self {
            id: value.id.as_u128(),
            user_id: value.user_id.as_u128(),
            name: value.name.to_string(),
            goal: value.goal.to_string(),
            duration: value.duration.num_seconds(),
            created: value.created.timestamp_millis(),
            items: value.items.iter().map(PlanItem::from).collect(),
        }
    }
}

impl TryFrom<Plan> for domain::Plan {
    type Error = domain::BoxError;

    fn try_from(value: Plan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            name: domain::Name::new(&value.name)?,
            goal: domain::Goal::from(value.goal.as_str()),
            duration: Duration::try_seconds(value.duration)
                .ok_or_else(|| format!("invalid plan duration {}", value.duration))?,
            created: timestamp(value.created)?,
            items: value
                .items
                .into_iter()
                .map(domain::PlanItem::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
struct PlanItem {
    id: u128,
    exercise_id: u128,
    sets: u32,
    reps: u32,
}

impl From<&domain::PlanItem> for PlanItem {
    fn from(value: &domain::PlanItem) -> Self {
        Self {
            id: value.id.as_u128(),
            exercise_id: value.exercise_id.as_u128(),
            sets: value.sets.into(),
            reps: value.reps.into(),
        }
    }
}

impl TryFrom<PlanItem> for domain::PlanItem {
    type Error = domain::BoxError;

    fn try_from(value: PlanItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercise_id: value.exercise_id.into(),
            sets: domain::Sets::new(value.sets)?,
            reps: domain::Reps::new(value.reps)?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
struct Performance {
    id: u128,
    user_id: u128,
    plan_item_id: u128,
    exercise_id: u128,
    reps: u32,
    weight: f32,
    reps_in_reserve: u32,
    notes: Option<String>,
    date: i64,
    recommended_weight: f32,
}

impl From<&domain::Performance> for Performance {
    fn from(value: &domain::Performance) -> Self {
        Self {
            id: value.id.as_u128(),
            user_id: value.user_id.as_u128(),
            plan_item_id: value.plan_item_id.as_u128(),
            exercise_id: value.exercise_id.as_u128(),
            reps: value.reps.into(),
            weight: value.weight.into(),
            reps_in_reserve: value.reps_in_reserve.into(),
            notes: value.notes.clone(),
            date: value.date.timestamp_millis(),
            recommended_weight: value.recommended_weight.into(),
        }
    }
}

impl TryFrom<Performance> for domain::Performance {
    type Error = domain::BoxError;

    fn try_from(value: Performance) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            plan_item_id: value.plan_item_id.into(),
            exercise_id: value.exercise_id.into(),
            reps: domain::Reps::new(value.reps)?,
            weight: domain::Weight::new(value.weight)?,
            reps_in_reserve: domain::RIR::new(value.reps_in_reserve)?,
            notes: value.notes,
            date: timestamp(value.date)?,
            recommended_weight: domain::Weight::new(value.recommended_weight)?,
        })
    }
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>, domain::BoxError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| format!("invalid timestamp {millis}").into())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use liftplan_domain::{ExerciseRepository, PerformanceRepository, PlanRepository};

    use crate::tests::data::{NEW_PLAN, USER, USER_2, new_performance, seeded_store};

    use super::*;

    #[test]
    fn test_with_catalog() {
        let store = Store::with_catalog();
        let exercises = store.read_exercises().unwrap();

        assert_eq!(exercises.len(), domain::catalog::EXERCISES.len());
        assert_eq!(
            exercises.iter().map(|e| e.id).collect::<HashSet<_>>().len(),
            exercises.len()
        );
        assert_eq!(
            store
                .find_exercise_by_name(" Deadlift ")
                .unwrap()
                .map(|e| e.region),
            Some(domain::Region::FullBody)
        );
        assert_eq!(store.find_exercise_by_name("Curl of Doom").unwrap(), None);
        assert!(
            store
                .list_exercises_by_region(domain::Region::Back)
                .unwrap()
                .iter()
                .all(|e| e.region == domain::Region::Back)
        );
    }

    #[test]
    fn test_create_plan() {
        let store = seeded_store();

        let plan = store.create_plan(NEW_PLAN.clone()).unwrap();

        assert_eq!(plan.name, NEW_PLAN.name);
        assert_eq!(plan.items.len(), NEW_PLAN.items.len());
        assert!(plan.items.iter().all(|i| !i.id.is_nil()));
        assert_eq!(store.read_plans(*USER).unwrap(), vec![plan.clone()]);
        assert_eq!(store.read_plan(plan.id).unwrap(), plan);
        assert_eq!(store.read_plans(*USER_2).unwrap(), vec![]);
    }

    #[test]
    fn test_create_plan_conflict() {
        let store = seeded_store();
        store.create_plan(NEW_PLAN.clone()).unwrap();

        assert!(matches!(
            store.create_plan(NEW_PLAN.clone()),
            Err(domain::CreateError::Conflict(_))
        ));
        assert_eq!(store.read_plans(*USER).unwrap().len(), 1);

        store
            .create_plan(domain::NewPlan {
                user_id: *USER_2,
                ..NEW_PLAN.clone()
            })
            .unwrap();
        assert_eq!(store.read_plans(*USER_2).unwrap().len(), 1);
    }

    #[test]
    fn test_create_plan_unknown_exercise() {
        let store = seeded_store();
        let mut plan = NEW_PLAN.clone();
        plan.items[1].exercise_id = domain::ExerciseID::from(999);

        assert!(matches!(
            store.create_plan(plan),
            Err(domain::CreateError::MissingReference(_))
        ));
        assert_eq!(store.read_plans(*USER).unwrap(), vec![]);
    }

    #[test]
    fn test_delete_plan() {
        let store = seeded_store();
        let plan = store.create_plan(NEW_PLAN.clone()).unwrap();
        let item = plan.items[0].id;
        store.create_performance(new_performance(item, 100.0)).unwrap();

        assert_eq!(store.delete_plan(plan.id).unwrap(), plan.id);
        assert!(matches!(
            store.read_plan(plan.id),
            Err(domain::ReadError::NotFound)
        ));
        assert_eq!(store.read_performances(item).unwrap(), vec![]);
        assert_eq!(store.read_user_performances(*USER).unwrap(), vec![]);
        assert!(matches!(
            store.delete_plan(plan.id),
            Err(domain::DeleteError::NotFound)
        ));
    }

    #[test]
    fn test_create_performance() {
        let store = seeded_store();
        let plan = store.create_plan(NEW_PLAN.clone()).unwrap();
        let item = &plan.items[0];

        let first = store
            .create_performance(new_performance(item.id, 100.0))
            .unwrap();
        let second = store
            .create_performance(new_performance(item.id, 105.0))
            .unwrap();

        assert_eq!(first.user_id, *USER);
        assert_eq!(first.exercise_id, item.exercise_id);
        assert_eq!(
            store.read_performances(item.id).unwrap(),
            vec![second.clone(), first.clone()]
        );
        assert_eq!(
            store.read_user_performances(*USER).unwrap(),
            vec![first, second]
        );
        assert!(matches!(
            store.create_performance(new_performance(domain::PlanItemID::from(7), 100.0)),
            Err(domain::CreateError::MissingReference(_))
        ));
    }

    #[test]
    fn test_open_persists_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        let plan = store.create_plan(plan_for(&store)).unwrap();
        let performance = store
            .create_performance(new_performance(plan.items[0].id, 62.5))
            .unwrap();
        assert!(path.exists());

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.read_exercises().unwrap(), store.read_exercises().unwrap());
        assert_eq!(reopened.read_plans(*USER).unwrap(), vec![plan]);
        assert_eq!(
            reopened.read_user_performances(*USER).unwrap(),
            vec![performance]
        );
    }

    #[test]
    fn test_failed_write_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let sub_dir = dir.path().join("sub");
        let store = Store::open(&sub_dir.join("store.bin")).unwrap();
        std::fs::remove_dir_all(&sub_dir).unwrap();
        std::fs::write(&sub_dir, b"").unwrap();

        assert!(matches!(
            store.create_plan(plan_for(&store)),
            Err(domain::CreateError::Storage(domain::StorageError::RolledBack(_)))
        ));
        assert_eq!(store.read_plans(*USER).unwrap(), vec![]);
    }

    #[test]
    fn test_open_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        assert!(matches!(
            Store::open(&blocker.join("store.bin")),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn test_open_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        std::fs::write(&path, [0xff; 3]).unwrap();

        assert!(Store::open(&path).is_err());
    }

    #[test]
    fn test_open_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION + 1,
            exercises: vec![],
            plans: vec![],
            performances: vec![],
        };
        std::fs::write(&path, postcard::to_stdvec(&snapshot).unwrap()).unwrap();

        assert!(matches!(
            Store::open(&path),
            Err(StoreError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_snapshot_rejects_invalid_records() {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            exercises: vec![Exercise {
                id: 1,
                name: "Squat".to_string(),
                region: "Neck".to_string(),
            }],
            plans: vec![],
            performances: vec![],
        };

        assert!(State::try_from(snapshot).is_err());
    }

    fn plan_for(store: &Store) -> domain::NewPlan {
        let exercises = store.read_exercises().unwrap();
        domain::NewPlan {
            items: exercises
                .iter()
                .take(2)
                .map(|e| domain::NewPlanItem {
                    exercise_id: e.id,
                    sets: domain::Sets::default(),
                    reps: domain::Reps::DEFAULT,
                })
                .collect(),
            ..NEW_PLAN.clone()
        }
    }
}
