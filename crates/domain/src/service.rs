use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, error, info};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseID, ExerciseRepository, ExerciseService, Goal,
    Name, NewPerformance, NewPlan, NewPlanItem, Performance, PerformanceInput,
    PerformanceRepository, PerformanceService, Plan, PlanClassifier, PlanID, PlanItemID,
    PlanItemInput, PlanRepository, PlanService, ReadError, Region, Reps, Sets, Tracking,
    TrainingExample, UserID, ValidationError, WeightIncrement, plan_name, recommend_next_weight,
};

/// Defaults applied when assembling plans and recommending weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanSettings {
    pub sets: Sets,
    pub reps: Reps,
    pub duration: Duration,
    pub weight_increment: WeightIncrement,
}

impl PlanSettings {
    pub const DEFAULT_DURATION_MINUTES: i64 = 50;
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            sets: Sets::default(),
            reps: Reps::DEFAULT,
            duration: Duration::minutes(Self::DEFAULT_DURATION_MINUTES),
            weight_increment: WeightIncrement::default(),
        }
    }
}

pub struct Service<R> {
    repository: R,
    classifier: Option<PlanClassifier>,
    settings: PlanSettings,
}

impl<R> Service<R>
where
    R: ExerciseRepository + PlanRepository + PerformanceRepository,
{
    pub fn new(repository: R, settings: PlanSettings) -> Self {
        Self {
            repository,
            classifier: None,
            settings,
        }
    }

    /// Enables plan generation.
    #[must_use]
    pub fn with_classifier(mut self, classifier: PlanClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    fn ensure_unique_name(&self, user_id: UserID, name: &Name) -> Result<(), CreateError> {
        if self
            .repository
            .read_plans(user_id)?
            .iter()
            .any(|p| p.name == *name)
        {
            return Err(CreateError::Conflict(format!(
                "a plan named \"{name}\" already exists"
            )));
        }
        Ok(())
    }

    fn assemble_plan(
        &self,
        user_id: UserID,
        goal: Goal,
        regions: &[Region],
    ) -> Result<Plan, CreateError> {
        let name = plan_name(regions)
            .ok_or_else(|| ValidationError::Missing("body parts".to_string()))?;
        let name = Name::new(&name).map_err(|err| ValidationError::Other(err.into()))?;
        self.ensure_unique_name(user_id, &name)?;

        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| CreateError::Other("plan classifier is not loaded".into()))?;
        let predictions = classifier
            .predict(goal, regions)
            .map_err(|err| CreateError::Other(err.into()))?;

        let mut items = vec![];
        for prediction in &predictions {
            let reps = prediction.reps.unwrap_or(self.settings.reps);
            for lift_name in prediction
                .lift_name
                .split(TrainingExample::LIFT_SEPARATOR)
                .map(str::trim)
                .filter(|n| !n.is_empty())
            {
                match self.repository.find_exercise_by_name(lift_name)? {
                    Some(exercise) => items.push(NewPlanItem {
                        exercise_id: exercise.id,
                        sets: self.settings.sets,
                        reps,
                    }),
                    None => debug!("skipping exercise \"{lift_name}\" missing from catalog"),
                }
            }
        }

        let plan = self.repository.create_plan(NewPlan {
            user_id,
            name,
            goal,
            duration: self.settings.duration,
            items,
        })?;
        info!(
            "generated plan \"{}\" with {} exercises",
            plan.name,
            plan.items.len()
        );
        Ok(plan)
    }

    fn compose_plan(
        &self,
        user_id: UserID,
        name: Name,
        goal: Goal,
        items: Vec<PlanItemInput>,
    ) -> Result<Plan, CreateError> {
        if items.is_empty() {
            return Err(ValidationError::Missing("exercises".to_string()).into());
        }
        self.ensure_unique_name(user_id, &name)?;

        let exercises = self.repository.read_exercises()?;
        if let Some(item) = items
            .iter()
            .find(|i| !exercises.iter().any(|e| e.id == i.exercise_id))
        {
            return Err(CreateError::MissingReference(format!(
                "exercise {}",
                *item.exercise_id
            )));
        }

        self.repository.create_plan(NewPlan {
            user_id,
            name,
            goal,
            duration: self.settings.duration,
            items: items
                .into_iter()
                .map(|i| NewPlanItem {
                    exercise_id: i.exercise_id,
                    sets: i.sets.unwrap_or(self.settings.sets),
                    reps: i.reps.unwrap_or(self.settings.reps),
                })
                .collect(),
        })
    }

    fn record_performance(
        &self,
        plan_item_id: PlanItemID,
        input: PerformanceInput,
    ) -> Result<Performance, CreateError> {
        let recommended_weight = recommend_next_weight(
            input.weight,
            input.reps_in_reserve,
            self.settings.weight_increment,
        )
        .map_err(ValidationError::from)?;
        let PerformanceInput {
            reps: Some(reps),
            weight: Some(weight),
            reps_in_reserve: Some(reps_in_reserve),
            notes,
        } = input
        else {
            return Err(ValidationError::Missing("reps performed".to_string()).into());
        };

        self.repository.create_performance(NewPerformance {
            plan_item_id,
            reps,
            weight,
            reps_in_reserve,
            notes: notes.filter(|n| !n.trim().is_empty()),
            recommended_weight,
        })
    }

    fn tracked_dates(
        &self,
        user_id: UserID,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>, ReadError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ReadError::Other(
                format!("invalid month {year}-{month:02}").into(),
            ));
        }
        let mut dates = self
            .repository
            .read_user_performances(user_id)?
            .into_iter()
            .map(|p| p.date.date_naive())
            .filter(|d| d.year() == year && d.month() == month)
            .collect::<Vec<_>>();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn collect_trackings(&self, user_id: UserID) -> Result<Vec<Tracking>, ReadError> {
        let plans = self.repository.read_plans(user_id)?;
        let exercises = self.repository.read_exercises()?;
        let mut trackings = vec![];
        for performance in self.repository.read_user_performances(user_id)? {
            let Some(plan) = plans
                .iter()
                .find(|p| p.item(performance.plan_item_id).is_some())
            else {
                debug!(
                    "skipping performance {} of unknown plan item",
                    *performance.id
                );
                continue;
            };
            let Some(exercise) = exercises.iter().find(|e| e.id == performance.exercise_id) else {
                debug!(
                    "skipping performance {} of unknown exercise",
                    *performance.id
                );
                continue;
            };
            trackings.push(Tracking {
                plan_id: plan.id,
                plan_name: plan.name.clone(),
                exercise_name: exercise.name.clone(),
                performance,
            });
        }
        trackings.sort_by(|a, b| b.performance.date.cmp(&a.performance.date));
        Ok(trackings)
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        if let Err(ref err) = result {
            error!("failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
    ($func: expr, $error: ident, $action: literal, $entity: literal $(, $expected: pat)+) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $($expected)|+ => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> ExerciseService for Service<R>
where
    R: ExerciseRepository + PlanRepository + PerformanceRepository,
{
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }
}

impl<R> PlanService for Service<R>
where
    R: ExerciseRepository + PlanRepository + PerformanceRepository,
{
    fn get_plans(&self, user_id: UserID) -> Result<Vec<Plan>, ReadError> {
        log_on_error!(self.repository.read_plans(user_id), ReadError, "get", "plans")
    }

    fn create_plan(
        &self,
        user_id: UserID,
        name: Name,
        goal: Goal,
        items: Vec<PlanItemInput>,
    ) -> Result<Plan, CreateError> {
        log_on_error!(
            self.compose_plan(user_id, name, goal, items),
            CreateError,
            "create",
            "plan",
            CreateError::Conflict(_),
            CreateError::MissingReference(_),
            CreateError::Invalid(_)
        )
    }

    fn generate_plan(
        &self,
        user_id: UserID,
        goal: Goal,
        regions: &[Region],
    ) -> Result<Plan, CreateError> {
        log_on_error!(
            self.assemble_plan(user_id, goal, regions),
            CreateError,
            "generate",
            "plan",
            CreateError::Conflict(_),
            CreateError::Invalid(_)
        )
    }

    fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
        log_on_error!(
            self.repository.delete_plan(id),
            DeleteError,
            "delete",
            "plan",
            DeleteError::NotFound
        )
    }
}

impl<R> PerformanceService for Service<R>
where
    R: ExerciseRepository + PlanRepository + PerformanceRepository,
{
    fn log_performance(
        &self,
        plan_item_id: PlanItemID,
        input: PerformanceInput,
    ) -> Result<Performance, CreateError> {
        log_on_error!(
            self.record_performance(plan_item_id, input),
            CreateError,
            "log",
            "performance",
            CreateError::MissingReference(_),
            CreateError::Invalid(_)
        )
    }

    fn get_performances(&self, plan_item_id: PlanItemID) -> Result<Vec<Performance>, ReadError> {
        log_on_error!(
            self.repository.read_performances(plan_item_id),
            ReadError,
            "get",
            "performances"
        )
    }

    fn get_exercise_history(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<Performance>, ReadError> {
        let mut performances = log_on_error!(
            self.repository.read_user_performances(user_id),
            ReadError,
            "get",
            "exercise history"
        )?;
        performances.retain(|p| p.exercise_id == exercise_id);
        performances.sort_by_key(|p| p.date);
        Ok(performances)
    }

    fn get_tracked_dates(
        &self,
        user_id: UserID,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>, ReadError> {
        log_on_error!(
            self.tracked_dates(user_id, year, month),
            ReadError,
            "get",
            "tracked dates"
        )
    }

    fn get_user_performances(&self, user_id: UserID) -> Result<Vec<Tracking>, ReadError> {
        log_on_error!(
            self.collect_trackings(user_id),
            ReadError,
            "get",
            "user performances"
        )
    }
}
