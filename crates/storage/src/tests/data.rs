use std::sync::LazyLock;

use chrono::Duration;
use liftplan_domain as domain;

use crate::store::Store;

pub static USER: LazyLock<domain::UserID> = LazyLock::new(|| 1.into());

pub static USER_2: LazyLock<domain::UserID> = LazyLock::new(|| 2.into());

pub static EXERCISES: LazyLock<Vec<domain::Exercise>> = LazyLock::new(|| {
    vec![
        EXERCISE.clone(),
        EXERCISE_2.clone(),
        EXERCISE_3.clone(),
        EXERCISE_4.clone(),
    ]
});

pub static EXERCISE: LazyLock<domain::Exercise> = LazyLock::new(|| domain::Exercise {
    id: 1.into(),
    name: domain::Name::new("Back Squat").unwrap(),
    region: domain::Region::Legs,
});

pub static EXERCISE_2: LazyLock<domain::Exercise> = LazyLock::new(|| domain::Exercise {
    id: 2.into(),
    name: domain::Name::new("Lunge").unwrap(),
    region: domain::Region::Legs,
});

pub static EXERCISE_3: LazyLock<domain::Exercise> = LazyLock::new(|| domain::Exercise {
    id: 3.into(),
    name: domain::Name::new("Barbell Bench Press").unwrap(),
    region: domain::Region::Chest,
});

pub static EXERCISE_4: LazyLock<domain::Exercise> = LazyLock::new(|| domain::Exercise {
    id: 4.into(),
    name: domain::Name::new("Deadlift").unwrap(),
    region: domain::Region::FullBody,
});

pub static NEW_PLAN: LazyLock<domain::NewPlan> = LazyLock::new(|| domain::NewPlan {
    user_id: *USER,
    name: domain::Name::new("Legs workout").unwrap(),
    goal: domain::Goal::Strength,
    duration: Duration::minutes(50),
    items: vec![
        domain::NewPlanItem {
            exercise_id: EXERCISE.id,
            sets: domain::Sets::default(),
            reps: domain::Reps::new(5).unwrap(),
        },
        domain::NewPlanItem {
            exercise_id: EXERCISE_2.id,
            sets: domain::Sets::default(),
            reps: domain::Reps::new(5).unwrap(),
        },
    ],
});

pub static TRAINING_EXAMPLES: LazyLock<Vec<domain::TrainingExample>> = LazyLock::new(|| {
    vec![
        domain::TrainingExample {
            goal: domain::Goal::Strength,
            regions: [domain::Region::Legs].into_iter().collect(),
            lifts: vec!["Back Squat".to_string(), "Lunge".to_string()],
            reps: 5,
        },
        domain::TrainingExample {
            goal: domain::Goal::Hypertrophy,
            regions: [domain::Region::Chest].into_iter().collect(),
            lifts: vec!["Barbell Bench Press".to_string()],
            reps: 12,
        },
        domain::TrainingExample {
            goal: domain::Goal::Hypertrophy,
            regions: [domain::Region::Legs, domain::Region::FullBody]
                .into_iter()
                .collect(),
            lifts: vec![
                "Lunge".to_string(),
                "Deadlift".to_string(),
                "Back Squat".to_string(),
            ],
            reps: 9,
        },
    ]
});

pub fn seeded_store() -> Store {
    Store::with_exercises(EXERCISES.clone())
}

pub fn new_performance(plan_item_id: domain::PlanItemID, weight: f32) -> domain::NewPerformance {
    domain::NewPerformance {
        plan_item_id,
        reps: domain::Reps::new(5).unwrap(),
        weight: domain::Weight::new(weight).unwrap(),
        reps_in_reserve: domain::RIR::new(2).unwrap(),
        notes: Some("felt heavy".to_string()),
        recommended_weight: domain::Weight::new(weight).unwrap(),
    }
}
