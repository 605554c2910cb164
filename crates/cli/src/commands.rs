use std::io::Write;

use anyhow::{Context, anyhow};
use liftplan_domain::{
    self as domain, ExerciseRepository, ExerciseService, PerformanceService, PlanService,
};
use liftplan_storage::{artifacts, dataset, store::Store};
use log::info;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

use crate::settings::Settings;

pub fn generate(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let exercises = store.read_exercises()?;
    let generator = domain::Generator::new(&exercises, settings.generator_config()?);
    let mut rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(rand::thread_rng())
            .context("failed to seed random number generator")?,
    };

    let examples = generator.generate(&mut rng, settings.samples);
    dataset::save_dataset(&settings.training_data, &examples).with_context(|| {
        format!(
            "failed to write training data to {}",
            settings.training_data.display()
        )
    })?;

    writeln!(
        out,
        "Wrote {} examples to {}",
        examples.len(),
        settings.training_data.display()
    )?;
    Ok(())
}

pub fn train(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let examples = dataset::load_dataset(&settings.training_data).with_context(|| {
        format!(
            "failed to read training data from {}",
            settings.training_data.display()
        )
    })?;
    info!("training on {} examples", examples.len());
    let classifier = domain::PlanClassifier::fit(&examples, settings.tree_params())
        .context("failed to train plan classifier")?;
    artifacts::save_classifier(&settings.artifact_dir, &classifier).with_context(|| {
        format!(
            "failed to save model to {}",
            settings.artifact_dir.display()
        )
    })?;

    writeln!(
        out,
        "Trained on {} examples: depth {}, {} leaves, {} labels, training accuracy {:.1} %",
        examples.len(),
        classifier.tree().depth(),
        classifier.tree().leaves().count(),
        classifier.encoder().len(),
        classifier.accuracy(&examples) * 100.0
    )?;
    Ok(())
}

pub fn plan(
    settings: &Settings,
    goal: &str,
    body_parts: &[String],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let classifier = artifacts::load_classifier(&settings.artifact_dir)
        .context("plan classifier is unavailable")?;
    let service = open_service(settings)?.with_classifier(classifier);

    let body_parts = body_parts.iter().map(String::as_str).collect::<Vec<_>>();
    let (goal, regions) = service.validate_plan_request(goal, &body_parts)?;
    let plan = service.generate_plan(settings.user_id(), goal, &regions)?;

    print_plan(&plan, &service.get_exercises()?, out)
}

pub fn plans(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    let plans = service.get_plans(settings.user_id())?;
    if plans.is_empty() {
        writeln!(out, "No plans")?;
        return Ok(());
    }
    let exercises = service.get_exercises()?;
    for plan in &plans {
        print_plan(plan, &exercises, out)?;
    }
    Ok(())
}

pub fn delete_plan(settings: &Settings, id: uuid::Uuid, out: &mut impl Write) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    service.delete_plan(id.into())?;
    writeln!(out, "Deleted plan {id}")?;
    Ok(())
}

pub struct PerformanceArgs<'a> {
    pub reps: &'a str,
    pub weight: &'a str,
    pub reps_in_reserve: &'a str,
    pub notes: Option<String>,
}

pub fn log_performance(
    settings: &Settings,
    plan_item_id: uuid::Uuid,
    args: PerformanceArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    let input = domain::PerformanceInput {
        reps: Some(service.validate_reps(args.reps)?),
        weight: Some(service.validate_weight(args.weight)?),
        reps_in_reserve: Some(service.validate_reps_in_reserve(args.reps_in_reserve)?),
        notes: args.notes,
    };
    let performance = service.log_performance(plan_item_id.into(), input)?;

    writeln!(
        out,
        "Logged {} reps at {} with {} in reserve, next weight: {}",
        performance.reps,
        performance.weight,
        performance.reps_in_reserve,
        performance.recommended_weight
    )?;
    Ok(())
}

pub fn history(settings: &Settings, exercise: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    let exercise = service
        .repository()
        .find_exercise_by_name(exercise)?
        .ok_or_else(|| anyhow!("unknown exercise \"{}\"", exercise.trim()))?;
    let performances = service.get_exercise_history(settings.user_id(), exercise.id)?;

    writeln!(out, "{}", exercise.name)?;
    if performances.is_empty() {
        writeln!(out, "  no performances logged")?;
    }
    for performance in performances {
        writeln!(
            out,
            "  {}  {} x {}  RIR {}  next {}",
            performance.date.format("%Y-%m-%d %H:%M"),
            performance.weight,
            performance.reps,
            performance.reps_in_reserve,
            performance.recommended_weight
        )?;
    }
    Ok(())
}

pub fn calendar(
    settings: &Settings,
    year: i32,
    month: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    let dates = service.get_tracked_dates(settings.user_id(), year, month)?;

    if dates.is_empty() {
        writeln!(out, "No sets logged in {year}-{month:02}")?;
    }
    for date in dates {
        writeln!(out, "{}", date.format("%Y-%m-%d"))?;
    }
    Ok(())
}

pub fn trackings(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    let trackings = service.get_user_performances(settings.user_id())?;

    if trackings.is_empty() {
        writeln!(out, "No performances")?;
    }
    for tracking in trackings {
        let performance = &tracking.performance;
        writeln!(
            out,
            "{}  {}  {}  {} x {}  RIR {}  next {}",
            performance.date.format("%Y-%m-%d"),
            tracking.plan_name,
            tracking.exercise_name,
            performance.weight,
            performance.reps,
            performance.reps_in_reserve,
            performance.recommended_weight
        )?;
    }
    Ok(())
}

pub fn recommend(
    settings: &Settings,
    weight: &str,
    reps_in_reserve: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let weight = domain::Weight::try_from(weight)?;
    let reps_in_reserve = domain::RIR::try_from(reps_in_reserve)?;
    let next = domain::recommend_next_weight(
        Some(weight),
        Some(reps_in_reserve),
        settings.plan_settings()?.weight_increment,
    )?;
    writeln!(out, "{next}")?;
    Ok(())
}

pub fn catalog(
    settings: &Settings,
    region: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let exercises = match region {
        Some(region) => store.list_exercises_by_region(domain::Region::try_from(region)?)?,
        None => store.read_exercises()?,
    };
    for region in domain::Region::iter() {
        let names = exercises
            .iter()
            .filter(|e| e.region == *region)
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>();
        if !names.is_empty() {
            writeln!(out, "{region}: {}", names.join(", "))?;
        }
    }
    Ok(())
}

fn open_store(settings: &Settings) -> anyhow::Result<Store> {
    Store::open(&settings.store)
        .with_context(|| format!("failed to open store at {}", settings.store.display()))
}

fn open_service(settings: &Settings) -> anyhow::Result<domain::Service<Store>> {
    Ok(domain::Service::new(
        open_store(settings)?,
        settings.plan_settings()?,
    ))
}

fn print_plan(
    plan: &domain::Plan,
    exercises: &[domain::Exercise],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} ({}, {} min) [{}]",
        plan.name,
        plan.goal,
        plan.duration.num_minutes(),
        *plan.id
    )?;
    for (position, item) in plan.items.iter().enumerate() {
        let name = exercises
            .iter()
            .find(|e| e.id == item.exercise_id)
            .map_or("unknown exercise", |e| e.name.as_str());
        writeln!(
            out,
            "  {}. {name}: {} x {} [{}]",
            position + 1,
            item.sets,
            item.reps,
            *item.id
        )?;
    }
    Ok(())
}
