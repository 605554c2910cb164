//! Seed data for the exercise catalog.

use crate::Region;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogExercise {
    pub name: &'static str,
    pub region: Region,
}

const fn exercise(name: &'static str, region: Region) -> CatalogExercise {
    CatalogExercise { name, region }
}

pub static EXERCISES: &[CatalogExercise] = &[
    // Chest
    exercise("Barbell Bench Press", Region::Chest),
    exercise("Barbell Bench Incline Press", Region::Chest),
    exercise("Dumbbell Flat Press", Region::Chest),
    exercise("Dumbbell Incline Press", Region::Chest),
    exercise("Machine Chest Press", Region::Chest),
    exercise("Bench Press", Region::Chest),
    exercise("Push-Ups", Region::Chest),
    exercise("Pec Deck", Region::Chest),
    exercise("Cable Chest Press", Region::Chest),
    exercise("Chest Flies (DB or Cable)", Region::Chest),
    exercise("Weighted Dips", Region::Chest),
    // Legs
    exercise("Squat", Region::Legs),
    exercise("High Bar Squat", Region::Legs),
    exercise("Low Bar Squat", Region::Legs),
    exercise("Box Squat", Region::Legs),
    exercise("Pin Press Squat", Region::Legs),
    exercise("Lunges", Region::Legs),
    exercise("Leg Press", Region::Legs),
    exercise("Leg Extensions", Region::Legs),
    exercise("Hamstring Curls", Region::Legs),
    exercise("Hip Abductors", Region::Legs),
    exercise("Hip Adductors", Region::Legs),
    exercise("Hip Thrust", Region::Legs),
    exercise("Calf Raise", Region::Legs),
    exercise("Romanian Deadlift", Region::Legs),
    exercise("Bulgarian Split Squats", Region::Legs),
    // Arms and shoulders
    exercise("Shoulder Dumbbell Press", Region::Arms),
    exercise("Shoulder Barbell Press", Region::Arms),
    exercise("Shoulder Machine Press", Region::Arms),
    exercise("Dumbbell Curl", Region::Arms),
    exercise("Barbell Curl", Region::Arms),
    exercise("Hammer Curl", Region::Arms),
    exercise("Spider Curl", Region::Arms),
    exercise("Machine Curl", Region::Arms),
    exercise("Cable Curl", Region::Arms),
    exercise("Overhead Tricep Press", Region::Arms),
    exercise("Overhead Tricep Extensions", Region::Arms),
    exercise("Single Arm Tricep Extensions", Region::Arms),
    exercise("Tricep Extension", Region::Arms),
    exercise("Skull Crushers", Region::Arms),
    exercise("Tricep Pushdowns", Region::Arms),
    exercise("Lat Raises", Region::Arms),
    exercise("Front Raises", Region::Arms),
    // Back
    exercise("Barbell Row", Region::Back),
    exercise("Dumbbell Row", Region::Back),
    exercise("Cable Row", Region::Back),
    exercise("T-Bar Row", Region::Back),
    exercise("Pull-Ups", Region::Back),
    exercise("Lat Pull Downs", Region::Back),
    exercise("Lat Pull Overs", Region::Back),
    exercise("Rear Delt Flies", Region::Back),
    exercise("Upright Row", Region::Back),
    // Full body
    exercise("Deadlift", Region::FullBody),
    exercise("Sumo Deadlift", Region::FullBody),
    exercise("Standing Overhead Press", Region::FullBody),
    exercise("Plank", Region::FullBody),
    exercise("Russian Twist", Region::FullBody),
];
