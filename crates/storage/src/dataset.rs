//! Training data file: one CSV row per example with the columns
//! `Goal,Legs,Chest,Arms,Back,Full Body,Lifts,Reps`.

use std::{
    io::{Read, Write},
    path::Path,
};

use liftplan_domain as domain;
use log::debug;

pub fn save_dataset(path: &Path, examples: &[domain::TrainingExample]) -> Result<(), DatasetError> {
    let mut buffer = vec![];
    write_dataset(&mut buffer, examples)?;
    crate::write_atomically(path, &buffer)?;
    debug!("wrote {} examples to {}", examples.len(), path.display());
    Ok(())
}

pub fn load_dataset(path: &Path) -> Result<Vec<domain::TrainingExample>, DatasetError> {
    let file = std::fs::File::open(path)?;
    let examples = read_dataset(file)?;
    debug!("read {} examples from {}", examples.len(), path.display());
    Ok(examples)
}

pub fn write_dataset<W: Write>(
    writer: W,
    examples: &[domain::TrainingExample],
) -> Result<(), DatasetError> {
    let mut writer = csv::Writer::from_writer(writer);
    for example in examples {
        writer.serialize(Record::from(example))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<domain::TrainingExample>, DatasetError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut examples = vec![];
    for (index, record) in reader.deserialize::<Record>().enumerate() {
        let line = index + 2;
        let example = domain::TrainingExample::try_from(record?)
            .map_err(|column| DatasetError::InvalidFlag { line, column })?;
        examples.push(example);
    }
    Ok(examples)
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: column {column} must be 0 or 1")]
    InvalidFlag { line: usize, column: &'static str },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
struct Record {
    goal: u8,
    legs: u8,
    chest: u8,
    arms: u8,
    back: u8,
    #[serde(rename = "Full Body")]
    full_body: u8,
    lifts: String,
    reps: u32,
}

impl From<&domain::TrainingExample> for Record {
    fn from(value: &domain::TrainingExample) -> Self {
        let flag = |region| u8::from(value.regions.contains(region));
        Self {
            goal: u8::from(value.goal == domain::Goal::Strength),
            legs: flag(domain::Region::Legs),
            chest: flag(domain::Region::Chest),
            arms: flag(domain::Region::Arms),
            back: flag(domain::Region::Back),
            full_body: flag(domain::Region::FullBody),
            lifts: value.label(),
            reps: value.reps,
        }
    }
}

impl TryFrom<Record> for domain::TrainingExample {
    type Error = &'static str;

    fn try_from(value: Record) -> Result<Self, Self::Error> {
        let flag = |v: u8, column: &'static str| match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(column),
        };
        Ok(Self {
            goal: domain::Goal::from(flag(value.goal, "Goal")?),
            regions: domain::RegionFlags::new([
                flag(value.legs, "Legs")?,
                flag(value.chest, "Chest")?,
                flag(value.arms, "Arms")?,
                flag(value.back, "Back")?,
                flag(value.full_body, "Full Body")?,
            ]),
            lifts: if value.lifts.is_empty() {
                vec![]
            } else {
                value
                    .lifts
                    .split(domain::TrainingExample::LIFT_SEPARATOR)
                    .map(ToString::to_string)
                    .collect()
            },
            reps: value.reps,
        })
    }
}
