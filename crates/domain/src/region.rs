use std::{ops::RangeInclusive, slice::Iter};

use derive_more::Display;

/// Body region targeted by an exercise.
///
/// The iteration order is the order of the region flags in the classifier's feature vector
/// and in the training data file.
#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
    Legs,
    Chest,
    Arms,
    Back,
    #[display("Full Body")]
    FullBody,
}

impl Region {
    pub const COUNT: usize = 5;

    pub fn iter() -> Iter<'static, Region> {
        static REGIONS: [Region; Region::COUNT] = [
            Region::Legs,
            Region::Chest,
            Region::Arms,
            Region::Back,
            Region::FullBody,
        ];
        REGIONS.iter()
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Region::Legs => 0,
            Region::Chest => 1,
            Region::Arms => 2,
            Region::Back => 3,
            Region::FullBody => 4,
        }
    }
}

impl TryFrom<&str> for Region {
    type Error = RegionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Region::iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| RegionError::Unknown(trimmed.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RegionError {
    #[error("Unknown body region \"{0}\" (expected Legs, Chest, Arms, Back or Full Body)")]
    Unknown(String),
}

#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Goal {
    #[display("strength")]
    Strength,
    #[display("hypertrophy")]
    Hypertrophy,
}

impl Goal {
    /// Rep count range a training example with this goal is drawn from.
    #[must_use]
    pub fn rep_range(self) -> RangeInclusive<u32> {
        match self {
            Goal::Strength => 4..=6,
            Goal::Hypertrophy => 8..=14,
        }
    }
}

impl From<&str> for Goal {
    fn from(value: &str) -> Self {
        match value {
            "strength" => Goal::Strength,
            _ => Goal::Hypertrophy,
        }
    }
}

impl From<bool> for Goal {
    fn from(strength: bool) -> Self {
        if strength {
            Goal::Strength
        } else {
            Goal::Hypertrophy
        }
    }
}

/// One flag per region, indexed in [`Region::iter`] order.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct RegionFlags([bool; Region::COUNT]);

impl RegionFlags {
    #[must_use]
    pub fn new(flags: [bool; Region::COUNT]) -> Self {
        Self(flags)
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.0.iter().any(|f| *f)
    }

    #[must_use]
    pub fn contains(&self, region: Region) -> bool {
        self.0[region.index()]
    }

    pub fn set(&mut self, region: Region) {
        self.0[region.index()] = true;
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        Region::iter().copied().filter(|r| self.contains(*r))
    }
}

impl FromIterator<Region> for RegionFlags {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut flags = RegionFlags::default();
        for region in iter {
            flags.set(region);
        }
        flags
    }
}
