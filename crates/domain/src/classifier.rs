use log::debug;

use crate::{
    DecisionTree, Goal, LabelEncoder, LabelEncoderError, Region, RegionFlags, Reps,
    TrainingExample, TreeError, TreeParams,
};

pub const FEATURE_COUNT: usize = 1 + Region::COUNT;

const LABEL_OUTPUT: usize = 0;
const REPS_OUTPUT: usize = 1;
const OUTPUT_COUNT: usize = 2;

/// Classifier input: the goal flag followed by one flag per region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features([f32; FEATURE_COUNT]);

impl Features {
    #[must_use]
    pub fn new(goal: Goal, regions: &RegionFlags) -> Self {
        let mut features = [0.0; FEATURE_COUNT];
        features[0] = flag(goal == Goal::Strength);
        for region in Region::iter() {
            features[1 + region.index()] = flag(regions.contains(*region));
        }
        Self(features)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedLift {
    /// One exercise name or several joined by `;`.
    pub lift_name: String,
    pub reps: Option<Reps>,
}

/// Trained model together with the encoder that turns its label codes back into exercise names.
///
/// Both parts are immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanClassifier {
    tree: DecisionTree,
    encoder: LabelEncoder,
}

impl PlanClassifier {
    pub fn fit(examples: &[TrainingExample], params: TreeParams) -> Result<Self, ClassifierError> {
        let encoder = LabelEncoder::fit(examples.iter().map(TrainingExample::label));

        let mut features = Vec::with_capacity(examples.len());
        let mut targets = Vec::with_capacity(examples.len());
        for example in examples {
            let label = encoder
                .encode(&example.label())
                .ok_or_else(|| ClassifierError::UnknownLabel(example.label()))?;
            features.push(Features::new(example.goal, &example.regions).as_slice().to_vec());
            targets.push(vec![u32::try_from(label)?, example.reps]);
        }

        let tree = DecisionTree::fit(&features, &targets, params)?;
        debug!(
            "fitted decision tree with {} nodes, depth {} and {} labels",
            tree.nodes().len(),
            tree.depth(),
            encoder.len()
        );

        Self::from_parts(tree, encoder)
    }

    /// Combines a model and an encoder, checking that they belong together.
    pub fn from_parts(tree: DecisionTree, encoder: LabelEncoder) -> Result<Self, ClassifierError> {
        if tree.n_features() != FEATURE_COUNT {
            return Err(TreeError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: tree.n_features(),
            }
            .into());
        }
        if tree.n_outputs() != OUTPUT_COUNT {
            return Err(TreeError::OutputCount.into());
        }
        for leaf in tree.leaves() {
            encoder.decode(leaf[LABEL_OUTPUT] as usize)?;
        }
        Ok(Self { tree, encoder })
    }

    pub fn predict(
        &self,
        goal: Goal,
        regions: &[Region],
    ) -> Result<Vec<PredictedLift>, ClassifierError> {
        let flags = regions.iter().copied().collect::<RegionFlags>();
        let row = self.tree.predict(Features::new(goal, &flags).as_slice())?;
        let lift_name = self.encoder.decode(row[LABEL_OUTPUT] as usize)?.to_string();
        Ok(vec![PredictedLift {
            lift_name,
            reps: Reps::new(row[REPS_OUTPUT]).ok(),
        }])
    }

    /// Fraction of examples for which both the exercise label and the rep count are predicted
    /// exactly.
    #[must_use]
    pub fn accuracy(&self, examples: &[TrainingExample]) -> f32 {
        if examples.is_empty() {
            return 0.0;
        }
        let hits = examples
            .iter()
            .filter(|e| {
                let Ok(row) = self
                    .tree
                    .predict(Features::new(e.goal, &e.regions).as_slice())
                else {
                    return false;
                };
                self.encoder.decode(row[LABEL_OUTPUT] as usize) == Ok(e.label().as_str())
                    && row[REPS_OUTPUT] == e.reps
            })
            .count();
        #[allow(clippy::cast_precision_loss)]
        let accuracy = hits as f32 / examples.len() as f32;
        accuracy
    }

    #[must_use]
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    #[must_use]
    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ClassifierError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Encoder(#[from] LabelEncoderError),
    #[error("label \"{0}\" is missing from the encoder")]
    UnknownLabel(String),
    #[error("too many distinct labels")]
    TooManyLabels,
}

impl From<std::num::TryFromIntError> for ClassifierError {
    fn from(_: std::num::TryFromIntError) -> Self {
        ClassifierError::TooManyLabels
    }
}
