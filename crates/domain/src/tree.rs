//! Multi-output classification tree (CART).
//!
//! Every output is an independent class distribution. A split is chosen to minimize the mean
//! Gini impurity over all outputs, and a leaf predicts the most frequent class of each output.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        values: Vec<u32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_outputs: usize,
}

impl DecisionTree {
    pub fn fit(
        features: &[Vec<f32>],
        targets: &[Vec<u32>],
        params: TreeParams,
    ) -> Result<Self, TreeError> {
        let Some(first) = features.first() else {
            return Err(TreeError::Empty);
        };
        let n_features = first.len();
        let n_outputs = targets.first().map_or(0, Vec::len);

        if features.len() != targets.len() {
            return Err(TreeError::MismatchedLengths(features.len(), targets.len()));
        }
        if let Some(row) = features.iter().find(|row| row.len() != n_features) {
            return Err(TreeError::FeatureCount {
                expected: n_features,
                actual: row.len(),
            });
        }
        if n_outputs == 0 || targets.iter().any(|row| row.len() != n_outputs) {
            return Err(TreeError::OutputCount);
        }

        let mut builder = Builder {
            features,
            targets,
            params,
            n_outputs,
            nodes: vec![],
        };
        builder.build((0..features.len()).collect(), 0);

        Ok(Self {
            nodes: builder.nodes,
            n_features,
            n_outputs,
        })
    }

    /// Reassembles a tree from its flat node list, e.g. after loading it from storage.
    pub fn from_nodes(
        nodes: Vec<Node>,
        n_features: usize,
        n_outputs: usize,
    ) -> Result<Self, TreeError> {
        if nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        for (i, node) in nodes.iter().enumerate() {
            let valid = match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < n_features
                        && threshold.is_finite()
                        && *left > i
                        && *right > i
                        && *left < nodes.len()
                        && *right < nodes.len()
                }
                Node::Leaf { values } => values.len() == n_outputs,
            };
            if !valid {
                return Err(TreeError::InvalidNode(i));
            }
        }
        Ok(Self {
            nodes,
            n_features,
            n_outputs,
        })
    }

    pub fn predict(&self, features: &[f32]) -> Result<&[u32], TreeError> {
        if features.len() != self.n_features {
            return Err(TreeError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(Node::Leaf { values }) => return Ok(values),
                None => return Err(TreeError::InvalidNode(index)),
            }
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    pub fn leaves(&self) -> impl Iterator<Item = &[u32]> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Leaf { values } => Some(values.as_slice()),
            Node::Split { .. } => None,
        })
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Split { left, right, .. } => {
                    1 + depth_of(nodes, *left).max(depth_of(nodes, *right))
                }
                Node::Leaf { .. } => 0,
            }
        }
        depth_of(&self.nodes, 0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TreeError {
    #[error("no training samples")]
    Empty,
    #[error("number of feature rows and target rows differ ({0} != {1})")]
    MismatchedLengths(usize, usize),
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("every target row must have the same, non-zero number of outputs")]
    OutputCount,
    #[error("invalid tree node at index {0}")]
    InvalidNode(usize),
}

struct Builder<'a> {
    features: &'a [Vec<f32>],
    targets: &'a [Vec<u32>],
    params: TreeParams,
    n_outputs: usize,
    nodes: Vec<Node>,
}

struct Split {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

const MIN_IMPURITY_DECREASE: f64 = 1e-12;

impl Builder<'_> {
    fn build(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let index = self.nodes.len();
        let values = self.majority(&samples);
        self.nodes.push(Node::Leaf { values });

        let impurity = self.impurity(&samples);
        if impurity <= MIN_IMPURITY_DECREASE
            || samples.len() < self.params.min_samples_split
            || self.params.max_depth.is_some_and(|max| depth >= max)
        {
            return index;
        }

        let Some(split) = self.best_split(&samples) else {
            return index;
        };
        if split.impurity >= impurity - MIN_IMPURITY_DECREASE {
            return index;
        }

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|s| self.features[*s][split.feature] <= split.threshold);
        let left = self.build(left, depth + 1);
        let right = self.build(right, depth + 1);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    fn best_split(&self, samples: &[usize]) -> Option<Split> {
        let mut best: Option<Split> = None;
        for feature in 0..self.features[samples[0]].len() {
            let mut values = samples
                .iter()
                .map(|s| self.features[*s][feature])
                .collect::<Vec<_>>();
            values.sort_by(f32::total_cmp);
            values.dedup();

            for pair in values.windows(2) {
                let threshold = pair[0] + (pair[1] - pair[0]) / 2.0;
                let (left, right): (Vec<usize>, Vec<usize>) = samples
                    .iter()
                    .partition(|s| self.features[**s][feature] <= threshold);
                #[allow(clippy::cast_precision_loss)]
                let impurity = (left.len() as f64 * self.impurity(&left)
                    + right.len() as f64 * self.impurity(&right))
                    / samples.len() as f64;
                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    best = Some(Split {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }
        best
    }

    fn class_counts(&self, samples: &[usize], output: usize) -> BTreeMap<u32, usize> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for s in samples {
            *counts.entry(self.targets[*s][output]).or_insert(0) += 1;
        }
        counts
    }

    fn impurity(&self, samples: &[usize]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = samples.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let total = (0..self.n_outputs)
            .map(|output| {
                1.0 - self
                    .class_counts(samples, output)
                    .values()
                    .map(|c| (*c as f64 / n).powi(2))
                    .sum::<f64>()
            })
            .sum::<f64>();
        #[allow(clippy::cast_precision_loss)]
        let mean = total / self.n_outputs as f64;
        mean
    }

    fn majority(&self, samples: &[usize]) -> Vec<u32> {
        (0..self.n_outputs)
            .map(|output| {
                let mut best = (0, 0);
                for (value, count) in self.class_counts(samples, output) {
                    if count > best.1 {
                        best = (value, count);
                    }
                }
                best.0
            })
            .collect()
    }
}
