//! Persisted form of the trained plan classifier.
//!
//! The tree and the label encoder are stored in two files that are only valid together. Both
//! carry a format version and the id of the training run that produced them. Loading fails
//! unless the ids agree and the encoder decodes every leaf of the tree.

use std::path::{Path, PathBuf};

use liftplan_domain as domain;
use log::{debug, info};
use strum::AsRefStr;
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    #[strum(serialize = "plan_model.bin")]
    Model,
    #[strum(serialize = "label_encoder.bin")]
    Encoder,
}

impl Artifact {
    #[must_use]
    pub fn path(self, dir: &Path) -> PathBuf {
        dir.join(self.as_ref())
    }
}

pub fn save_classifier(
    dir: &Path,
    classifier: &domain::PlanClassifier,
) -> Result<(), ArtifactError> {
    let training = Uuid::new_v4();
    let model = postcard::to_stdvec(&Model::new(training, classifier.tree()))?;
    let encoder = postcard::to_stdvec(&Encoder::new(training, classifier.encoder()))?;
    crate::write_atomically(&Artifact::Model.path(dir), &model)?;
    crate::write_atomically(&Artifact::Encoder.path(dir), &encoder)?;
    info!(
        "saved model with {} nodes and {} labels to {}",
        classifier.tree().nodes().len(),
        classifier.encoder().len(),
        dir.display()
    );
    Ok(())
}

pub fn load_classifier(dir: &Path) -> Result<domain::PlanClassifier, ArtifactError> {
    let model: Model = postcard::from_bytes(&read(Artifact::Model, dir)?)?;
    check_version(Artifact::Model, model.version)?;
    let encoder: Encoder = postcard::from_bytes(&read(Artifact::Encoder, dir)?)?;
    check_version(Artifact::Encoder, encoder.version)?;
    if model.training != encoder.training {
        return Err(ArtifactError::TrainingMismatch);
    }

    let tree = domain::DecisionTree::from_nodes(
        model.nodes.into_iter().map(domain::Node::from).collect(),
        model.n_features,
        model.n_outputs,
    )?;
    let encoder = domain::LabelEncoder::from_classes(encoder.classes)?;
    let classifier = domain::PlanClassifier::from_parts(tree, encoder)?;
    debug!(
        "loaded model of depth {} with {} labels from {}",
        classifier.tree().depth(),
        classifier.encoder().len(),
        dir.display()
    );

    Ok(classifier)
}

fn read(artifact: Artifact, dir: &Path) -> Result<Vec<u8>, ArtifactError> {
    let path = artifact.path(dir);
    std::fs::read(&path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing(path),
        _ => ArtifactError::Io(err),
    })
}

fn check_version(artifact: Artifact, version: u32) -> Result<(), ArtifactError> {
    if version == FORMAT_VERSION {
        Ok(())
    } else {
        Err(ArtifactError::UnsupportedVersion { artifact, version })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("{} not found, train the model first", .0.display())]
    Missing(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode or decode artifact: {0}")]
    Encoding(#[from] postcard::Error),
    #[error("unsupported format version {version} of {}", artifact.as_ref())]
    UnsupportedVersion { artifact: Artifact, version: u32 },
    #[error("invalid model: {0}")]
    Tree(#[from] domain::TreeError),
    #[error("invalid label encoder: {0}")]
    Encoder(#[from] domain::LabelEncoderError),
    #[error("model and label encoder were saved by different trainings")]
    TrainingMismatch,
    #[error("model and label encoder do not match: {0}")]
    Classifier(#[from] domain::ClassifierError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
struct Model {
    version: u32,
    training: Uuid,
    n_features: usize,
    n_outputs: usize,
    nodes: Vec<Node>,
}

impl Model {
    fn new(training: Uuid, tree: &domain::DecisionTree) -> Self {
        Self {
            version: FORMAT_VERSION,
            training,
            n_features: tree.n_features(),
            n_outputs: tree.n_outputs(),
            nodes: tree.nodes().iter().map(Node::from).collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
enum Node {
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

impl From<&domain::Node> for Node {
    fn from(value: &domain::Node) -> Self {
        match value {
            domain::Node::Split {
                feature,
                threshold,
                left,
                right,
            } => Node::Split {
                feature: *feature,
                threshold: *threshold,
                left: *left,
                right: *right,
            },
            domain::Node::Leaf { values } => Node::Leaf {
                values: values.clone(),
            },
        }
    }
}

impl From<Node> for domain::Node {
    fn from(value: Node) -> Self {
        match value {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => domain::Node::Split {
                feature,
                threshold,
                left,
                right,
            },
            Node::Leaf { values } => domain::Node::Leaf { values },
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
struct Encoder {
    version: u32,
    training: Uuid,
    classes: Vec<String>,
}

impl Encoder {
    fn new(training: Uuid, encoder: &domain::LabelEncoder) -> Self {
        Self {
            version: FORMAT_VERSION,
            training,
            classes: encoder.classes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::tests::data::TRAINING_EXAMPLES;

    use super::*;

    fn classifier() -> domain::PlanClassifier {
        domain::PlanClassifier::fit(&TRAINING_EXAMPLES, domain::TreeParams::default()).unwrap()
    }

    fn saved_encoder(dir: &Path) -> Encoder {
        postcard::from_bytes(&std::fs::read(Artifact::Encoder.path(dir)).unwrap()).unwrap()
    }

    #[rstest]
    #[case(Artifact::Model, "plan_model.bin")]
    #[case(Artifact::Encoder, "label_encoder.bin")]
    fn test_artifact_path(#[case] artifact: Artifact, #[case] file_name: &str) {
        assert_eq!(
            artifact.path(Path::new("models")),
            Path::new("models").join(file_name)
        );
    }

    #[test]
    fn test_save_and_load_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier();

        save_classifier(dir.path(), &classifier).unwrap();
        let loaded = load_classifier(dir.path()).unwrap();

        assert_eq!(loaded, classifier);
        assert_eq!(
            loaded
                .predict(domain::Goal::Strength, &[domain::Region::Legs])
                .unwrap()[0]
                .lift_name,
            "Back Squat;Lunge"
        );
    }

    #[test]
    fn test_load_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            load_classifier(dir.path()),
            Err(ArtifactError::Missing(path)) if path == Artifact::Model.path(dir.path())
        ));
    }

    #[test]
    fn test_load_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        save_classifier(dir.path(), &classifier()).unwrap();
        let encoder = Encoder {
            version: FORMAT_VERSION + 1,
            classes: vec![],
            ..saved_encoder(dir.path())
        };
        std::fs::write(
            Artifact::Encoder.path(dir.path()),
            postcard::to_stdvec(&encoder).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            load_classifier(dir.path()),
            Err(ArtifactError::UnsupportedVersion {
                artifact: Artifact::Encoder,
                version: 2
            })
        ));
    }

    #[test]
    fn test_load_mismatched_encoder() {
        let dir = tempfile::tempdir().unwrap();
        save_classifier(dir.path(), &classifier()).unwrap();
        let encoder = Encoder {
            classes: vec!["Back Squat".to_string()],
            ..saved_encoder(dir.path())
        };
        std::fs::write(
            Artifact::Encoder.path(dir.path()),
            postcard::to_stdvec(&encoder).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            load_classifier(dir.path()),
            Err(ArtifactError::Classifier(_))
        ));
    }

    #[test]
    fn test_load_encoder_of_other_training() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        save_classifier(dir.path(), &classifier()).unwrap();
        save_classifier(other.path(), &classifier()).unwrap();
        std::fs::copy(
            Artifact::Encoder.path(other.path()),
            Artifact::Encoder.path(dir.path()),
        )
        .unwrap();

        assert!(matches!(
            load_classifier(dir.path()),
            Err(ArtifactError::TrainingMismatch)
        ));
        assert!(load_classifier(other.path()).is_ok());
    }

    #[test]
    fn test_load_corrupt_model() {
        let dir = tempfile::tempdir().unwrap();
        save_classifier(dir.path(), &classifier()).unwrap();
        std::fs::write(Artifact::Model.path(dir.path()), [1, 0xff]).unwrap();

        assert!(load_classifier(dir.path()).is_err());
    }
}
