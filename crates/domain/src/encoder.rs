use std::collections::BTreeSet;

/// Maps class labels to dense integer codes and back.
///
/// Codes are positions in the sorted list of distinct labels.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            classes: labels
                .into_iter()
                .map(|l| l.as_ref().to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    pub fn from_classes(classes: Vec<String>) -> Result<Self, LabelEncoderError> {
        if let Some(position) = classes.windows(2).position(|w| w[0] >= w[1]) {
            return Err(LabelEncoderError::Unordered(position + 1));
        }
        Ok(Self { classes })
    }

    #[must_use]
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Result<&str, LabelEncoderError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(LabelEncoderError::UnknownCode(code))
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LabelEncoderError {
    #[error("label code {0} is not known to the encoder")]
    UnknownCode(usize),
    #[error("encoder classes must be sorted and unique (violated at position {0})")]
    Unordered(usize),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    static ENCODER: std::sync::LazyLock<LabelEncoder> = std::sync::LazyLock::new(|| {
        LabelEncoder::fit(["Squat;Lunges", "Deadlift", "Bench Press", "Deadlift"])
    });

    #[test]
    fn test_fit() {
        assert_eq!(
            ENCODER.classes(),
            &["Bench Press", "Deadlift", "Squat;Lunges"]
        );
        assert_eq!(ENCODER.len(), 3);
        assert!(LabelEncoder::fit(Vec::<String>::new()).is_empty());
    }

    #[rstest]
    #[case("Bench Press", Some(0))]
    #[case("Squat;Lunges", Some(2))]
    #[case("Squat", None)]
    fn test_encode(#[case] label: &str, #[case] expected: Option<usize>) {
        assert_eq!(ENCODER.encode(label), expected);
    }

    #[rstest]
    #[case(1, Ok("Deadlift"))]
    #[case(3, Err(LabelEncoderError::UnknownCode(3)))]
    fn test_decode(#[case] code: usize, #[case] expected: Result<&str, LabelEncoderError>) {
        assert_eq!(ENCODER.decode(code), expected);
    }

    #[rstest]
    #[case(vec!["a", "b"], Ok(()))]
    #[case(vec!["b", "a"], Err(LabelEncoderError::Unordered(1)))]
    #[case(vec!["a", "b", "b"], Err(LabelEncoderError::Unordered(2)))]
    fn test_from_classes(
        #[case] classes: Vec<&str>,
        #[case] expected: Result<(), LabelEncoderError>,
    ) {
        assert_eq!(
            LabelEncoder::from_classes(classes.into_iter().map(String::from).collect()).map(|_| ()),
            expected
        );
    }
}
