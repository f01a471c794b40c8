//! Linear bag-of-words classifier
//!
//! Scores a term-frequency (optionally TF-IDF) vector against one weight row
//! per class and returns the best scoring class. A single weight row is a
//! binary model: a positive decision value selects class 1.

use crate::classifier::TextClassifier;
use newsclass_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Serialized parameters of a [`LinearTextClassifier`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelSpec {
    /// Term -> feature column
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column
    #[serde(default)]
    pub idf: Option<Vec<f32>>,

    /// Replace raw term counts with `1 + ln(tf)`
    #[serde(default)]
    pub sublinear_tf: bool,

    /// L2-normalize the feature vector
    #[serde(default = "default_true")]
    pub normalize: bool,

    /// Lowercase tokens before vocabulary lookup
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// One row of `vocabulary.len()` weights per class
    pub coefficients: Vec<Vec<f32>>,

    /// One bias per row of `coefficients`
    pub intercepts: Vec<f32>,
}

fn default_true() -> bool {
    true
}

/// Structural problems found when building a classifier from its spec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("classifier has no coefficient rows")]
    Empty,

    #[error("coefficient row {row} has {found} weights, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("{found} intercepts for {expected} coefficient rows")]
    Intercepts { found: usize, expected: usize },

    #[error("term '{term}' maps to column {column}, but only {width} columns exist")]
    Column {
        term: String,
        column: usize,
        width: usize,
    },

    #[error("idf has {found} entries, expected {expected}")]
    Idf { found: usize, expected: usize },
}

/// Bag-of-words linear classifier
#[derive(Debug, Clone)]
pub struct LinearTextClassifier {
    spec: LinearModelSpec,
    width: usize,
}

impl LinearTextClassifier {
    /// Validate `spec` and build the classifier
    pub fn from_spec(spec: LinearModelSpec) -> std::result::Result<Self, ShapeError> {
        let width = spec.coefficients.first().ok_or(ShapeError::Empty)?.len();

        for (row, weights) in spec.coefficients.iter().enumerate() {
            if weights.len() != width {
                return Err(ShapeError::RowWidth {
                    row,
                    found: weights.len(),
                    expected: width,
                });
            }
        }

        if spec.intercepts.len() != spec.coefficients.len() {
            return Err(ShapeError::Intercepts {
                found: spec.intercepts.len(),
                expected: spec.coefficients.len(),
            });
        }

        if let Some((term, &column)) = spec.vocabulary.iter().find(|&(_, &c)| c >= width) {
            return Err(ShapeError::Column {
                term: term.clone(),
                column,
                width,
            });
        }

        if let Some(idf) = &spec.idf {
            if idf.len() != width {
                return Err(ShapeError::Idf {
                    found: idf.len(),
                    expected: width,
                });
            }
        }

        Ok(Self { spec, width })
    }

    pub fn spec(&self) -> &LinearModelSpec {
        &self.spec
    }

    /// Sparse feature vector for `text`, ordered by column
    fn features(&self, text: &str) -> Vec<(usize, f32)> {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();

        for token in tokenize(text) {
            let column = if self.spec.lowercase {
                self.spec.vocabulary.get(&token.to_lowercase())
            } else {
                self.spec.vocabulary.get(token)
            };
            if let Some(&column) = column {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(column, tf)| {
                let mut value = if self.spec.sublinear_tf { 1.0 + tf.ln() } else { tf };
                if let Some(idf) = &self.spec.idf {
                    value *= idf[column];
                }
                (column, value)
            })
            .collect();

        if self.spec.normalize {
            let norm = features.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                features.iter_mut().for_each(|(_, v)| *v /= norm);
            }
        }

        features
    }

    /// Decision value per coefficient row
    pub fn decision_function(&self, text: &str) -> Vec<f32> {
        let features = self.features(text);

        self.spec
            .coefficients
            .iter()
            .zip(&self.spec.intercepts)
            .map(|(weights, bias)| {
                bias + features
                    .iter()
                    .map(|&(column, value)| weights[column] * value)
                    .sum::<f32>()
            })
            .collect()
    }

    /// Number of feature columns
    pub fn width(&self) -> usize {
        self.width
    }
}

impl TextClassifier for LinearTextClassifier {
    fn classify(&self, text: &str) -> Result<usize> {
        let scores = self.decision_function(text);

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(newsclass_core::Error::prediction(format!(
                "non-finite decision value for {} classes",
                scores.len()
            )));
        }

        if let &[decision] = scores.as_slice() {
            return Ok(usize::from(decision > 0.0));
        }

        // Ties resolve to the lowest class index.
        let mut best = 0;
        for (index, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = index;
            }
        }
        Ok(best)
    }

    fn num_classes(&self) -> Option<usize> {
        match self.spec.coefficients.len() {
            1 => Some(2),
            n => Some(n),
        }
    }
}

/// Split text into word tokens of at least two characters
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().nth(1).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two classes: "space" terms vs "autos" terms
    fn space_autos_spec() -> LinearModelSpec {
        let vocabulary = [("orbit", 0), ("nasa", 1), ("engine", 2), ("sedan", 3)]
            .into_iter()
            .map(|(t, c)| (t.to_string(), c))
            .collect();

        LinearModelSpec {
            vocabulary,
            idf: None,
            sublinear_tf: false,
            normalize: true,
            lowercase: true,
            coefficients: vec![vec![1.0, 1.0, -0.5, -1.0], vec![-1.0, -0.5, 1.0, 1.0]],
            intercepts: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_tokenize_skips_short_tokens() {
        let tokens: Vec<_> = tokenize("A rocket, to orbit! x_y").collect();
        assert_eq!(tokens, vec!["rocket", "to", "orbit", "x_y"]);
    }

    #[test]
    fn test_classify_by_dominant_terms() {
        let classifier = LinearTextClassifier::from_spec(space_autos_spec()).unwrap();

        assert_eq!(classifier.classify("NASA put it in orbit").unwrap(), 0);
        assert_eq!(classifier.classify("my sedan needs a new engine").unwrap(), 1);
        assert_eq!(classifier.num_classes(), Some(2));
    }

    #[test]
    fn test_unknown_text_uses_intercepts() {
        let mut spec = space_autos_spec();
        spec.intercepts = vec![0.0, 0.25];
        let classifier = LinearTextClassifier::from_spec(spec).unwrap();

        assert_eq!(classifier.classify("nothing relevant here").unwrap(), 1);
    }

    #[test]
    fn test_binary_single_row() {
        let mut spec = space_autos_spec();
        spec.coefficients.truncate(1);
        spec.intercepts.truncate(1);
        let classifier = LinearTextClassifier::from_spec(spec).unwrap();

        assert_eq!(classifier.num_classes(), Some(2));
        assert_eq!(classifier.classify("orbit").unwrap(), 1);
        assert_eq!(classifier.classify("sedan").unwrap(), 0);
    }

    #[test]
    fn test_idf_and_sublinear_tf() {
        let mut spec = space_autos_spec();
        spec.idf = Some(vec![1.0, 1.0, 4.0, 1.0]);
        spec.sublinear_tf = true;
        spec.normalize = false;
        let classifier = LinearTextClassifier::from_spec(spec).unwrap();

        // engine: 1 * idf 4 outweighs orbit repeated three times (1 + ln 3)
        let scores = classifier.decision_function("orbit orbit orbit engine");
        assert!(scores[1] > scores[0], "scores: {:?}", scores);
    }

    #[test]
    fn test_case_sensitive_vocabulary() {
        let mut spec = space_autos_spec();
        spec.lowercase = false;
        spec.intercepts = vec![0.1, 0.0];
        let classifier = LinearTextClassifier::from_spec(spec).unwrap();

        assert_eq!(classifier.classify("ENGINE SEDAN").unwrap(), 0);
        assert_eq!(classifier.classify("engine sedan").unwrap(), 1);
    }

    #[test]
    fn test_shape_validation() {
        let mut spec = space_autos_spec();
        spec.coefficients[1].pop();
        assert!(matches!(
            LinearTextClassifier::from_spec(spec),
            Err(ShapeError::RowWidth { row: 1, found: 3, expected: 4 })
        ));

        let mut spec = space_autos_spec();
        spec.intercepts.push(0.0);
        assert!(matches!(
            LinearTextClassifier::from_spec(spec),
            Err(ShapeError::Intercepts { found: 3, expected: 2 })
        ));

        let mut spec = space_autos_spec();
        spec.vocabulary.insert("launch".to_string(), 9);
        assert!(matches!(
            LinearTextClassifier::from_spec(spec),
            Err(ShapeError::Column { column: 9, .. })
        ));

        let mut spec = space_autos_spec();
        spec.idf = Some(vec![1.0]);
        assert!(matches!(
            LinearTextClassifier::from_spec(spec),
            Err(ShapeError::Idf { found: 1, expected: 4 })
        ));

        let mut spec = space_autos_spec();
        spec.coefficients.clear();
        assert_eq!(LinearTextClassifier::from_spec(spec).unwrap_err(), ShapeError::Empty);
    }

    #[test]
    fn test_non_finite_scores_fail() {
        let mut spec = space_autos_spec();
        spec.intercepts = vec![f32::NAN, 0.0];
        let classifier = LinearTextClassifier::from_spec(spec).unwrap();

        assert!(classifier.classify("orbit").is_err());
    }
}
