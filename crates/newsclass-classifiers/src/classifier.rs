//! Classifier trait and the loaded model types

use newsclass_core::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Capability interface for an externally-trained text classifier.
///
/// Implementations map a text to a class index. They must be deterministic
/// for a given input and are never mutated once loaded.
pub trait TextClassifier: Send + Sync {
    /// Classify the given text into a class index
    fn classify(&self, text: &str) -> Result<usize>;

    /// Number of classes the classifier can emit, when known
    fn num_classes(&self) -> Option<usize> {
        None
    }
}

/// Ordered class names; index `i` names class `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelList(Vec<String>);

impl LabelList {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// Label for class `index`, if the list is long enough
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Descriptive information carried by an artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Model version, if the artifact declares one
    pub version: Option<String>,

    /// Class count reported by the classifier
    pub num_classes: Option<usize>,
}

/// An immutable (classifier, labels) pair as published by the model holder
pub struct LoadedModel {
    classifier: Arc<dyn TextClassifier>,
    labels: LabelList,
    metadata: ModelMetadata,
}

impl LoadedModel {
    pub fn new(classifier: Arc<dyn TextClassifier>, labels: LabelList) -> Self {
        let metadata = ModelMetadata {
            name: "model".to_string(),
            version: None,
            num_classes: classifier.num_classes(),
        };

        Self {
            classifier,
            labels,
            metadata,
        }
    }

    /// Set name and version metadata
    pub fn with_metadata(mut self, name: impl Into<String>, version: Option<String>) -> Self {
        self.metadata.name = name.into();
        self.metadata.version = version;
        self
    }

    pub fn classifier(&self) -> &dyn TextClassifier {
        self.classifier.as_ref()
    }

    pub fn labels(&self) -> &LabelList {
        &self.labels
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("labels", &self.labels)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
