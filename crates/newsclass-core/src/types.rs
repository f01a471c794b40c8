//! Request/response contract of the prediction operation

use serde::{Deserialize, Serialize};

/// A single classification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Text to classify
    pub text: String,
}

impl PredictionInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The label chosen for a [`PredictionInput`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionOutput {
    /// One of the loaded label list entries
    pub category: String,
}

impl PredictionOutput {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}
