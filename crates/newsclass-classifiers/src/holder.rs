//! Shared model state and prediction entry point
//!
//! [`ModelHolder`] owns the single (classifier, labels) pair of the service.
//! It starts `Unloaded`, moves to `Loaded` at most once, and stays there for
//! the rest of the process. Readers observe either state in full: the loaded
//! pair is published as one `Arc` under a write lock, and predictions only
//! hold the read lock long enough to clone that `Arc`.

use crate::classifier::{LabelList, LoadedModel, TextClassifier};
use crate::loader::{ArtifactLoader, FileArtifactLoader};
use newsclass_core::{Error, LabelIndexOutOfRange, Result};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Lifecycle state of the holder
#[derive(Debug, Clone, Default)]
pub enum ModelState {
    /// No classifier available
    #[default]
    Unloaded,
    /// Classifier and labels, immutable from here on
    Loaded(Arc<LoadedModel>),
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Readiness snapshot for health checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolderStatus {
    pub ready: bool,
    pub artifact_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Owner of the loaded model, shared by handle with every request handler
pub struct ModelHolder {
    artifact_path: PathBuf,
    loader: Box<dyn ArtifactLoader>,
    state: RwLock<ModelState>,
    last_error: RwLock<Option<String>>,
}

impl ModelHolder {
    /// Holder reading the artifact at `artifact_path` with the file loader
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self::with_loader(artifact_path, FileArtifactLoader)
    }

    /// Holder using a custom artifact loader
    pub fn with_loader(artifact_path: impl Into<PathBuf>, loader: impl ArtifactLoader + 'static) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            loader: Box::new(loader),
            state: RwLock::new(ModelState::Unloaded),
            last_error: RwLock::new(None),
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Load the artifact and publish it.
    ///
    /// On failure the holder stays `Unloaded` and the error is recorded for
    /// [`status`](Self::status). The error is also returned; callers that
    /// prefer to start degraded may ignore it. Once loaded, further calls
    /// leave the published model untouched, and a load that fails after a
    /// concurrent one has published reports `Ok(())` without recording.
    pub fn load(&self) -> Result<()> {
        if self.is_ready() {
            warn!(
                "Model already loaded, ignoring reload of {}",
                self.artifact_path.display()
            );
            return Ok(());
        }

        info!("Loading model from {}", self.artifact_path.display());
        let start = Instant::now();

        match self.loader.load(&self.artifact_path) {
            Ok(model) => {
                let mut state = self.state.write();
                if state.is_loaded() {
                    warn!("Model was published by a concurrent load, discarding this copy");
                    return Ok(());
                }

                info!(
                    model = %model.metadata().name,
                    labels = model.labels().len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Model loaded successfully"
                );
                *state = ModelState::Loaded(Arc::new(model));
                *self.last_error.write() = None;
                Ok(())
            }
            Err(e) => {
                let state = self.state.write();
                if state.is_loaded() {
                    warn!("Load failed after a concurrent load published the model: {}", e);
                    return Ok(());
                }

                error!("Error loading model: {}", e);
                *self.last_error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Classify `text` and return its label.
    ///
    /// Fails with [`Error::ModelNotLoaded`] while unloaded, without touching
    /// any classifier. Classifier faults and class indices with no label are
    /// reported as [`Error::Prediction`].
    pub fn predict(&self, text: &str) -> Result<String> {
        debug!(chars = text.chars().count(), "Running prediction");

        let model = match self.loaded() {
            Some(model) => model,
            None => {
                warn!("Model is not loaded");
                return Err(Error::ModelNotLoaded);
            }
        };

        let result = model
            .classifier()
            .classify(text)
            .map_err(|e| match e {
                Error::Prediction { .. } => e,
                other => Error::prediction(other),
            })
            .and_then(|index| {
                model.labels().get(index).map(str::to_string).ok_or_else(|| {
                    Error::prediction(LabelIndexOutOfRange {
                        index,
                        len: model.labels().len(),
                    })
                })
            });

        match &result {
            Ok(category) => info!(%category, "Prediction successful"),
            Err(e) => error!("Error during prediction: {}", e),
        }

        result
    }

    /// True once a model has been published
    pub fn is_ready(&self) -> bool {
        self.state.read().is_loaded()
    }

    /// Current state
    pub fn state(&self) -> ModelState {
        self.state.read().clone()
    }

    /// The published model, if any
    pub fn loaded(&self) -> Option<Arc<LoadedModel>> {
        match &*self.state.read() {
            ModelState::Loaded(model) => Some(Arc::clone(model)),
            ModelState::Unloaded => None,
        }
    }

    /// Labels of the published model
    pub fn labels(&self) -> Option<LabelList> {
        self.loaded().map(|model| model.labels().clone())
    }

    /// Error message of the last failed load, cleared by a successful one
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    pub fn status(&self) -> HolderStatus {
        let model = self.loaded();

        HolderStatus {
            ready: model.is_some(),
            artifact_path: self.artifact_path.clone(),
            model_name: model.as_ref().map(|m| m.metadata().name.clone()),
            model_version: model.as_ref().and_then(|m| m.metadata().version.clone()),
            label_count: model.as_ref().map(|m| m.labels().len()),
            last_error: self.last_error(),
        }
    }
}

impl std::fmt::Debug for ModelHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHolder")
            .field("artifact_path", &self.artifact_path)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}
