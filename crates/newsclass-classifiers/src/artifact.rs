//! Model artifact format and loading
//!
//! An artifact bundles a trained classifier with its label list. It is read
//! once at startup from a path fixed at deploy time.

use crate::classifier::{LabelList, LoadedModel};
use crate::linear::{LinearModelSpec, LinearTextClassifier};
use newsclass_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Artifact schema version understood by this build
pub const FORMAT_VERSION: u32 = 1;

/// File name used when no artifact path is configured
pub const DEFAULT_ARTIFACT_FILE: &str = "newsgroups_model.json";

/// On-disk artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    pub labels: Vec<String>,

    pub classifier: ClassifierSpec,
}

fn default_name() -> String {
    "model".to_string()
}

/// Serialized classifier variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Term-frequency features scored by a linear model
    LinearBagOfWords(LinearModelSpec),
}

/// Causes collapsed into [`Error::ArtifactLoad`]
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported format version {found} (expected {})", FORMAT_VERSION)]
    Version { found: u32 },

    #[error("invalid classifier: {0}")]
    Shape(#[from] crate::linear::ShapeError),
}

impl ModelArtifact {
    /// Parse an artifact, choosing the decoder from the file extension
    pub fn parse(path: &Path, bytes: &[u8]) -> std::result::Result<Self, ArtifactError> {
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let artifact: Self = if is_yaml {
            serde_yaml::from_slice(bytes)?
        } else {
            serde_json::from_slice(bytes)?
        };

        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Version {
                found: artifact.format_version,
            });
        }

        Ok(artifact)
    }

    /// Build the in-memory model
    pub fn into_model(self) -> std::result::Result<LoadedModel, ArtifactError> {
        let classifier = match self.classifier {
            ClassifierSpec::LinearBagOfWords(spec) => LinearTextClassifier::from_spec(spec)?,
        };

        Ok(LoadedModel::new(Arc::new(classifier), LabelList::new(self.labels))
            .with_metadata(self.name, self.version))
    }
}

/// Read and deserialize the artifact at `path`.
///
/// Every failure is reported as [`Error::ArtifactLoad`] with the cause
/// attached.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<LoadedModel> {
    let path = path.as_ref();
    debug!("Reading model artifact {}", path.display());

    read_artifact(path).map_err(|e| Error::artifact_load(path, e))
}

fn read_artifact(path: &Path) -> std::result::Result<LoadedModel, ArtifactError> {
    let bytes = std::fs::read(path)?;
    ModelArtifact::parse(path, &bytes)?.into_model()
}

/// Resolve a configured artifact path.
///
/// Absolute paths are kept. Relative paths are taken relative to `base`,
/// normally the directory holding the service executable.
pub fn resolve_artifact_path(configured: Option<&Path>, base: &Path) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => base.join(path),
        None => base.join(DEFAULT_ARTIFACT_FILE),
    }
}

/// Directory of the running executable, falling back to the working directory
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
