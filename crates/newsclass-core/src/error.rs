//! Error types for newsclass

use std::path::PathBuf;

/// Result type alias using newsclass's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by errors that collapse several failure sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for newsclass operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model artifact could not be read or deserialized
    #[error("failed to load model artifact {}: {source}", .path.display())]
    ArtifactLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A prediction was requested before a model was loaded
    #[error("model is not loaded")]
    ModelNotLoaded,

    /// The classifier failed or returned an unusable class index
    #[error("prediction failed: {source}")]
    Prediction {
        #[source]
        source: BoxError,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem/socket errors outside the artifact loader
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] used by hosts to map failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArtifactLoad,
    ModelNotLoaded,
    Prediction,
    Config,
    Io,
}

impl ErrorKind {
    /// Stable snake_case name, used in error bodies and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArtifactLoad => "artifact_load_error",
            Self::ModelNotLoaded => "model_not_loaded",
            Self::Prediction => "prediction_error",
            Self::Config => "config_error",
            Self::Io => "io_error",
        }
    }
}

impl Error {
    /// Create an artifact load error for `path`
    pub fn artifact_load(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a prediction error wrapping `source`
    pub fn prediction(source: impl Into<BoxError>) -> Self {
        Self::Prediction {
            source: source.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArtifactLoad { .. } => ErrorKind::ArtifactLoad,
            Self::ModelNotLoaded => ErrorKind::ModelNotLoaded,
            Self::Prediction { .. } => ErrorKind::Prediction,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// The classifier returned a class index with no matching label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("class index {index} out of range for {len} labels")]
pub struct LabelIndexOutOfRange {
    pub index: usize,
    pub len: usize,
}
