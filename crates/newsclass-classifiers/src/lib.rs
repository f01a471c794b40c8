//! newsclass Classifiers
//!
//! The classification side of the newsclass inference service:
//! - [`TextClassifier`], the capability every trained model satisfies
//! - the artifact format and its loader
//! - [`LinearTextClassifier`], the bag-of-words model stored in artifacts
//! - [`ModelHolder`], which owns the loaded model and serves predictions
//!
//! Classification is synchronous and CPU-bound; async hosts should call
//! [`ModelHolder::predict`] from a blocking task.

pub mod artifact;
pub mod classifier;
pub mod holder;
pub mod linear;
pub mod loader;

pub use artifact::{
    install_dir, load_artifact, resolve_artifact_path, ArtifactError, ClassifierSpec,
    ModelArtifact, DEFAULT_ARTIFACT_FILE, FORMAT_VERSION,
};
pub use classifier::{LabelList, LoadedModel, ModelMetadata, TextClassifier};
pub use holder::{HolderStatus, ModelHolder, ModelState};
pub use linear::{LinearModelSpec, LinearTextClassifier, ShapeError};
pub use loader::{ArtifactLoader, FileArtifactLoader};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{LabelList, LoadedModel, TextClassifier};
    pub use crate::holder::ModelHolder;
    pub use crate::loader::ArtifactLoader;
}
