//! Extension point for artifact loading.

use crate::artifact::load_artifact;
use crate::classifier::LoadedModel;
use newsclass_core::Result;
use std::path::Path;

/// Pluggable backend that turns an artifact path into a loaded model.
///
/// The model holder only talks to this trait, so alternative artifact
/// formats or test doubles can be swapped in without touching the holder.
pub trait ArtifactLoader: Send + Sync {
    /// Load the (classifier, labels) pair stored at `path`.
    ///
    /// Implementations report every failure as
    /// [`newsclass_core::Error::ArtifactLoad`].
    fn load(&self, path: &Path) -> Result<LoadedModel>;
}

/// Loader for the JSON/YAML artifact format of this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FileArtifactLoader;

impl ArtifactLoader for FileArtifactLoader {
    fn load(&self, path: &Path) -> Result<LoadedModel> {
        load_artifact(path)
    }
}

impl<F> ArtifactLoader for F
where
    F: Fn(&Path) -> Result<LoadedModel> + Send + Sync,
{
    fn load(&self, path: &Path) -> Result<LoadedModel> {
        self(path)
    }
}
