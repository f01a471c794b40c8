//! Server configuration

use newsclass_classifiers::{install_dir, resolve_artifact_path};
use newsclass_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::ServeArgs;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model artifact; relative paths are resolved against the executable's
    /// directory
    #[serde(default)]
    pub artifact_path: Option<PathBuf>,

    /// Refuse to start when the model cannot be loaded
    #[serde(default)]
    pub require_model: bool,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from a YAML file, or use defaults if it is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config file {}: {}", path.display(), e)))
    }

    /// Apply CLI overrides
    pub fn with_overrides(mut self, args: &ServeArgs) -> Self {
        self = self.with_artifact_override(args.artifact.as_deref());

        if let Some(listen) = &args.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = args.port {
            self.port = port;
        }

        if args.require_model {
            self.require_model = true;
        }

        self
    }

    /// Replace the configured artifact when one is given on the command line
    pub fn with_artifact_override(mut self, artifact: Option<&Path>) -> Self {
        if let Some(artifact) = artifact {
            self.artifact_path = Some(artifact.to_path_buf());
        }
        self
    }

    /// Absolute location of the model artifact
    pub fn resolved_artifact_path(&self) -> PathBuf {
        resolve_artifact_path(self.artifact_path.as_deref(), &install_dir())
    }

    /// `listen:port` socket address string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            artifact_path: None,
            require_model: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}
