//! newsclass Core
//!
//! Types shared across the newsclass components.
//!
//! This crate provides:
//! - The error taxonomy of the inference core and its `Result` alias
//! - The transport-agnostic prediction request/response contract

pub mod error;
pub mod types;

pub use error::{BoxError, Error, ErrorKind, LabelIndexOutOfRange, Result};
pub use types::{PredictionInput, PredictionOutput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::types::{PredictionInput, PredictionOutput};
}
