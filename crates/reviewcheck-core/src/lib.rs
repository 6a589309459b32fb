//! reviewcheck Core
//!
//! Core types and utilities shared across reviewcheck components.
//!
//! This crate provides:
//! - Labels and model identifiers understood by the prediction service
//! - Request and result values exchanged between the server and classifiers
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    format_percent, ClassProbabilities, Label, ModelKey, PredictionRequest, PredictionResult,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassProbabilities, Label, ModelKey};
}
