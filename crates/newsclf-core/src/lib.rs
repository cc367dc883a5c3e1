//! newsclf Core
//!
//! Types and error handling shared across the newsclf components.
//!
//! This crate provides:
//! - The prediction request/response data model
//! - The probability mapping returned by classifiers
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{PredictRequest, PredictResponse, Scores};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{PredictRequest, PredictResponse, Scores};
}
