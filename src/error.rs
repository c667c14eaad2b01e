//! Error types for the Lectern library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LecternError`] enum. The variants follow the lifecycle of a model:
//! bad training input, a missing or mismatched artifact on disk, a request
//! made before any model is active, and unsupported input at the serving
//! boundary.
//!
//! # Examples
//!
//! ```
//! use lectern::error::{LecternError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LecternError::invalid_training_data("no documents"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::ml::bundle::BundleVariant;

/// The main error type for Lectern operations.
#[derive(Error, Debug)]
pub enum LecternError {
    /// I/O errors (file operations, directory scans, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Empty or malformed input to a `fit` call.
    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    /// No model artifact is available.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored bundle was produced by a different pipeline shape.
    #[error("Bundle variant mismatch: expected {expected}, found {found}")]
    BundleVariantMismatch {
        expected: BundleVariant,
        found: BundleVariant,
    },

    /// Prediction or tag extraction attempted before a model was trained or loaded.
    #[error("Untrained model: {0}")]
    UntrainedModel(String),

    /// Language code outside the supported set.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Feature vectors whose width differs from the fitted feature space.
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    FeatureDimensionMismatch { expected: usize, actual: usize },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Storage-related errors (corrupt artifacts, bad file names, etc.)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Credential check failed at the service boundary.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LecternError.
pub type Result<T> = std::result::Result<T, LecternError>;

impl LecternError {
    /// Create a new invalid training data error.
    pub fn invalid_training_data<S: Into<String>>(msg: S) -> Self {
        LecternError::InvalidTrainingData(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        LecternError::NotFound(msg.into())
    }

    /// Create a new untrained model error.
    pub fn untrained<S: Into<String>>(msg: S) -> Self {
        LecternError::UntrainedModel(msg.into())
    }

    /// Create a new unsupported language error.
    pub fn unsupported_language<S: Into<String>>(code: S) -> Self {
        LecternError::UnsupportedLanguage(code.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        LecternError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LecternError::Storage(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        LecternError::SerializationError(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LecternError::InvalidConfig(msg.into())
    }

    /// Create a new unauthorized error.
    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        LecternError::Unauthorized(msg.into())
    }

    /// Whether this error is a client-side input problem rather than a
    /// server fault. The service boundary maps these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LecternError::UnsupportedLanguage(_) | LecternError::Unauthorized(_)
        )
    }
}
