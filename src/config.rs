//! Classifier configuration.
//!
//! Every field has a default, so a JSON config file only needs the values
//! it changes:
//!
//! ```json
//! {
//!   "variant": "text-with-filename",
//!   "threshold": 0.4,
//!   "store": { "directory": "/var/lib/lectern/models" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::ml::bundle::BundleVariant;
use crate::ml::svm::SvmConfig;
use crate::ml::tfidf::VectorizerConfig;
use crate::storage::model_store::StoreConfig;

/// Default minimum confidence for a category to be reported.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default number of tags returned by tag extraction.
pub const DEFAULT_TOP_N_TAGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Bundle shape produced by training.
    pub variant: BundleVariant,
    /// Confidence threshold in `[0, 1]`.
    pub threshold: f64,
    pub top_n_tags: usize,
    pub vectorizer: VectorizerConfig,
    pub filename_vectorizer: VectorizerConfig,
    pub svm: SvmConfig,
    pub store: StoreConfig,
    /// Shared secret for the scoring service.
    pub api_key: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            variant: BundleVariant::TextOnly,
            threshold: DEFAULT_THRESHOLD,
            top_n_tags: DEFAULT_TOP_N_TAGS,
            vectorizer: VectorizerConfig::default(),
            filename_vectorizer: VectorizerConfig::filename_default(),
            svm: SvmConfig::default(),
            store: StoreConfig::default(),
            api_key: None,
        }
    }
}

impl ClassifierConfig {
    /// Load a JSON config file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LecternError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: ClassifierConfig = serde_json::from_str(&content)
            .with_context(|| format!("malformed configuration in {}", path.display()))?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_model_dir<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.store.directory = directory.into();
        self
    }

    pub fn with_variant(mut self, variant: BundleVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        self.vectorizer.validate()?;
        self.filename_vectorizer.validate()?;
        self.svm.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Thresholds must lie in `[0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(LecternError::invalid_config(format!(
            "threshold must be within [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::svm::{ClassWeight, SvmLoss};
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.threshold, 0.3);
        assert_eq!(config.top_n_tags, 5);
        assert_eq!(config.vectorizer.max_features, Some(5000));
        assert_eq!(config.vectorizer.ngram_range, (1, 2));
        assert_eq!(config.svm.c, 1.0);
        assert_eq!(config.svm.loss, SvmLoss::Hinge);
        assert_eq!(config.svm.class_weight, ClassWeight::Balanced);
        assert_eq!(config.svm.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lectern.json");
        fs::write(
            &path,
            r#"{"variant": "text-with-filename", "threshold": 0.5, "store": {"extension": "pkl"}}"#,
        )
        .unwrap();

        let config = ClassifierConfig::from_file(&path).unwrap();
        assert_eq!(config.variant, BundleVariant::TextWithFilename);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.store.extension, "pkl");
        assert_eq!(config.store.prefix, "classifier_model");
        assert_eq!(config.svm, SvmConfig::default());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = ClassifierConfig::default().with_threshold(1.5);
        assert!(matches!(config.validate(), Err(LecternError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lectern.json");
        fs::write(&path, "{ \"threshold\": ").unwrap();

        let err = ClassifierConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, LecternError::Anyhow(_)));
        assert!(err.to_string().contains("malformed configuration"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ClassifierConfig::from_file("/nonexistent/lectern.json"),
            Err(LecternError::InvalidConfig(_))
        ));
    }
}
