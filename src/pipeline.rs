//! Training and prediction pipelines.
//!
//! Both pipelines publish their active model through a [`ModelHandle`].
//! Readers take a snapshot and score against it; a retrain or reload
//! swaps in a new bundle without disturbing scorers already holding the
//! old one.

pub mod prediction;
pub mod training;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::ml::bundle::ModelBundle;
use crate::storage::model_store::{ModelVersion, StoredModel};

/// A bundle together with the version it was stored under.
#[derive(Debug)]
pub struct ActiveModel {
    pub version: ModelVersion,
    pub bundle: ModelBundle,
}

impl From<StoredModel> for ActiveModel {
    fn from(stored: StoredModel) -> Self {
        ActiveModel {
            version: stored.version,
            bundle: stored.bundle,
        }
    }
}

/// Shared, atomically replaceable reference to the active model.
#[derive(Debug, Clone, Default)]
pub struct ModelHandle {
    inner: Arc<RwLock<Option<Arc<ActiveModel>>>>,
}

impl ModelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current model, if one is active.
    pub fn snapshot(&self) -> Option<Arc<ActiveModel>> {
        self.inner.read().clone()
    }

    /// The current model, or [`LecternError::UntrainedModel`].
    pub fn require(&self) -> Result<Arc<ActiveModel>> {
        self.snapshot().ok_or_else(|| {
            LecternError::untrained("no model is loaded; train or load a model first")
        })
    }

    /// Install a new model, returning the previous one.
    pub fn replace(&self, model: ActiveModel) -> Option<Arc<ActiveModel>> {
        self.inner.write().replace(Arc::new(model))
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.read().is_some()
    }

    pub fn active_version(&self) -> Option<ModelVersion> {
        self.inner.read().as_ref().map(|model| model.version)
    }
}

/// One reported category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPrediction {
    pub category: String,
    pub confidence: f64,
}

/// Keep categories at or above `threshold`, most confident first.
///
/// Ties keep class order.
pub fn rank_predictions(
    classes: &[String],
    confidences: &[f64],
    threshold: f64,
) -> Vec<CategoryPrediction> {
    let mut predictions: Vec<CategoryPrediction> = classes
        .iter()
        .zip(confidences)
        .filter(|(_, confidence)| **confidence >= threshold)
        .map(|(category, confidence)| CategoryPrediction {
            category: category.clone(),
            confidence: *confidence,
        })
        .collect();

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions
}
