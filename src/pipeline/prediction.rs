//! Prediction pipeline for the scoring service.
//!
//! Serves text-with-filename bundles with calibrated probabilities. Unlike
//! training, language codes are strict: only `"en"` and `"vi"` are accepted.

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::config::{ClassifierConfig, validate_threshold};
use crate::document::document::Document;
use crate::document::language::Language;
use crate::error::{LecternError, Result};
use crate::ml::bundle::BundleVariant;
use crate::pipeline::{ActiveModel, CategoryPrediction, ModelHandle, rank_predictions};
use crate::storage::model_store::{LoadOutcome, ModelStore, ModelVersion};

/// A scoring request as received by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
    /// `"en"` or `"vi"`.
    pub language: String,
}

impl PredictionRequest {
    pub fn new<S: Into<String>>(text: S, language: S) -> Self {
        PredictionRequest {
            text: text.into(),
            filename: None,
            language: language.into(),
        }
    }

    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

#[derive(Debug)]
pub struct PredictionPipeline {
    config: ClassifierConfig,
    normalizer: TextNormalizer,
    store: ModelStore,
    handle: ModelHandle,
}

impl PredictionPipeline {
    /// The bundle shape this pipeline serves.
    pub const VARIANT: BundleVariant = BundleVariant::TextWithFilename;

    /// Load the latest serving model. Having no model is fatal here.
    pub fn load(config: ClassifierConfig) -> Result<Self> {
        let pipeline = Self::unloaded(config)?;
        let version = pipeline.reload()?;
        log::info!("Prediction pipeline serving model version {version}");
        Ok(pipeline)
    }

    /// Create a pipeline without loading a model. Predictions fail with
    /// [`LecternError::UntrainedModel`] until [`reload`](Self::reload) succeeds.
    pub fn unloaded(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let store = ModelStore::new(config.store.clone(), Self::VARIANT)?;
        Ok(PredictionPipeline {
            normalizer: TextNormalizer::new()?,
            store,
            handle: ModelHandle::new(),
            config,
        })
    }

    /// Swap in the latest stored model.
    ///
    /// On failure the currently active model, if any, stays in place.
    pub fn reload(&self) -> Result<ModelVersion> {
        match self.store.load_latest()? {
            LoadOutcome::Found(stored) => {
                let version = stored.version;
                if let Some(previous) = self.handle.replace(ActiveModel::from(stored)) {
                    log::info!("Replaced model {} with {version}", previous.version);
                }
                Ok(version)
            }
            LoadOutcome::NotFound => Err(LecternError::not_found(format!(
                "no {} model in {}",
                Self::VARIANT,
                self.store.directory().display()
            ))),
        }
    }

    /// Score a request with the configured threshold.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Vec<CategoryPrediction>> {
        self.predict_with_threshold(request, self.config.threshold)
    }

    pub fn predict_with_threshold(
        &self,
        request: &PredictionRequest,
        threshold: f64,
    ) -> Result<Vec<CategoryPrediction>> {
        validate_threshold(threshold)?;
        let language = Language::from_code(&request.language)?;
        let model = self.handle.require()?;

        let document = Document {
            text: request.text.clone(),
            language,
            filename: request.filename.clone(),
        };
        let scores = model
            .bundle
            .score(&self.normalizer, std::slice::from_ref(&document))?;
        let confidences = scores.first().map(Vec::as_slice).unwrap_or_default();

        Ok(rank_predictions(model.bundle.classes(), confidences, threshold))
    }

    pub fn active_version(&self) -> Option<ModelVersion> {
        self.handle.active_version()
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::TrainingRecord;
    use crate::pipeline::training::TrainingPipeline;
    use tempfile::TempDir;

    fn config(dir: &std::path::Path) -> ClassifierConfig {
        ClassifierConfig::default()
            .with_model_dir(dir)
            .with_variant(BundleVariant::TextWithFilename)
    }

    fn train(dir: &std::path::Path) {
        let records = vec![
            TrainingRecord::new("Sorting algorithms lecture", "lecture", "english")
                .with_filename("lecture1.pdf"),
            TrainingRecord::new("Graph algorithms lecture", "lecture", "english")
                .with_filename("lecture2.pdf"),
            TrainingRecord::new("Weekly team meeting", "meeting", "english")
                .with_filename("sync.docx"),
            TrainingRecord::new("Monthly planning meeting", "meeting", "english")
                .with_filename("planning.docx"),
        ];
        TrainingPipeline::new(config(dir))
            .unwrap()
            .train(&records)
            .unwrap();
    }

    #[test]
    fn test_load_without_model_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            PredictionPipeline::load(config(temp_dir.path())),
            Err(LecternError::NotFound(_))
        ));
    }

    #[test]
    fn test_unsupported_language() {
        let temp_dir = TempDir::new().unwrap();
        train(temp_dir.path());
        let pipeline = PredictionPipeline::load(config(temp_dir.path())).unwrap();

        for code in ["fr", "english", "EN", ""] {
            let request = PredictionRequest::new("lecture", code);
            assert!(matches!(
                pipeline.predict(&request),
                Err(LecternError::UnsupportedLanguage(_))
            ));
        }
    }

    #[test]
    fn test_predict_uses_filename() {
        let temp_dir = TempDir::new().unwrap();
        train(temp_dir.path());
        let pipeline = PredictionPipeline::load(config(temp_dir.path())).unwrap();

        let request = PredictionRequest::new("algorithms lecture", "en").with_filename("notes.pdf");
        let predictions = pipeline.predict_with_threshold(&request, 0.0).unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].category, "lecture");
        assert!(predictions[0].confidence > predictions[1].confidence);
    }

    #[test]
    fn test_unloaded_pipeline() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = PredictionPipeline::unloaded(config(temp_dir.path())).unwrap();
        let request = PredictionRequest::new("lecture", "en");

        assert!(matches!(
            pipeline.predict(&request),
            Err(LecternError::UntrainedModel(_))
        ));
        assert!(matches!(pipeline.reload(), Err(LecternError::NotFound(_))));
    }
}
