//! Training pipeline.
//!
//! Fits a bundle from labeled records, persists it and makes it the active
//! model. Language labels are accepted permissively here: anything other
//! than English or Vietnamese trains as English.

use std::path::Path;

use crate::analysis::normalizer::TextNormalizer;
use crate::config::{ClassifierConfig, validate_threshold};
use crate::document::converter::csv::CsvRecordReader;
use crate::document::document::{Document, TrainingRecord};
use crate::document::language::Language;
use crate::error::{LecternError, Result};
use crate::ml::bundle::ModelBundle;
use crate::ml::classifier::OneVsRestClassifier;
use crate::ml::features::FeatureExtractor;
use crate::ml::labels::LabelCodec;
use crate::pipeline::{ActiveModel, CategoryPrediction, ModelHandle, rank_predictions};
use crate::storage::model_store::{LoadOutcome, ModelStore, ModelVersion};

#[derive(Debug)]
pub struct TrainingPipeline {
    config: ClassifierConfig,
    normalizer: TextNormalizer,
    store: ModelStore,
    handle: ModelHandle,
}

impl TrainingPipeline {
    /// Create a pipeline with no active model.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let store = ModelStore::new(config.store.clone(), config.variant)?;
        Ok(TrainingPipeline {
            normalizer: TextNormalizer::new()?,
            store,
            handle: ModelHandle::new(),
            config,
        })
    }

    /// Create a pipeline and activate the latest stored model, if any.
    ///
    /// Finding no model is not an error; the pipeline simply starts untrained.
    pub fn open(config: ClassifierConfig) -> Result<Self> {
        let pipeline = Self::new(config)?;
        pipeline.load_latest()?;
        Ok(pipeline)
    }

    /// Activate the latest stored model. Returns whether one was found.
    pub fn load_latest(&self) -> Result<bool> {
        match self.store.load_latest()? {
            LoadOutcome::Found(stored) => {
                log::info!("Activated model version {}", stored.version);
                self.handle.replace(ActiveModel::from(stored));
                Ok(true)
            }
            LoadOutcome::NotFound => Ok(false),
        }
    }

    /// Fit a bundle without persisting or activating it.
    pub fn fit(&self, records: &[TrainingRecord]) -> Result<ModelBundle> {
        if records.is_empty() {
            return Err(LecternError::invalid_training_data("Empty training data"));
        }

        let (documents, label_sets): (Vec<Document>, Vec<Vec<String>>) =
            records.iter().map(TrainingRecord::to_labeled).unzip();

        let unlabeled = label_sets.iter().filter(|labels| labels.is_empty()).count();
        if unlabeled > 0 {
            log::warn!("{unlabeled} training records have no categories");
        }

        let (codec, labels) = LabelCodec::fit_encode(&label_sets)?;

        let variant = self.config.variant;
        let filename_config = variant
            .uses_filename()
            .then_some(&self.config.filename_vectorizer);
        let (extractor, features) = FeatureExtractor::fit_transform(
            &self.normalizer,
            &self.config.vectorizer,
            filename_config,
            &documents,
        )?;

        let classifier = OneVsRestClassifier::fit(
            &features,
            &labels,
            &self.config.svm,
            variant.confidence_mode(),
        )?;

        log::info!(
            "Trained {variant} model: {} documents, {} categories, {} features",
            documents.len(),
            codec.len(),
            extractor.n_features()
        );

        ModelBundle::new(variant, extractor, codec, classifier, documents.len())
    }

    /// Fit, persist and activate a new model.
    pub fn train(&self, records: &[TrainingRecord]) -> Result<ModelVersion> {
        let bundle = self.fit(records)?;
        let version = self.store.save(&bundle)?;
        self.handle.replace(ActiveModel { version, bundle });
        Ok(version)
    }

    /// Train from a CSV file with `text,categories,language[,filename]` columns.
    pub fn train_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<ModelVersion> {
        let records = CsvRecordReader::new().read_path(path)?;
        self.train(&records)
    }

    /// Categories of a text, most confident first.
    ///
    /// `threshold` defaults to the configured one.
    pub fn predict_categories(
        &self,
        text: &str,
        language: Language,
        threshold: Option<f64>,
    ) -> Result<Vec<CategoryPrediction>> {
        self.predict_document(&Document::new(text, language), threshold)
    }

    /// Categories of a document, using its filename for filename-aware models.
    pub fn predict_document(
        &self,
        document: &Document,
        threshold: Option<f64>,
    ) -> Result<Vec<CategoryPrediction>> {
        let threshold = threshold.unwrap_or(self.config.threshold);
        validate_threshold(threshold)?;

        let model = self.handle.require()?;
        let scores = model
            .bundle
            .score(&self.normalizer, std::slice::from_ref(document))?;
        let confidences = scores.first().map(Vec::as_slice).unwrap_or_default();

        Ok(rank_predictions(model.bundle.classes(), confidences, threshold))
    }

    /// The highest-weighted vocabulary terms of a text.
    ///
    /// `top_n` defaults to the configured count.
    pub fn extract_tags(
        &self,
        text: &str,
        language: Language,
        top_n: Option<usize>,
    ) -> Result<Vec<String>> {
        let model = self.handle.require()?;
        let normalized = self.normalizer.normalize(text, language)?;
        let top_n = top_n.unwrap_or(self.config.top_n_tags);

        Ok(model
            .bundle
            .extractor()
            .text_vectorizer()
            .top_terms(&normalized, top_n)?
            .into_iter()
            .map(|(term, _)| term)
            .collect())
    }

    pub fn is_trained(&self) -> bool {
        self.handle.is_loaded()
    }

    pub fn active_version(&self) -> Option<ModelVersion> {
        self.handle.active_version()
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::bundle::BundleVariant;
    use tempfile::TempDir;

    fn pipeline(dir: &Path) -> TrainingPipeline {
        TrainingPipeline::new(ClassifierConfig::default().with_model_dir(dir)).unwrap()
    }

    fn records() -> Vec<TrainingRecord> {
        vec![
            TrainingRecord::new(
                "This lecture covers sorting algorithms.",
                "lecture,algorithms",
                "english",
            ),
            TrainingRecord::new("Weekly team meeting notes.", "meeting", "english"),
        ]
    }

    #[test]
    fn test_untrained_pipeline() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(temp_dir.path());

        assert!(!pipeline.is_trained());
        assert!(matches!(
            pipeline.predict_categories("anything", Language::English, None),
            Err(LecternError::UntrainedModel(_))
        ));
        assert!(matches!(
            pipeline.extract_tags("anything", Language::English, None),
            Err(LecternError::UntrainedModel(_))
        ));
    }

    #[test]
    fn test_empty_training_data() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(temp_dir.path());

        assert!(matches!(
            pipeline.train(&[]),
            Err(LecternError::InvalidTrainingData(_))
        ));
        assert!(!pipeline.is_trained());
        assert!(pipeline.store().list_versions().unwrap().is_empty());
    }

    #[test]
    fn test_train_persists_and_activates() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(temp_dir.path());

        let version = pipeline.train(&records()).unwrap();

        assert!(pipeline.is_trained());
        assert_eq!(pipeline.active_version(), Some(version));
        assert_eq!(pipeline.store().list_versions().unwrap(), vec![version]);
    }

    #[test]
    fn test_extract_tags() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(temp_dir.path());
        pipeline.train(&records()).unwrap();

        let tags = pipeline
            .extract_tags("Sorting algorithms for the weekly meeting", Language::English, None)
            .unwrap();

        assert!(!tags.is_empty() && tags.len() <= 5);
        assert!(tags.contains(&"sorting".to_string()));
        assert!(!tags.contains(&"the".to_string()));

        let none = pipeline
            .extract_tags("completely unrelated words", Language::English, None)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_filename_variant_training() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClassifierConfig::default()
            .with_model_dir(temp_dir.path())
            .with_variant(BundleVariant::TextWithFilename);
        let pipeline = TrainingPipeline::new(config).unwrap();

        let records = vec![
            TrainingRecord::new("Sorting algorithms", "lecture", "english")
                .with_filename("week1.pdf"),
            TrainingRecord::new("Team sync", "meeting", "english"),
        ];
        pipeline.train(&records).unwrap();

        let model = pipeline.handle().require().unwrap();
        assert_eq!(model.bundle.variant(), BundleVariant::TextWithFilename);
        assert!(model.bundle.extractor().uses_filename());
    }

    #[test]
    fn test_invalid_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(temp_dir.path());
        pipeline.train(&records()).unwrap();

        assert!(matches!(
            pipeline.predict_categories("lecture", Language::English, Some(-0.1)),
            Err(LecternError::InvalidConfig(_))
        ));
    }
}
