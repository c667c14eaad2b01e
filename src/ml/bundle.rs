//! Trained model bundles.
//!
//! A bundle is everything needed to score a document: the fitted feature
//! extractor, the label codec and the classifier. It is immutable once
//! built and is replaced whole, never patched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::document::document::Document;
use crate::error::{LecternError, Result};
use crate::ml::classifier::{ConfidenceMode, OneVsRestClassifier};
use crate::ml::features::{FeatureExtractor, FeatureMatrix};
use crate::ml::labels::LabelCodec;

/// The shape of a bundle. Artifacts of different variants are never
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleVariant {
    /// Text features only, margin confidences.
    TextOnly,
    /// Text plus filename features, calibrated probabilities.
    TextWithFilename,
}

impl BundleVariant {
    pub fn confidence_mode(self) -> ConfidenceMode {
        match self {
            BundleVariant::TextOnly => ConfidenceMode::Margin,
            BundleVariant::TextWithFilename => ConfidenceMode::Probability,
        }
    }

    pub fn uses_filename(self) -> bool {
        matches!(self, BundleVariant::TextWithFilename)
    }

    /// Stable one-byte tag written into artifact headers.
    pub fn tag(self) -> u8 {
        match self {
            BundleVariant::TextOnly => 1,
            BundleVariant::TextWithFilename => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(BundleVariant::TextOnly),
            2 => Some(BundleVariant::TextWithFilename),
            _ => None,
        }
    }
}

impl std::fmt::Display for BundleVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleVariant::TextOnly => write!(f, "text-only"),
            BundleVariant::TextWithFilename => write!(f, "text-with-filename"),
        }
    }
}

impl std::str::FromStr for BundleVariant {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text-only" | "text" => Ok(BundleVariant::TextOnly),
            "text-with-filename" | "filename" => Ok(BundleVariant::TextWithFilename),
            other => Err(LecternError::invalid_config(format!(
                "unknown bundle variant '{other}'"
            ))),
        }
    }
}

/// Descriptive facts about a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_documents: usize,
    pub text_features: usize,
    pub filename_features: usize,
    pub categories: usize,
    pub crate_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    variant: BundleVariant,
    extractor: FeatureExtractor,
    codec: LabelCodec,
    classifier: OneVsRestClassifier,
    metadata: ModelMetadata,
}

impl ModelBundle {
    /// Assemble a bundle, checking that its parts agree with each other and
    /// with the variant.
    pub fn new(
        variant: BundleVariant,
        extractor: FeatureExtractor,
        codec: LabelCodec,
        classifier: OneVsRestClassifier,
        training_documents: usize,
    ) -> Result<Self> {
        let metadata = ModelMetadata {
            trained_at: Utc::now(),
            training_documents,
            text_features: extractor.text_features(),
            filename_features: extractor.filename_features(),
            categories: codec.len(),
            crate_version: crate::VERSION.to_string(),
        };
        let bundle = ModelBundle {
            variant,
            extractor,
            codec,
            classifier,
            metadata,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check internal consistency. Run after construction and after loading.
    pub fn validate(&self) -> Result<()> {
        if self.extractor.uses_filename() != self.variant.uses_filename() {
            return Err(LecternError::storage(format!(
                "{} bundle has a mismatched feature extractor",
                self.variant
            )));
        }
        if self.classifier.mode() != self.variant.confidence_mode() {
            return Err(LecternError::storage(format!(
                "{} bundle uses {} confidences",
                self.variant,
                self.classifier.mode()
            )));
        }
        if self.classifier.n_features() != self.extractor.n_features() {
            return Err(LecternError::FeatureDimensionMismatch {
                expected: self.classifier.n_features(),
                actual: self.extractor.n_features(),
            });
        }
        if self.classifier.n_classes() != self.codec.len() {
            return Err(LecternError::storage(format!(
                "classifier has {} categories but the label codec has {}",
                self.classifier.n_classes(),
                self.codec.len()
            )));
        }
        Ok(())
    }

    /// Fail with [`LecternError::BundleVariantMismatch`] unless this bundle
    /// has the expected variant.
    pub fn expect_variant(&self, expected: BundleVariant) -> Result<()> {
        if self.variant != expected {
            return Err(LecternError::BundleVariantMismatch {
                expected,
                found: self.variant,
            });
        }
        Ok(())
    }

    pub fn features(
        &self,
        normalizer: &TextNormalizer,
        documents: &[Document],
    ) -> Result<FeatureMatrix> {
        self.extractor.transform(normalizer, documents)
    }

    /// Per-category confidences for each document, in class order.
    pub fn score(
        &self,
        normalizer: &TextNormalizer,
        documents: &[Document],
    ) -> Result<Vec<Vec<f64>>> {
        let features = self.features(normalizer, documents)?;
        self.classifier.score(&features)
    }

    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    pub fn classes(&self) -> &[String] {
        self.codec.classes()
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn codec(&self) -> &LabelCodec {
        &self.codec
    }

    pub fn classifier(&self) -> &OneVsRestClassifier {
        &self.classifier
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::document::language::Language;
    use crate::ml::svm::SvmConfig;
    use crate::ml::tfidf::VectorizerConfig;

    /// A small trained bundle of the given variant.
    pub(crate) fn sample_bundle(variant: BundleVariant) -> ModelBundle {
        build(variant, variant.uses_filename(), variant.confidence_mode()).unwrap()
    }

    pub(crate) fn build(
        variant: BundleVariant,
        filename: bool,
        mode: ConfidenceMode,
    ) -> Result<ModelBundle> {
        let normalizer = TextNormalizer::new().unwrap();
        let docs = vec![
            Document::new("sorting algorithms lecture", Language::English).with_filename("a.pdf"),
            Document::new("team meeting", Language::English).with_filename("b.docx"),
        ];
        let filename_config = VectorizerConfig::filename_default();
        let (extractor, x) = FeatureExtractor::fit_transform(
            &normalizer,
            &VectorizerConfig::default(),
            filename.then_some(&filename_config),
            &docs,
        )?;
        let (codec, y) = LabelCodec::fit_encode(&[vec!["lecture"], vec!["meeting"]])?;
        let classifier = OneVsRestClassifier::fit(&x, &y, &SvmConfig::default(), mode)?;
        ModelBundle::new(variant, extractor, codec, classifier, docs.len())
    }
}
