//! Document feature extraction.
//!
//! A [`FeatureExtractor`] owns the text vectorizer and, for filename-aware
//! models, a second vectorizer over filename pseudo-documents. Its output
//! is the text block followed by the filename block.

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::document::document::Document;
use crate::error::{LecternError, Result};
use crate::ml::tfidf::{TfIdfVectorizer, VectorizerConfig};

/// Dense row-major feature matrix with a fixed column count.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Create an empty matrix with the given width.
    pub fn new(n_features: usize) -> Self {
        FeatureMatrix {
            n_features,
            rows: Vec::new(),
        }
    }

    /// Build a matrix from rows, checking every row has `n_features` columns.
    pub fn from_rows(rows: Vec<Vec<f64>>, n_features: usize) -> Result<Self> {
        let mut matrix = Self::new(n_features);
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<()> {
        if row.len() != self.n_features {
            return Err(LecternError::FeatureDimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fitted feature extraction for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureExtractor {
    text: TfIdfVectorizer,
    filename: Option<TfIdfVectorizer>,
}

impl FeatureExtractor {
    /// Fit the vectorizers on training documents and return the extractor
    /// together with the training feature matrix.
    ///
    /// When `filename_config` is given the extractor is filename-aware;
    /// documents without a filename contribute `extension_none`.
    pub fn fit_transform(
        normalizer: &TextNormalizer,
        text_config: &VectorizerConfig,
        filename_config: Option<&VectorizerConfig>,
        documents: &[Document],
    ) -> Result<(Self, FeatureMatrix)> {
        let texts = normalize_texts(normalizer, documents)?;
        let mut text = TfIdfVectorizer::new(text_config.clone())?;
        text.fit(&texts)?;

        let filename = match filename_config {
            Some(config) => {
                let names = filename_documents(normalizer, documents);
                let mut vectorizer = TfIdfVectorizer::new(config.clone())?;
                vectorizer.fit(&names)?;
                Some(vectorizer)
            }
            None => None,
        };

        let extractor = FeatureExtractor { text, filename };
        let matrix = extractor.vectorize(normalizer, &texts, documents)?;
        Ok((extractor, matrix))
    }

    /// Transform documents with the fitted vocabularies.
    pub fn transform(
        &self,
        normalizer: &TextNormalizer,
        documents: &[Document],
    ) -> Result<FeatureMatrix> {
        let texts = normalize_texts(normalizer, documents)?;
        self.vectorize(normalizer, &texts, documents)
    }

    fn vectorize(
        &self,
        normalizer: &TextNormalizer,
        texts: &[String],
        documents: &[Document],
    ) -> Result<FeatureMatrix> {
        let mut matrix = FeatureMatrix::new(self.n_features());

        for (text, document) in texts.iter().zip(documents) {
            let mut row = self.text.transform(text)?;
            if let Some(filename) = &self.filename {
                let name = normalizer.normalize_filename(document.filename.as_deref());
                row.extend(filename.transform(&name)?);
            }
            matrix.push_row(row)?;
        }

        Ok(matrix)
    }

    /// Total feature width: text features plus filename features.
    pub fn n_features(&self) -> usize {
        self.text_features() + self.filename_features()
    }

    pub fn text_features(&self) -> usize {
        self.text.vocabulary_size()
    }

    pub fn filename_features(&self) -> usize {
        self.filename.as_ref().map_or(0, TfIdfVectorizer::vocabulary_size)
    }

    pub fn uses_filename(&self) -> bool {
        self.filename.is_some()
    }

    pub fn text_vectorizer(&self) -> &TfIdfVectorizer {
        &self.text
    }

    pub fn filename_vectorizer(&self) -> Option<&TfIdfVectorizer> {
        self.filename.as_ref()
    }
}

fn normalize_texts(normalizer: &TextNormalizer, documents: &[Document]) -> Result<Vec<String>> {
    documents
        .iter()
        .map(|doc| normalizer.normalize(&doc.text, doc.language))
        .collect()
}

fn filename_documents(normalizer: &TextNormalizer, documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|doc| normalizer.normalize_filename(doc.filename.as_deref()))
        .collect()
}
