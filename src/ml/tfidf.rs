//! TF-IDF vectorizer for text feature extraction.
//!
//! Operates on whitespace-delimited, already-normalized text. Terms are
//! word n-grams of tokens matching the configured token pattern. The fitted
//! vocabulary is closed: unseen terms at transform time carry zero weight.

use std::collections::HashSet;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::{LecternError, Result};

/// Configuration for a [`TfIdfVectorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Keep at most this many terms, ranked by corpus term frequency.
    pub max_features: Option<usize>,
    /// Smallest and largest n-gram size, inclusive.
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Regex selecting tokens. The default keeps runs of two or more word characters.
    pub token_pattern: String,
    /// Lowercase tokens before counting.
    pub lowercase: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: Some(5000),
            ngram_range: (1, 2),
            min_df: 1,
            token_pattern: r"\w\w+".to_string(),
            lowercase: true,
        }
    }
}

impl VectorizerConfig {
    /// Configuration used for filename pseudo-documents: unigrams only, smaller vocabulary.
    pub fn filename_default() -> Self {
        Self {
            max_features: Some(1000),
            ngram_range: (1, 1),
            ..Self::default()
        }
    }

    /// Check the configuration for values that cannot produce a vocabulary.
    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(LecternError::invalid_config(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        if self.max_features == Some(0) {
            return Err(LecternError::invalid_config("max_features must be positive"));
        }
        if self.min_df == 0 {
            return Err(LecternError::invalid_config("min_df must be at least 1"));
        }
        RegexTokenizer::with_pattern(&self.token_pattern)
            .map_err(|e| LecternError::invalid_config(e.to_string()))?;
        Ok(())
    }

    fn build_analyzer(&self) -> Result<PipelineAnalyzer> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&self.token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer).with_name("tfidf");
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        Ok(analyzer)
    }
}

/// TF-IDF vectorizer with a closed, lexicographically ordered vocabulary.
///
/// Weights are `count * idf` with `idf = ln((1 + n) / (1 + df)) + 1`, and
/// each output row is L2-normalized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerState", into = "VectorizerState")]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Vocabulary: term -> index mapping.
    vocabulary: AHashMap<String, usize>,
    /// Index -> term, sorted.
    terms: Vec<String>,
    /// Inverse document frequency for each term.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    analyzer: PipelineAnalyzer,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.terms.len())
            .field("n_documents", &self.n_documents)
            .field("ngram_range", &self.config.ngram_range)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = config.build_analyzer()?;
        Ok(Self {
            config,
            vocabulary: AHashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
        })
    }

    /// Fit the vocabulary and idf weights on training documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(LecternError::invalid_training_data(
                "cannot fit a vectorizer on zero documents",
            ));
        }

        let mut term_frequency: AHashMap<String, usize> = AHashMap::new();
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();

        for doc in documents {
            let terms = self.terms_of(doc)?;
            let mut seen = HashSet::with_capacity(terms.len());
            for term in terms {
                *term_frequency.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *document_frequency.entry(term).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(String, usize)> = term_frequency
            .into_iter()
            .filter(|(term, _)| document_frequency[term] >= self.config.min_df)
            .collect();

        if let Some(limit) = self.config.max_features
            && candidates.len() > limit
        {
            candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            candidates.truncate(limit);
        }

        let mut terms: Vec<String> = candidates.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        if terms.is_empty() {
            return Err(LecternError::invalid_training_data(
                "empty vocabulary; documents contain no usable terms",
            ));
        }

        let n = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency[term] as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        self.vocabulary = index_terms(&terms);
        self.terms = terms;
        self.idf = idf;
        self.n_documents = documents.len();

        log::debug!(
            "Fitted TF-IDF vocabulary of {} terms on {} documents",
            self.terms.len(),
            self.n_documents
        );

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(LecternError::untrained("vectorizer has not been fitted"));
        }

        let mut weights = vec![0.0; self.terms.len()];
        for term in self.terms_of(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                weights[idx] += 1.0;
            }
        }

        for (weight, idf) in weights.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in &mut weights {
                *weight /= norm;
            }
        }

        Ok(weights)
    }

    /// Transform many documents.
    pub fn transform_many(&self, documents: &[String]) -> Result<Vec<Vec<f64>>> {
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// The `top_n` highest-weighted terms of a document.
    ///
    /// Terms with zero weight are never returned; ties keep vocabulary order.
    pub fn top_terms(&self, document: &str, top_n: usize) -> Result<Vec<(String, f64)>> {
        let weights = self.transform(document)?;
        let mut scored: Vec<(usize, f64)> = weights
            .into_iter()
            .enumerate()
            .filter(|(_, weight)| *weight > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(top_n)
            .map(|(idx, weight)| (self.terms[idx].clone(), weight))
            .collect())
    }

    /// Term n-grams of a document, in order of appearance.
    fn terms_of(&self, document: &str) -> Result<Vec<String>> {
        let tokens: Vec<String> = self.analyzer.analyze(document)?.map(|t| t.text).collect();
        let (min_n, max_n) = self.config.ngram_range;
        let mut terms = Vec::new();

        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }

        Ok(terms)
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in feature order.
    pub fn feature_names(&self) -> &[String] {
        &self.terms
    }

    /// Feature index of a term, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// The configuration this vectorizer was built with.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}

fn index_terms(terms: &[String]) -> AHashMap<String, usize> {
    terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.clone(), idx))
        .collect()
}

/// Serializable version of the vectorizer. The analyzer and the reverse
/// index are rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorizerState {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl From<TfIdfVectorizer> for VectorizerState {
    fn from(vectorizer: TfIdfVectorizer) -> Self {
        VectorizerState {
            config: vectorizer.config,
            terms: vectorizer.terms,
            idf: vectorizer.idf,
            n_documents: vectorizer.n_documents,
        }
    }
}

impl TryFrom<VectorizerState> for TfIdfVectorizer {
    type Error = LecternError;

    fn try_from(state: VectorizerState) -> Result<Self> {
        if state.terms.len() != state.idf.len() {
            return Err(LecternError::serialization(format!(
                "vectorizer has {} terms but {} idf weights",
                state.terms.len(),
                state.idf.len()
            )));
        }
        let analyzer = state.config.build_analyzer()?;
        Ok(TfIdfVectorizer {
            vocabulary: index_terms(&state.terms),
            config: state.config,
            terms: state.terms,
            idf: state.idf,
            n_documents: state.n_documents,
            analyzer,
        })
    }
}
