//! Document and training record types.

use serde::{Deserialize, Serialize};

use crate::document::language::Language;
use crate::ml::labels::parse_categories;

/// A document to classify. Exists only for the duration of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub language: Language,
    pub filename: Option<String>,
}

impl Document {
    /// Create a document without a filename.
    pub fn new<S: Into<String>>(text: S, language: Language) -> Self {
        Document {
            text: text.into(),
            language,
            filename: None,
        }
    }

    /// Attach a filename.
    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// One row of labeled training input.
///
/// `categories` is the raw, inconsistently delimited field as found in the
/// source data; `language` is a training label such as `"english"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub text: String,
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl TrainingRecord {
    /// Create a record from its raw fields.
    pub fn new<S: Into<String>>(text: S, categories: S, language: S) -> Self {
        TrainingRecord {
            text: text.into(),
            categories: categories.into(),
            language: language.into(),
            filename: None,
        }
    }

    /// Attach a filename.
    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Split into the document and its parsed category set.
    pub fn to_labeled(&self) -> (Document, Vec<String>) {
        let document = Document {
            text: self.text.clone(),
            language: Language::from_training_label(&self.language),
            filename: self.filename.clone(),
        };
        (document, parse_categories(&self.categories))
    }
}
