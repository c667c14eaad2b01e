//! Language-aware text normalization.
//!
//! Turns raw document text into the space-joined token string the
//! vectorizers consume, and renders filenames as short pseudo-documents.

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::language::english::EnglishAnalyzer;
use crate::analysis::analyzer::language::vietnamese::VietnameseAnalyzer;
use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::document::language::Language;
use crate::error::Result;

/// Normalizes text per language. Holds no mutable state and can be shared
/// freely between threads.
#[derive(Debug)]
pub struct TextNormalizer {
    english: EnglishAnalyzer,
    vietnamese: VietnameseAnalyzer,
    punctuation: PatternReplaceCharFilter,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        Ok(TextNormalizer {
            english: EnglishAnalyzer::new()?,
            vietnamese: VietnameseAnalyzer::new()?,
            punctuation: PatternReplaceCharFilter::strip_punctuation()?,
        })
    }

    /// Build a normalizer around a custom Vietnamese analyzer.
    pub fn with_vietnamese(vietnamese: VietnameseAnalyzer) -> Result<Self> {
        Ok(TextNormalizer {
            vietnamese,
            ..Self::new()?
        })
    }

    /// The analyzer used for a language.
    pub fn analyzer(&self, language: Language) -> &dyn Analyzer {
        match language {
            Language::English => &self.english,
            Language::Vietnamese => &self.vietnamese,
        }
    }

    /// Normalize text into lowercase, stop-word-free tokens joined by single
    /// spaces. Vietnamese compounds stay together as one space-joined token.
    pub fn normalize(&self, text: &str, language: Language) -> Result<String> {
        let tokens: Vec<String> = self
            .analyzer(language)
            .analyze(text)?
            .map(|token| token.text)
            .collect();
        Ok(tokens.join(" "))
    }

    /// Render a filename as `"<stem> extension_<ext>"`.
    ///
    /// The name is lowercased and punctuation in the stem becomes whitespace,
    /// as in [`normalize`](Self::normalize). A missing filename, or one without
    /// an extension, yields `extension_none`; a trailing dot (`"notes."`)
    /// yields an empty extension, `extension_`. A leading dot (`.bashrc`)
    /// does not start an extension.
    pub fn normalize_filename(&self, filename: Option<&str>) -> String {
        let Some(filename) = filename.filter(|f| !f.trim().is_empty()) else {
            return "extension_none".to_string();
        };

        let lowered = filename.trim().to_lowercase();
        let (stem, extension) = split_extension(&lowered);
        let stem = self.punctuation.filter(stem);
        let extension = extension.unwrap_or("none");

        let stem = stem.split_whitespace().collect::<Vec<_>>().join(" ");
        if stem.is_empty() {
            format!("extension_{extension}")
        } else {
            format!("{stem} extension_{extension}")
        }
    }
}

/// Split a path into the part before the final extension and the extension
/// itself, without the dot.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    let base_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &name[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();

    match base[leading_dots..].rfind('.') {
        Some(i) => {
            let dot = base_start + leading_dots + i;
            (&name[..dot], Some(&name[dot + 1..]))
        }
        None => (name, None),
    }
}
