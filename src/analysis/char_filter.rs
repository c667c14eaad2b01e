//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw string before it reaches the tokenizer.
//! The classifier uses one to blank out punctuation so that token
//! boundaries survive while symbols disappear.

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod pattern_replace;
