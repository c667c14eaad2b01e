//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first token-producing step of the analysis pipeline.
//!
//! # Available Tokenizers
//!
//! - [`regex::RegexTokenizer`] - General-purpose word tokenizer (`\w+` by default)
//! - [`vietnamese::VietnameseTokenizer`] - Syllable splitting plus compound word segmentation
//!
//! # Examples
//!
//! ```
//! use lectern::analysis::tokenizer::Tokenizer;
//! use lectern::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so that analyzers can be shared by
/// concurrent prediction requests.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod vietnamese;
