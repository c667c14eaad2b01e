//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream
//!             ↓
//!         Char filters
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can serve concurrent
/// prediction requests.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use lectern::analysis::analyzer::analyzer::Analyzer;
    /// use lectern::analysis::analyzer::language::english::EnglishAnalyzer;
    ///
    /// let analyzer = EnglishAnalyzer::new().unwrap();
    /// let tokens: Vec<_> = analyzer.analyze("The quick brown fox").unwrap().collect();
    ///
    /// assert_eq!(tokens.len(), 3);
    /// assert_eq!(tokens[0].text, "quick");
    /// ```
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
