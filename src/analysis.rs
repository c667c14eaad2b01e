//! Text analysis.
//!
//! Raw text flows through char filters, a tokenizer and token filters
//! assembled into language analyzers. [`normalizer::TextNormalizer`] picks
//! the analyzer for a document's language.

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
