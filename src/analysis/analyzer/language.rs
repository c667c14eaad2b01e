//! Language-specific analyzers.
//!
//! - [`english`] - Regex word tokenization and the English stop word corpus
//! - [`vietnamese`] - Compound word segmentation and curated Vietnamese stop words

pub mod english;
pub mod vietnamese;
