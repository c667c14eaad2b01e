//! Analyzers that combine char filters, a tokenizer and token filters.
//!
//! - [`analyzer::Analyzer`] - The core trait
//! - [`pipeline::PipelineAnalyzer`] - Custom char filter + tokenizer + filter chains
//! - [`language::english::EnglishAnalyzer`] - English-optimized
//! - [`language::vietnamese::VietnameseAnalyzer`] - Vietnamese-optimized

pub mod analyzer;
pub mod language;
pub mod pipeline;
