//! Documents, languages and training records.
//!
//! - [`document::Document`] - A transient text + language + optional filename
//! - [`language::Language`] - Supported languages and their two code schemes
//! - [`document::TrainingRecord`] - One labeled row of training input
//! - [`converter`] - Readers that turn files into training records

pub mod converter;
pub mod document;
pub mod language;
