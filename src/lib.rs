//! # Lectern
//!
//! Multi-label document classification for English and Vietnamese text.
//!
//! ## Features
//!
//! - Language-aware normalization with Vietnamese compound segmentation
//! - TF-IDF features over word unigrams and bigrams, plus optional filename features
//! - One-vs-rest linear SVM with margin or calibrated probability confidences
//! - Timestamp-versioned model store with hot replacement of the active model
//!
//! ## Example
//!
//! ```no_run
//! use lectern::config::ClassifierConfig;
//! use lectern::document::document::TrainingRecord;
//! use lectern::document::language::Language;
//! use lectern::pipeline::training::TrainingPipeline;
//!
//! # fn main() -> lectern::error::Result<()> {
//! let pipeline = TrainingPipeline::open(ClassifierConfig::default().with_model_dir("models"))?;
//! pipeline.train(&[
//!     TrainingRecord::new("Sorting algorithms lecture", "lecture,algorithms", "english"),
//!     TrainingRecord::new("Weekly team meeting", "meeting", "english"),
//! ])?;
//!
//! for prediction in pipeline.predict_categories("graph algorithms", Language::English, None)? {
//!     println!("{} {:.3}", prediction.category, prediction.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod ml;
pub mod pipeline;
pub mod service;
pub mod storage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
