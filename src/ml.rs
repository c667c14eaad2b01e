//! Machine learning: feature extraction, label handling and classifiers.

pub mod bundle;
pub mod calibration;
pub mod classifier;
pub mod features;
pub mod labels;
pub mod svm;
pub mod tfidf;
