//! Model persistence.
//!
//! [`artifact`] frames a bundle as bytes; [`model_store`] names, versions
//! and locates those bytes on disk.

pub mod artifact;
pub mod model_store;
