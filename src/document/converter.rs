//! Converters that read training records from files.

pub mod csv;
