//! Inflammation - per-patient inflammation data analysis
//!
//! Loads patient x day tables from CSV files or directories of JSON documents
//! and computes per-day statistics across patients.

pub mod data;
pub mod stats;

pub use data::{InflammationTable, LoaderError, TableError};
