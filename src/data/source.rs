//! Data Source Module
//! Configurable origins of inflammation tables: a directory of JSON documents or a single CSV file.

use super::loader::{self, LoaderError, DEFAULT_PATTERN};
use super::table::InflammationTable;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Something inflammation tables can be loaded from.
pub trait DataSource: Send + Sync {
    fn load_inflammation_data(&self) -> Result<Vec<InflammationTable>, LoaderError>;
}

/// Directory of JSON documents, one table per matching file.
#[derive(Debug, Clone)]
pub struct JsonDataSource {
    dir: PathBuf,
    pattern: String,
}

impl JsonDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }

    /// Match files with a different glob pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl DataSource for JsonDataSource {
    fn load_inflammation_data(&self) -> Result<Vec<InflammationTable>, LoaderError> {
        loader::load_tables_matching(&self.dir, &self.pattern)
    }
}

/// A single CSV file holding one table.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for CsvDataSource {
    fn load_inflammation_data(&self) -> Result<Vec<InflammationTable>, LoaderError> {
        Ok(vec![loader::load_csv(&self.path)?])
    }
}

/// Source format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Directory of `observations` JSON documents
    Json,
    /// Single headerless CSV file
    Csv,
}

impl Default for SourceKind {
    fn default() -> Self {
        SourceKind::Json
    }
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

/// Deserializable description of where to load tables from.
///
/// `path` is a directory for [`SourceKind::Json`] and a file for
/// [`SourceKind::Csv`]; `pattern` only applies to JSON directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    pub path: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl SourceConfig {
    pub fn json_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Json,
            path: dir.into(),
            pattern: default_pattern(),
        }
    }

    pub fn csv_file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Csv,
            path: path.into(),
            pattern: default_pattern(),
        }
    }

    pub fn build(&self) -> Box<dyn DataSource> {
        match self.kind {
            SourceKind::Json => {
                Box::new(JsonDataSource::new(&self.path).with_pattern(&self.pattern))
            }
            SourceKind::Csv => Box::new(CsvDataSource::new(&self.path)),
        }
    }
}
