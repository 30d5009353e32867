//! Data module - inflammation table, CSV/JSON loading and data sources

pub mod loader;
pub mod source;
mod table;

pub use loader::{
    find_data_files, load_csv, load_inflammation_dir, load_json, load_json_table,
    load_tables_matching, save_csv, LoaderError, DEFAULT_PATTERN,
};
pub use source::{CsvDataSource, DataSource, JsonDataSource, SourceConfig, SourceKind};
pub use table::{InflammationTable, TableError};
