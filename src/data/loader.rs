//! Inflammation Data Loader Module
//! Reads headerless CSV files with Polars and `observations` JSON documents with serde.

use super::table::{InflammationTable, TableError};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File name pattern of the per-file patient documents in a data directory.
pub const DEFAULT_PATTERN: &str = "inflammation*.json";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No files matching {pattern} found in {}", dir.display())]
    NoMatchingFiles { dir: PathBuf, pattern: String },
    #[error("Invalid value in {} at row {row}, day {day}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        day: usize,
        reason: String,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to parse JSON document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid inflammation table in {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] ::glob::PatternError),
    #[error("Failed to read directory entry: {0}")]
    Glob(#[from] ::glob::GlobError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LoaderError {
    /// Missing file, or a directory without any matching documents.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NoMatchingFiles { .. })
    }

    /// Content that could not be read as numeric observations.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Csv(_) | Self::Json { .. })
    }
}

/// One patient's entry in a JSON document.
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    observations: Vec<f64>,
}

fn open(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoaderError::NotFound(path.to_path_buf()),
        _ => LoaderError::Io(e),
    })
}

/// Load a table from a headerless comma-delimited file.
///
/// Every field must be numeric; the first offending field is reported with
/// its 1-based row and day.
pub fn load_csv(path: impl AsRef<Path>) -> Result<InflammationTable, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    let table = table_from_frame(&df, path)?;
    debug!(
        "Loaded {} patients x {} days from {}",
        table.patients(),
        table.days(),
        path.display()
    );
    Ok(table)
}

/// One CSV column as parsed numbers, plus which cells were empty.
struct ParsedColumn {
    values: Vec<Option<f64>>,
    blank: Vec<bool>,
}

/// Parse a column to f64, tolerating whitespace around string fields.
fn parse_column(column: &Column) -> PolarsResult<ParsedColumn> {
    let mut values = Vec::with_capacity(column.len());
    let mut blank = Vec::with_capacity(column.len());

    if matches!(column.dtype(), DataType::String) {
        for field in column.str()?.into_iter() {
            match field.map(str::trim) {
                None | Some("") => {
                    values.push(None);
                    blank.push(true);
                }
                Some(field) => {
                    values.push(field.parse::<f64>().ok());
                    blank.push(false);
                }
            }
        }
    } else {
        let cast = column.cast(&DataType::Float64)?;
        for value in cast.f64()?.into_iter() {
            values.push(value);
            blank.push(value.is_none());
        }
    }

    Ok(ParsedColumn { values, blank })
}

/// Convert every column to f64, refusing anything that does not parse.
///
/// Blank lines are skipped; `row` in errors is the line number in the file.
fn table_from_frame(df: &DataFrame, path: &Path) -> Result<InflammationTable, LoaderError> {
    let columns = df
        .get_columns()
        .iter()
        .map(parse_column)
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(df.height());
    for patient in 0..df.height() {
        if columns.iter().all(|c| c.blank[patient]) {
            continue;
        }

        let mut row = Vec::with_capacity(columns.len());
        for (day, parsed) in columns.iter().enumerate() {
            let Some(value) = parsed.values[patient] else {
                let reason = if parsed.blank[patient] {
                    "missing value".to_string()
                } else {
                    let raw = df.get_columns()[day]
                        .get(patient)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    format!("{} is not numeric", raw.trim_matches('"').trim())
                };
                return Err(LoaderError::Parse {
                    path: path.to_path_buf(),
                    row: patient + 1,
                    day: day + 1,
                    reason,
                });
            };
            row.push(value);
        }
        rows.push(row);
    }

    InflammationTable::from_rows(rows).map_err(|source| LoaderError::Table {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a table as headerless CSV, readable again with [`load_csv`].
pub fn save_csv(table: &InflammationTable, path: impl AsRef<Path>) -> Result<(), LoaderError> {
    let path = path.as_ref();
    table
        .ensure_not_empty()
        .map_err(|source| LoaderError::Table {
            path: path.to_path_buf(),
            source,
        })?;

    let columns: Vec<Column> = (0..table.days())
        .map(|day| {
            let values: Vec<f64> = table.column(day).collect();
            Column::new(format!("day_{}", day + 1).into(), values)
        })
        .collect();
    let mut df = DataFrame::new(columns)?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(false)
        .finish(&mut df)?;

    debug!("Wrote {} patients to {}", table.patients(), path.display());
    Ok(())
}

/// Load the per-patient series of a JSON document.
///
/// Expected format:
/// ```json
/// [
///   { "observations": [0, 1] },
///   { "observations": [0, 2] }
/// ]
/// ```
pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>, LoaderError> {
    let path = path.as_ref();
    let reader = BufReader::new(open(path)?);

    let records: Vec<ObservationRecord> =
        serde_json::from_reader(reader).map_err(|source| LoaderError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(records.into_iter().map(|r| r.observations).collect())
}

/// Load a JSON document and stack its series into a table.
pub fn load_json_table(path: impl AsRef<Path>) -> Result<InflammationTable, LoaderError> {
    let path = path.as_ref();
    let table = InflammationTable::from_rows(load_json(path)?).map_err(|source| {
        LoaderError::Table {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!(
        "Loaded {} patients x {} days from {}",
        table.patients(),
        table.days(),
        path.display()
    );
    Ok(table)
}

/// List the files in `dir` matching `pattern`, sorted by path.
pub fn find_data_files(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>, LoaderError> {
    let dir = dir.as_ref();
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let full_pattern = format!(
        "{}/{}",
        ::glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );

    let mut paths = ::glob::glob(&full_pattern)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|p| p.is_file())
        .collect::<Vec<_>>();
    paths.sort();

    Ok(paths)
}

/// Load every `pattern` document in `dir`, one table per file in path order.
pub fn load_tables_matching(
    dir: impl AsRef<Path>,
    pattern: &str,
) -> Result<Vec<InflammationTable>, LoaderError> {
    let dir = dir.as_ref();
    let paths = find_data_files(dir, pattern)?;
    if paths.is_empty() {
        return Err(LoaderError::NoMatchingFiles {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    info!("Found {} inflammation files in {}", paths.len(), dir.display());

    // Use rayon for parallel loading; collect keeps path order
    paths.par_iter().map(|path| load_json_table(path)).collect()
}

/// Load every `inflammation*.json` document in `dir`.
pub fn load_inflammation_dir(
    dir: impl AsRef<Path>,
) -> Result<Vec<InflammationTable>, LoaderError> {
    load_tables_matching(dir, DEFAULT_PATTERN)
}
