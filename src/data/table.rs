//! Inflammation Table Module
//! Row-major 2D container of per-patient daily observations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Row {row} has {found} days, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Table of {patients} patients x {days} days has no data to reduce")]
    Empty { patients: usize, days: usize },
}

/// Inflammation observations, one row per patient and one column per day.
///
/// Values are stored row-major; every row has the same number of days.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InflammationTable {
    values: Vec<f64>,
    patients: usize,
    days: usize,
}

impl InflammationTable {
    /// Stack per-patient series into a table.
    ///
    /// All rows must have the length of the first one.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, TableError>
    where
        R: AsRef<[f64]>,
    {
        let mut values = Vec::new();
        let mut patients = 0;
        let mut days = 0;

        for (row, series) in rows.into_iter().enumerate() {
            let series = series.as_ref();
            if row == 0 {
                days = series.len();
            } else if series.len() != days {
                return Err(TableError::ShapeMismatch {
                    row,
                    expected: days,
                    found: series.len(),
                });
            }
            values.extend_from_slice(series);
            patients += 1;
        }

        Ok(Self {
            values,
            patients,
            days,
        })
    }

    /// Number of patients (rows).
    pub fn patients(&self) -> usize {
        self.patients
    }

    /// Number of days (columns).
    pub fn days(&self) -> usize {
        self.days
    }

    /// `(patients, days)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.patients, self.days)
    }

    /// True when there are no patients or no days.
    pub fn is_empty(&self) -> bool {
        self.patients == 0 || self.days == 0
    }

    /// Observations of one patient.
    pub fn row(&self, patient: usize) -> Option<&[f64]> {
        if patient >= self.patients {
            return None;
        }
        let start = patient * self.days;
        Some(&self.values[start..start + self.days])
    }

    /// Every patient's observations, in row order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.patients).filter_map(move |patient| self.row(patient))
    }

    /// Observations of every patient on one day, in patient order.
    ///
    /// Yields nothing when `day` is out of range.
    pub fn column(&self, day: usize) -> impl Iterator<Item = f64> + '_ {
        let step = self.days.max(1);
        let start = if day < self.days { day } else { self.values.len() };
        self.values[start..].iter().step_by(step).copied()
    }

    /// Single observation, `None` when out of range.
    pub fn get(&self, patient: usize, day: usize) -> Option<f64> {
        if day >= self.days {
            return None;
        }
        self.row(patient).map(|row| row[day])
    }

    /// Copy the table back out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Reject tables with nothing to reduce.
    pub fn ensure_not_empty(&self) -> Result<(), TableError> {
        if self.is_empty() {
            return Err(TableError::Empty {
                patients: self.patients,
                days: self.days,
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<f64>>> for InflammationTable {
    type Error = TableError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}
