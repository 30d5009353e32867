//! Statistics Calculator Module
//! Per-day reductions across patients: mean, max, min and population standard deviation.

use crate::data::{InflammationTable, TableError};
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Reduce every day's column with `reduce`, one value per day.
fn reduce_days<F>(data: &InflammationTable, reduce: F) -> Result<Vec<f64>, TableError>
where
    F: Fn(&mut dyn Iterator<Item = f64>) -> f64 + Sync,
{
    data.ensure_not_empty()?;

    // Columns are independent; indexed collect keeps day order
    Ok((0..data.days())
        .into_par_iter()
        .map(|day| {
            let column: &mut dyn Iterator<Item = f64> = &mut data.column(day);
            reduce(column)
        })
        .collect())
}

/// Daily mean of a 2D inflammation table.
pub fn daily_mean(data: &InflammationTable) -> Result<Vec<f64>, TableError> {
    reduce_days(data, |column| Statistics::mean(column))
}

/// Daily max of a 2D inflammation table.
pub fn daily_max(data: &InflammationTable) -> Result<Vec<f64>, TableError> {
    reduce_days(data, |column| Statistics::max(column))
}

/// Daily min of a 2D inflammation table.
pub fn daily_min(data: &InflammationTable) -> Result<Vec<f64>, TableError> {
    reduce_days(data, |column| Statistics::min(column))
}

/// Daily population standard deviation (divisor is the number of patients).
pub fn standard_deviation(data: &InflammationTable) -> Result<Vec<f64>, TableError> {
    reduce_days(data, |column| Statistics::population_std_dev(column))
}

/// All daily statistics of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub patients: usize,
    pub days: usize,
    pub mean: Vec<f64>,
    pub max: Vec<f64>,
    pub min: Vec<f64>,
    pub std_dev: Vec<f64>,
}

impl DailySummary {
    pub fn compute(data: &InflammationTable) -> Result<Self, TableError> {
        Ok(Self {
            patients: data.patients(),
            days: data.days(),
            mean: daily_mean(data)?,
            max: daily_max(data)?,
            min: daily_min(data)?,
            std_dev: standard_deviation(data)?,
        })
    }

    /// Summaries for several tables, e.g. one per loaded file.
    pub fn compute_all(tables: &[InflammationTable]) -> Result<Vec<Self>, TableError> {
        tables.par_iter().map(Self::compute).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<f64>>) -> InflammationTable {
        InflammationTable::from_rows(rows).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_daily_mean_zeros() {
        let data = table(vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![0.0, 0.0]]);

        assert_close(&daily_mean(&data).unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_daily_mean_integers() {
        let data = table(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);

        assert_close(&daily_mean(&data).unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn test_daily_max_and_min() {
        let data = table(vec![
            vec![4.0, -2.0, 5.0],
            vec![1.0, 6.0, 2.0],
            vec![-4.0, -1.0, 9.0],
        ]);

        assert_close(&daily_max(&data).unwrap(), &[4.0, 6.0, 9.0]);
        assert_close(&daily_min(&data).unwrap(), &[-4.0, -2.0, 2.0]);
    }

    #[test]
    fn test_standard_deviation_is_population() {
        // Column 0: [2, 4, 4, 4, 5, 5, 7, 9] has population std 2 (sample std ~2.138)
        let data = table(
            [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
                .iter()
                .map(|&v| vec![v, 1.0])
                .collect(),
        );

        assert_close(&standard_deviation(&data).unwrap(), &[2.0, 0.0]);
    }

    #[test]
    fn test_standard_deviation_identical_rows() {
        let data = table(vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]);

        assert_close(&standard_deviation(&data).unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_single_patient() {
        let data = table(vec![vec![3.0, 7.5]]);

        assert_close(&daily_mean(&data).unwrap(), &[3.0, 7.5]);
        assert_close(&daily_max(&data).unwrap(), &[3.0, 7.5]);
        assert_close(&daily_min(&data).unwrap(), &[3.0, 7.5]);
        assert_close(&standard_deviation(&data).unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let no_patients = InflammationTable::default();
        let no_days = table(vec![vec![], vec![]]);

        for data in [&no_patients, &no_days] {
            assert!(matches!(daily_mean(data), Err(TableError::Empty { .. })));
            assert!(matches!(daily_max(data), Err(TableError::Empty { .. })));
            assert!(matches!(daily_min(data), Err(TableError::Empty { .. })));
            assert!(matches!(
                standard_deviation(data),
                Err(TableError::Empty { .. })
            ));
            assert!(DailySummary::compute(data).is_err());
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let data = table(vec![vec![1.0, 5.0], vec![3.0, 2.0]]);
        let before = data.clone();

        let _ = DailySummary::compute(&data).unwrap();

        assert_eq!(data, before);
    }

    #[test]
    fn test_summary_bounds() {
        let data = table(vec![
            vec![0.0, 3.0, 1.0, 8.0],
            vec![2.0, 3.0, 4.0, 1.0],
            vec![1.0, 3.0, 9.0, 0.5],
        ]);

        let summary = DailySummary::compute(&data).unwrap();

        assert_eq!((summary.patients, summary.days), (3, 4));
        for day in 0..summary.days {
            assert!(summary.min[day] <= summary.mean[day]);
            assert!(summary.mean[day] <= summary.max[day]);
            assert!(summary.std_dev[day] >= 0.0);
        }
    }

    #[test]
    fn test_compute_all_keeps_order() {
        let tables = vec![
            table(vec![vec![1.0], vec![3.0]]),
            table(vec![vec![10.0, 20.0]]),
        ];

        let summaries = DailySummary::compute_all(&tables).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_close(&summaries[0].mean, &[2.0]);
        assert_close(&summaries[1].mean, &[10.0, 20.0]);
    }

    #[test]
    fn test_summary_serializes() {
        let data = table(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        let json = serde_json::to_value(DailySummary::compute(&data).unwrap()).unwrap();

        assert_eq!(json["mean"], serde_json::json!([2.0, 3.0]));
        assert_eq!(json["patients"], 2);
    }
}
