//! Stats module - daily reductions across patients

mod calculator;

pub use calculator::{daily_max, daily_mean, daily_min, standard_deviation, DailySummary};
