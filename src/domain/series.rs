use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{weekly_sums, WEEKS_PER_YEAR};
use crate::error::{Result, YieldError};

/// An hourly value series with its timestamp index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

/// Aggregates of a yearly hourly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldTotals {
    /// Sum over all hours
    pub yearly: f64,
    /// Sums per week bucket, always `WEEKS_PER_YEAR` entries
    pub weekly: Vec<f64>,
    /// Largest weekly sum
    pub max_weekly: f64,
}

impl HourlySeries {
    pub fn new(index: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(YieldError::Schema(format!(
                "series index has {} entries but {} values were supplied",
                index.len(),
                values.len()
            )));
        }
        Ok(Self { index, values })
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest value, `None` for an empty series
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum() / self.values.len() as f64)
        }
    }

    /// Elementwise transform keeping the index
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            index: self.index.clone(),
            values: self.values.iter().map(|v| f(*v)).collect(),
        }
    }

    /// Replaces the index, keeping the values in order.
    pub fn reindex(self, index: Vec<NaiveDateTime>) -> Result<Self> {
        Self::new(index, self.values)
    }

    pub fn totals(&self) -> YieldTotals {
        let weekly = weekly_sums(&self.values);
        debug_assert_eq!(weekly.len(), WEEKS_PER_YEAR);
        let max_weekly = weekly.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        YieldTotals {
            yearly: self.sum(),
            weekly,
            max_weekly,
        }
    }
}
