//! # Calendar Remapping
//!
//! A TMY is stitched together from months of different historical years, so
//! its own timestamps say nothing about when the forecast applies. Output
//! series are therefore re-indexed onto a future year, and aggregated into
//! fixed week buckets.
//!
//! The remap always yields 365 × 24 sequential hours starting on 1 January.
//! Leap years are not special-cased: 31 December of a leap year is dropped.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{Result, YieldError};

/// Target year used when none is configured
pub const DEFAULT_YEAR: i32 = 2021;

pub const HOURS_PER_WEEK: usize = 168;

pub const WEEKS_PER_YEAR: usize = 52;

/// Hourly timestamps starting at 1 January 00:00 of `year`
/// (or [`DEFAULT_YEAR`]) for `series_length` consecutive hours.
///
/// A year whose calendar chrono cannot represent is a `Config` error.
pub fn remap_to_year(series_length: usize, year: Option<i32>) -> Result<Vec<NaiveDateTime>> {
    let year = year.unwrap_or(DEFAULT_YEAR);
    let out_of_range = || YieldError::Config(format!("target year {year} is out of range"));

    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(out_of_range)?;
    start
        .checked_add_signed(Duration::hours(series_length as i64))
        .ok_or_else(out_of_range)?;

    Ok((0..series_length as i64)
        .map(|h| start + Duration::hours(h))
        .collect())
}

/// Week bucket of an hour of the year. The partial 53rd week is folded into
/// the last bucket.
pub fn week_bucket(hour: usize) -> usize {
    (hour / HOURS_PER_WEEK).min(WEEKS_PER_YEAR - 1)
}

/// Week bucket for every hour of a 8760-hour year
pub fn week_buckets() -> Vec<usize> {
    (0..crate::domain::HOURS_PER_YEAR).map(week_bucket).collect()
}

/// Sums hourly values per week bucket.
pub fn weekly_sums(values: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0; WEEKS_PER_YEAR];
    for (hour, value) in values.iter().enumerate() {
        sums[week_bucket(hour)] += value;
    }
    sums
}
