//! Renewable yield estimation from PVGIS typical meteorological years.
//!
//! A TMY is fetched once per location (and kept in a single-slot cache),
//! transposed onto a tilted PV panel, and fed through a wind turbine model
//! chain. Results are hourly series on a chosen future calendar plus yearly
//! aggregates such as full-load hours.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod simulation;
pub mod telemetry;
pub mod weather;

#[cfg(test)]
mod test_support;

pub use error::{Result, YieldError};
