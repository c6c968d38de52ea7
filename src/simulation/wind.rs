//! # Wind Data Adapter
//!
//! Reshapes a TMY into the table the turbine model chain consumes: one column
//! per `(variable, height)` pair.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::domain::{columns, TmyDataset, HOURS_PER_YEAR};
use crate::error::{Result, YieldError};

const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Height the roughness column is labelled with
pub const ROUGHNESS_HEIGHT_M: f64 = 0.0;

/// Variables understood by the model chain
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WindVariable {
    /// m/s
    WindSpeed,
    /// K
    Temperature,
    /// Pa
    Pressure,
    /// m
    RoughnessLength,
}

/// Two-level column label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnKey {
    pub variable: WindVariable,
    /// Measurement height (m)
    pub height: f64,
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.variable, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindAdapterFrame {
    index: Vec<NaiveDateTime>,
    columns: Vec<(ColumnKey, Vec<f64>)>,
}

impl WindAdapterFrame {
    /// Builds the adapter frame. The TMY must hold exactly one year of hourly
    /// rows; nothing is resampled or filled.
    pub fn prepare(tmy: &TmyDataset, roughness_length: f64) -> Result<Self> {
        if tmy.len() != HOURS_PER_YEAR {
            return Err(YieldError::Schema(format!(
                "wind adapter needs {HOURS_PER_YEAR} rows, TMY has {}",
                tmy.len()
            )));
        }

        let wind_speed = tmy.frame.column(columns::WIND_SPEED)?.to_vec();
        let temperature = tmy
            .frame
            .column(columns::TEMPERATURE)?
            .iter()
            .map(|c| c + CELSIUS_TO_KELVIN)
            .collect();
        let pressure = tmy.frame.column(columns::PRESSURE)?.to_vec();

        let meta = &tmy.meta;
        let frame = Self {
            index: tmy.frame.index().to_vec(),
            columns: vec![
                (key(WindVariable::WindSpeed, meta.wind_speed_height), wind_speed),
                (key(WindVariable::Temperature, meta.temperature_height), temperature),
                (key(WindVariable::Pressure, meta.pressure_height), pressure),
                (
                    key(WindVariable::RoughnessLength, ROUGHNESS_HEIGHT_M),
                    vec![roughness_length; HOURS_PER_YEAR],
                ),
            ],
        };
        debug!(roughness_length, "wind adapter frame prepared");
        Ok(frame)
    }

    /// Timestamps of the source TMY
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(k, _)| k)
    }

    /// The column for `variable` and the height it was measured at
    pub fn column(&self, variable: WindVariable) -> Result<(f64, &[f64])> {
        self.columns
            .iter()
            .find(|(k, _)| k.variable == variable)
            .map(|(k, v)| (k.height, v.as_slice()))
            .ok_or_else(|| YieldError::Schema(format!("wind frame has no {variable} column")))
    }
}

fn key(variable: WindVariable, height: f64) -> ColumnKey {
    ColumnKey { variable, height }
}
