use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::series::HourlySeries;
use super::tmy::HOURS_PER_YEAR;
use crate::calendar::remap_to_year;
use crate::error::Result;

/// A fixed-orientation PV installation and the series derived for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvAsset {
    /// Panel tilt from horizontal (degrees)
    pub tilt: f64,
    /// Panel azimuth clockwise from north (degrees, 180 = south)
    pub azimuth: f64,
    /// Conversion efficiency (0.0-1.0)
    pub efficiency: f64,
    /// Panel area (m²)
    pub area: f64,
    /// Plane-of-array irradiance (W/m²), filled by the pipeline
    pub poa: Option<HourlySeries>,
    /// Power output (W), filled by the pipeline
    pub power: Option<HourlySeries>,
    /// Calendar the power output is reported on
    pub state: Vec<NaiveDateTime>,
}

impl PvAsset {
    pub fn new(tilt: f64, azimuth: f64, efficiency: f64, area: f64, target_year: Option<i32>) -> Result<Self> {
        Ok(Self {
            tilt,
            azimuth,
            efficiency,
            area,
            poa: None,
            power: None,
            state: remap_to_year(HOURS_PER_YEAR, target_year)?,
        })
    }
}
