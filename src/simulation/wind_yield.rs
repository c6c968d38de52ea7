//! # Wind Yield
//!
//! Turbine model chain: hub-height wind speed, temperature and air density
//! from the adapter frame, then power-curve lookup, reduced to full-load
//! hours.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};

use super::turbine::WindTurbine;
use super::wind::{WindAdapterFrame, WindVariable};
use crate::domain::{HourlySeries, HOURS_PER_YEAR};
use crate::error::{Result, YieldError};

/// Specific gas constant of dry air (J/(kg·K))
const GAS_CONSTANT_DRY_AIR: f64 = 287.058;

/// Temperature lapse rate (K/m)
const TEMPERATURE_GRADIENT: f64 = 0.0065;

/// Hellman exponent for neutral stability over open terrain
pub const DEFAULT_HELLMAN_EXPONENT: f64 = 1.0 / 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WindSpeedModel {
    Logarithmic,
    Hellman,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DensityModel {
    Barometric,
    IdealGas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemperatureModel {
    LinearGradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PowerOutputModel {
    PowerCurve,
}

/// Model selection per axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelChainConfig {
    pub wind_speed_model: WindSpeedModel,
    pub density_model: DensityModel,
    pub temperature_model: TemperatureModel,
    pub power_output_model: PowerOutputModel,
    /// Shift the power curve for non-standard air density
    pub density_correction: bool,
    /// Height of obstacles in front of the turbine (m)
    pub obstacle_height: f64,
    /// Used by [`WindSpeedModel::Hellman`]; defaults to 1/7
    pub hellman_exponent: Option<f64>,
}

impl Default for ModelChainConfig {
    fn default() -> Self {
        Self {
            wind_speed_model: WindSpeedModel::Logarithmic,
            density_model: DensityModel::IdealGas,
            temperature_model: TemperatureModel::LinearGradient,
            power_output_model: PowerOutputModel::PowerCurve,
            density_correction: true,
            obstacle_height: 0.0,
            hellman_exponent: None,
        }
    }
}

/// Logarithmic wind profile. Fails when the obstacle displacement reaches
/// the measurement height.
pub fn logarithmic_profile(
    wind_speed: f64,
    data_height: f64,
    hub_height: f64,
    roughness_length: f64,
    obstacle_height: f64,
) -> Result<f64> {
    let displacement = 0.7 * obstacle_height;
    if displacement >= data_height {
        return Err(YieldError::Config(format!(
            "obstacle height {obstacle_height} m too large for wind data at {data_height} m"
        )));
    }
    if roughness_length <= 0.0 {
        return Err(YieldError::Config(format!(
            "roughness length must be positive, got {roughness_length}"
        )));
    }
    Ok(wind_speed * ((hub_height - displacement) / roughness_length).ln()
        / ((data_height - displacement) / roughness_length).ln())
}

/// Power-law wind profile
pub fn hellman(wind_speed: f64, data_height: f64, hub_height: f64, exponent: f64) -> f64 {
    wind_speed * (hub_height / data_height).powf(exponent)
}

/// Temperature (K) at hub height with a constant lapse rate
pub fn linear_gradient(temperature: f64, data_height: f64, hub_height: f64) -> f64 {
    temperature - TEMPERATURE_GRADIENT * (hub_height - data_height)
}

/// Pressure (hPa) at hub height, dropping 1 hPa per 8 m
fn pressure_at_hub_hpa(pressure: f64, data_height: f64, hub_height: f64) -> f64 {
    pressure / 100.0 - (hub_height - data_height) / 8.0
}

/// Air density (kg/m³) from the ideal gas law
pub fn ideal_gas(pressure: f64, data_height: f64, hub_height: f64, hub_temperature: f64) -> f64 {
    pressure_at_hub_hpa(pressure, data_height, hub_height) * 100.0
        / (GAS_CONSTANT_DRY_AIR * hub_temperature)
}

/// Air density (kg/m³) from the barometric height equation
pub fn barometric(pressure: f64, data_height: f64, hub_height: f64, hub_temperature: f64) -> f64 {
    pressure_at_hub_hpa(pressure, data_height, hub_height) * 1.225 * 288.15 * 100.0
        / (101_330.0 * hub_temperature)
}

/// `sum / (max × 8760) × 8760`, 0 for a turbine that never produces.
pub fn full_load_hours(power: &[f64]) -> f64 {
    let max = power.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return 0.0;
    }
    let sum: f64 = power.iter().sum();
    sum / (max * HOURS_PER_YEAR as f64) * HOURS_PER_YEAR as f64
}

/// Site wind statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSummary {
    /// Mean measured wind speed at sensor height (m/s)
    pub mean_wind_speed: f64,
    pub hub_height: f64,
    /// Mean wind speed extrapolated to hub height (m/s)
    pub mean_hub_wind_speed: f64,
    pub full_load_hours: f64,
}

/// Runs one turbine through one model chain
#[derive(Debug, Clone)]
pub struct WindYieldCalculator {
    turbine: WindTurbine,
    chain: ModelChainConfig,
}

impl WindYieldCalculator {
    pub fn new(turbine: WindTurbine, chain: ModelChainConfig) -> Result<Self> {
        turbine.validate()?;
        Ok(Self { turbine, chain })
    }

    pub fn turbine(&self) -> &WindTurbine {
        &self.turbine
    }

    pub fn chain(&self) -> &ModelChainConfig {
        &self.chain
    }

    /// Wind speed at hub height for every hour
    pub fn hub_wind_speed(&self, frame: &WindAdapterFrame) -> Result<Vec<f64>> {
        let (height, speed) = frame.column(WindVariable::WindSpeed)?;
        let hub = self.turbine.hub_height;

        match self.chain.wind_speed_model {
            WindSpeedModel::Logarithmic => {
                let (_, roughness) = frame.column(WindVariable::RoughnessLength)?;
                speed
                    .iter()
                    .zip(roughness)
                    .map(|(v, z0)| logarithmic_profile(*v, height, hub, *z0, self.chain.obstacle_height))
                    .collect()
            }
            WindSpeedModel::Hellman => {
                let exponent = self.chain.hellman_exponent.unwrap_or(DEFAULT_HELLMAN_EXPONENT);
                Ok(speed.iter().map(|v| hellman(*v, height, hub, exponent)).collect())
            }
        }
    }

    fn hub_temperature(&self, frame: &WindAdapterFrame) -> Result<Vec<f64>> {
        let (height, temperature) = frame.column(WindVariable::Temperature)?;
        let hub = self.turbine.hub_height;
        Ok(match self.chain.temperature_model {
            TemperatureModel::LinearGradient => temperature
                .iter()
                .map(|t| linear_gradient(*t, height, hub))
                .collect(),
        })
    }

    fn hub_density(&self, frame: &WindAdapterFrame) -> Result<Vec<f64>> {
        let (height, pressure) = frame.column(WindVariable::Pressure)?;
        let temperature = self.hub_temperature(frame)?;
        let hub = self.turbine.hub_height;
        let density: fn(f64, f64, f64, f64) -> f64 = match self.chain.density_model {
            DensityModel::IdealGas => ideal_gas,
            DensityModel::Barometric => barometric,
        };
        Ok(pressure
            .iter()
            .zip(temperature)
            .map(|(p, t)| density(*p, height, hub, t))
            .collect())
    }

    /// Hourly electrical output (W)
    pub fn run(&self, frame: &WindAdapterFrame) -> Result<HourlySeries> {
        let speed = self.hub_wind_speed(frame)?;
        let curve = &self.turbine.power_curve;

        let power: Vec<f64> = match self.chain.power_output_model {
            PowerOutputModel::PowerCurve if self.chain.density_correction => {
                let density = self.hub_density(frame)?;
                speed
                    .iter()
                    .zip(density)
                    .map(|(v, rho)| curve.density_corrected_power_at(*v, rho))
                    .collect()
            }
            PowerOutputModel::PowerCurve => speed.iter().map(|v| curve.power_at(*v)).collect(),
        };

        debug!(turbine = %self.turbine.turbine_type, "model chain run");
        HourlySeries::new(frame.index().to_vec(), power)
    }

    pub fn full_load_hours(&self, frame: &WindAdapterFrame) -> Result<f64> {
        let power = self.run(frame)?;
        Ok(full_load_hours(power.values()))
    }

    pub fn summarize(&self, frame: &WindAdapterFrame) -> Result<WindSummary> {
        let (_, measured) = frame.column(WindVariable::WindSpeed)?;
        let hub_speed = self.hub_wind_speed(frame)?;
        let summary = WindSummary {
            mean_wind_speed: mean(measured),
            hub_height: self.turbine.hub_height,
            mean_hub_wind_speed: mean(&hub_speed),
            full_load_hours: self.full_load_hours(frame)?,
        };
        info!(
            turbine = %self.turbine.turbine_type,
            mean_wind_speed = summary.mean_wind_speed,
            mean_hub_wind_speed = summary.mean_hub_wind_speed,
            full_load_hours = summary.full_load_hours,
            "wind yield"
        );
        Ok(summary)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
