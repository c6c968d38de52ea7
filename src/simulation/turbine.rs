//! Wind turbine definition and power-curve lookup.

use serde::{Deserialize, Serialize};

use crate::error::{Result, YieldError};

/// Air density the manufacturer curves are stated for (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Wind speed (m/s) against electrical power (W), sorted by wind speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    pub wind_speed: Vec<f64>,
    pub value: Vec<f64>,
}

impl PowerCurve {
    pub fn new(wind_speed: Vec<f64>, value: Vec<f64>) -> Result<Self> {
        let curve = Self { wind_speed, value };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<()> {
        if self.wind_speed.len() != self.value.len() {
            return Err(YieldError::Config(format!(
                "power curve has {} wind speeds but {} values",
                self.wind_speed.len(),
                self.value.len()
            )));
        }
        if self.wind_speed.len() < 2 {
            return Err(YieldError::Config(
                "power curve needs at least two points".to_string(),
            ));
        }
        if self.wind_speed.windows(2).any(|w| w[1] <= w[0]) {
            return Err(YieldError::Config(
                "power curve wind speeds must be strictly increasing".to_string(),
            ));
        }
        if self.value.iter().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(YieldError::Config(
                "power curve values must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Rated power: the curve's maximum
    pub fn nominal_power(&self) -> f64 {
        self.value.iter().copied().fold(0.0, f64::max)
    }

    /// Power at `wind_speed`, 0 outside the tabulated range.
    pub fn power_at(&self, wind_speed: f64) -> f64 {
        interpolate(wind_speed, &self.wind_speed, &self.value)
    }

    /// Power at `wind_speed` for air of `density`, shifting the curve's wind
    /// speeds by `(ρ₀/ρ)^p` where `p` runs from 1/3 at 7.5 m/s to 2/3 at
    /// 12.5 m/s.
    pub fn density_corrected_power_at(&self, wind_speed: f64, density: f64) -> f64 {
        let corrected: Vec<f64> = self
            .wind_speed
            .iter()
            .map(|v| {
                let p = interpolate_clamped(*v, &[7.5, 12.5], &[1.0 / 3.0, 2.0 / 3.0]);
                v * (STANDARD_AIR_DENSITY / density).powf(p)
            })
            .collect();
        interpolate(wind_speed, &corrected, &self.value)
    }
}

/// Linear interpolation on sorted `xs`, 0 outside `[xs₀, xsₙ]`.
fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    match (xs.first(), xs.last()) {
        (Some(first), Some(last)) if x >= *first && x <= *last => interpolate_clamped(x, xs, ys),
        _ => 0.0,
    }
}

/// Linear interpolation holding the end values outside the range.
fn interpolate_clamped(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = xs[..n].partition_point(|v| *v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Turbine type, hub height and power curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindTurbine {
    pub turbine_type: String,
    /// Hub height (m)
    pub hub_height: f64,
    pub power_curve: PowerCurve,
}

impl WindTurbine {
    /// Enercon E-126/4200 at 159 m hub height. Curve in 1 m/s steps from
    /// 1 to 25 m/s, cut-out above.
    pub fn e126_4200() -> Self {
        const KW: [f64; 25] = [
            0.0, 0.0, 58.0, 185.0, 400.0, 745.0, 1200.0, 1790.0, 2450.0, 3120.0, 3660.0,
            4000.0, 4150.0, 4200.0, 4200.0, 4200.0, 4200.0, 4200.0, 4200.0, 4200.0, 4200.0,
            4200.0, 4200.0, 4200.0, 4200.0,
        ];
        Self {
            turbine_type: "E-126/4200".to_string(),
            hub_height: 159.0,
            power_curve: PowerCurve {
                wind_speed: (1..=25).map(f64::from).collect(),
                value: KW.iter().map(|kw| kw * 1000.0).collect(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.hub_height.is_nan() || self.hub_height <= 0.0 {
            return Err(YieldError::Config(format!(
                "turbine {} has non-positive hub height {}",
                self.turbine_type, self.hub_height
            )));
        }
        self.power_curve.validate()
    }

    pub fn nominal_power(&self) -> f64 {
        self.power_curve.nominal_power()
    }
}

impl Default for WindTurbine {
    fn default() -> Self {
        Self::e126_4200()
    }
}
