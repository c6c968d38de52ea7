//! # Yield Simulation
//!
//! Turns a typical meteorological year into hourly PV and wind output.
//!
//! ## Components
//!
//! - **Solar**: solar position and isotropic-sky transposition to plane-of-array irradiance
//! - **PV**: linear panel model on top of the transposed irradiance
//! - **Wind**: adapter frame keyed by `(variable, height)` for the turbine model chain
//! - **Turbine / Wind yield**: hub-height extrapolation, power-curve lookup, full-load hours
//!
//! ## Usage
//!
//! ```rust,no_run
//! # use vre_yield::domain::{PvAsset, TmyDataset};
//! # fn run(tmy: &TmyDataset) -> vre_yield::Result<()> {
//! use vre_yield::simulation::{
//!     IrradianceTransposer, ModelChainConfig, PvYieldCalculator, WindAdapterFrame,
//!     WindTurbine, WindYieldCalculator,
//! };
//!
//! let mut asset = PvAsset::new(35.0, 180.0, 0.2, 10.0, Some(2030))?;
//! let pv = PvYieldCalculator::new(IrradianceTransposer::default());
//! let power = pv.power(&mut asset, tmy)?;
//!
//! let frame = WindAdapterFrame::prepare(tmy, 0.25)?;
//! let wind = WindYieldCalculator::new(WindTurbine::default(), ModelChainConfig::default())?;
//! let flh = wind.full_load_hours(&frame)?;
//! # Ok(())
//! # }
//! ```

pub mod pv;
pub mod solar;
pub mod turbine;
pub mod wind;
pub mod wind_yield;

pub use pv::PvYieldCalculator;
pub use solar::{IrradianceTransposer, PoaTransposer, Site, SolarPosition};
pub use turbine::{PowerCurve, WindTurbine};
pub use wind::{ColumnKey, WindAdapterFrame, WindVariable};
pub use wind_yield::{
    DensityModel, ModelChainConfig, PowerOutputModel, TemperatureModel, WindSpeedModel,
    WindSummary, WindYieldCalculator,
};
