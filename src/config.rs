use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::domain::PvAsset;
use crate::error::Result;
use crate::simulation::solar::DEFAULT_ALBEDO;
use crate::simulation::{ModelChainConfig, WindTurbine};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "VRE__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pvgis: PvgisConfig,
    pub cache: CacheConfig,
    pub site: SiteConfig,
    pub pv: PvConfig,
    pub wind: WindConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PvgisConfig {
    pub base_url: String,
    /// No timeout when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for PvgisConfig {
    fn default() -> Self {
        Self {
            base_url: "https://re.jrc.ec.europa.eu/api".to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/lastapicall.bin"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        // Arnhem, NL
        Self {
            latitude: 51.98,
            longitude: 5.91,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PvConfig {
    pub tilt: f64,
    pub azimuth: f64,
    pub efficiency: f64,
    /// m²
    pub area: f64,
    pub target_year: Option<i32>,
    pub albedo: f64,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            tilt: 35.0,
            azimuth: 180.0,
            efficiency: 0.2,
            area: 10.0,
            target_year: None,
            albedo: DEFAULT_ALBEDO,
        }
    }
}

impl PvConfig {
    pub fn asset(&self) -> Result<PvAsset> {
        PvAsset::new(
            self.tilt,
            self.azimuth,
            self.efficiency,
            self.area,
            self.target_year,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// m
    pub roughness_length: f64,
    pub turbine: WindTurbine,
    pub model_chain: ModelChainConfig,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            roughness_length: 0.25,
            turbine: WindTurbine::default(),
            model_chain: ModelChainConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// TOML file (optional) overlaid with `VRE__SECTION__KEY` variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Ok(figment.extract()?)
    }
}
