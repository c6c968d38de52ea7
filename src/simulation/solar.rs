//! # Irradiance Transposition
//!
//! Solar geometry for a site and the isotropic-sky transposition of the
//! horizontal irradiance components onto a tilted panel.

use chrono::{Datelike, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::domain::{columns, HourlySeries, TmyDataset};
use crate::error::{Result, YieldError};

/// Ground reflectance used when none is configured
pub const DEFAULT_ALBEDO: f64 = 0.25;

/// Sun position, all angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Geometric elevation above the horizon
    pub elevation: f64,
    /// Geometric zenith
    pub zenith: f64,
    /// Zenith corrected for atmospheric refraction
    pub apparent_zenith: f64,
    /// Clockwise from north (0 = north, 90 = east, 180 = south)
    pub azimuth: f64,
}

/// A point on the globe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub latitude: f64,
    pub longitude: f64,
}

impl Site {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Sun position at a UTC instant (NOAA solar calculator equations).
    pub fn solar_position(&self, utc: NaiveDateTime) -> SolarPosition {
        let year = utc.year();
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        let days_in_year = if leap { 366.0 } else { 365.0 };
        let hour = utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;

        // Fractional year (radians)
        let gamma = 2.0 * PI / days_in_year * (utc.ordinal() as f64 - 1.0 + (hour - 12.0) / 24.0);

        let eqtime_min = 229.18
            * (0.000075 + 0.001868 * gamma.cos()
                - 0.032077 * gamma.sin()
                - 0.014615 * (2.0 * gamma).cos()
                - 0.040849 * (2.0 * gamma).sin());

        let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        let true_solar_min = hour * 60.0 + eqtime_min + 4.0 * self.longitude;
        let hour_angle = (true_solar_min / 4.0 - 180.0).to_radians();

        let lat = self.latitude.to_radians();
        let cos_zenith = (lat.sin() * decl.sin() + lat.cos() * decl.cos() * hour_angle.cos())
            .clamp(-1.0, 1.0);
        let zenith_rad = cos_zenith.acos();
        let zenith = zenith_rad.to_degrees();

        let east = -decl.cos() * hour_angle.sin();
        let north = decl.sin() * lat.cos() - decl.cos() * lat.sin() * hour_angle.cos();
        let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);

        let elevation = 90.0 - zenith;
        let apparent_zenith = zenith - refraction(elevation);

        SolarPosition {
            elevation,
            zenith,
            apparent_zenith,
            azimuth,
        }
    }
}

/// Atmospheric refraction (degrees) at a geometric elevation (degrees).
fn refraction(elevation: f64) -> f64 {
    let arcsec = if elevation > 85.0 {
        0.0
    } else if elevation > 5.0 {
        let t = elevation.to_radians().tan();
        58.1 / t - 0.07 / t.powi(3) + 0.000086 / t.powi(5)
    } else if elevation > -0.575 {
        let e = elevation;
        1735.0 + e * (-518.2 + e * (103.4 + e * (-12.79 + e * 0.711)))
    } else {
        -20.772 / elevation.to_radians().tan()
    };
    arcsec / 3600.0
}

/// Plane-of-array irradiance split by origin (W/m²)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoaComponents {
    pub direct: f64,
    pub sky_diffuse: f64,
    pub ground_diffuse: f64,
    pub global: f64,
}

/// Cosine of the angle of incidence between the sun and the panel normal.
pub fn aoi_cosine(position: &SolarPosition, tilt: f64, azimuth: f64) -> f64 {
    let zenith = position.apparent_zenith.to_radians();
    let tilt = tilt.to_radians();
    let delta = (position.azimuth - azimuth).to_radians();
    zenith.cos() * tilt.cos() + zenith.sin() * tilt.sin() * delta.cos()
}

/// Isotropic-sky transposition
pub fn isotropic_poa(
    position: &SolarPosition,
    dni: f64,
    ghi: f64,
    dhi: f64,
    tilt: f64,
    azimuth: f64,
    albedo: f64,
) -> PoaComponents {
    let cos_tilt = tilt.to_radians().cos();
    let direct = (dni * aoi_cosine(position, tilt, azimuth)).max(0.0);
    let sky_diffuse = dhi * (1.0 + cos_tilt) / 2.0;
    let ground_diffuse = ghi * albedo * (1.0 - cos_tilt) / 2.0;

    PoaComponents {
        direct,
        sky_diffuse,
        ground_diffuse,
        global: direct + sky_diffuse + ground_diffuse,
    }
}

/// Turns a TMY into global plane-of-array irradiance for one orientation
#[cfg_attr(test, mockall::automock)]
pub trait PoaTransposer {
    fn transpose(&self, tmy: &TmyDataset, tilt: f64, azimuth: f64) -> Result<HourlySeries>;
}

/// Solar geometry + isotropic sky model
#[derive(Debug, Clone, Copy)]
pub struct IrradianceTransposer {
    pub albedo: f64,
}

impl IrradianceTransposer {
    pub fn new(albedo: f64) -> Self {
        Self { albedo }
    }
}

impl Default for IrradianceTransposer {
    fn default() -> Self {
        Self::new(DEFAULT_ALBEDO)
    }
}

impl PoaTransposer for IrradianceTransposer {
    fn transpose(&self, tmy: &TmyDataset, tilt: f64, azimuth: f64) -> Result<HourlySeries> {
        let dni = tmy.frame.column(columns::DNI)?;
        let ghi = tmy.frame.column(columns::GHI)?;
        let dhi = tmy.frame.column(columns::DHI)?;

        let tz = tmy.meta.tz()?;
        let site = Site::new(tmy.meta.latitude, tmy.meta.longitude);

        let poa = tmy
            .frame
            .index()
            .iter()
            .enumerate()
            .map(|(i, local)| -> Result<f64> {
                let utc = tz
                    .from_local_datetime(local)
                    .earliest()
                    .ok_or_else(|| {
                        YieldError::Metadata(format!("{local} does not exist in {}", tmy.meta.timezone))
                    })?
                    .naive_utc();
                let position = site.solar_position(utc);
                Ok(isotropic_poa(&position, dni[i], ghi[i], dhi[i], tilt, azimuth, self.albedo).global)
            })
            .collect::<Result<Vec<f64>>>()?;

        debug!(tilt, azimuth, rows = poa.len(), "transposed irradiance");
        HourlySeries::new(tmy.frame.index().to_vec(), poa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_dataset;
    use chrono::NaiveDate;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_solar_position_summer_noon() {
        // Arnhem, solar noon around 11:36 UTC on the summer solstice
        let site = Site::new(51.98, 5.91);
        let pos = site.solar_position(utc(2021, 6, 21, 11, 36));

        assert!((pos.elevation - 61.5).abs() < 1.0, "elevation {}", pos.elevation);
        assert!((pos.azimuth - 180.0).abs() < 5.0, "azimuth {}", pos.azimuth);
        assert!(pos.apparent_zenith < pos.zenith);
    }

    #[test]
    fn test_solar_position_night() {
        let site = Site::new(51.98, 5.91);
        let pos = site.solar_position(utc(2021, 12, 21, 0, 0));
        assert!(pos.elevation < -40.0);
    }

    #[test]
    fn test_morning_sun_in_the_east() {
        let site = Site::new(51.98, 5.91);
        let pos = site.solar_position(utc(2021, 3, 20, 7, 0));
        assert!(pos.azimuth > 90.0 && pos.azimuth < 135.0, "azimuth {}", pos.azimuth);
    }

    #[test]
    fn test_refraction_vanishes_overhead() {
        assert_eq!(refraction(89.0), 0.0);
        assert!(refraction(0.0) > 0.4 && refraction(0.0) < 0.6);
    }

    #[test]
    fn test_horizontal_panel_sees_ghi() {
        let pos = SolarPosition {
            elevation: 40.0,
            zenith: 50.0,
            apparent_zenith: 50.0,
            azimuth: 180.0,
        };
        let dni = 600.0;
        let dhi = 100.0;
        let ghi = dni * 50f64.to_radians().cos() + dhi;

        let poa = isotropic_poa(&pos, dni, ghi, dhi, 0.0, 180.0, 0.25);
        assert!((poa.global - ghi).abs() < 1e-9);
        assert_eq!(poa.ground_diffuse, 0.0);
    }

    #[test]
    fn test_sun_behind_panel_has_no_direct_component() {
        let pos = SolarPosition {
            elevation: 20.0,
            zenith: 70.0,
            apparent_zenith: 70.0,
            azimuth: 0.0,
        };
        let poa = isotropic_poa(&pos, 500.0, 300.0, 100.0, 60.0, 180.0, 0.25);
        assert_eq!(poa.direct, 0.0);
        assert!(poa.sky_diffuse > 0.0);
    }

    #[test]
    fn test_transpose_dataset() {
        let tmy = synthetic_dataset(51.98, 5.91);
        let poa = IrradianceTransposer::default()
            .transpose(&tmy, 35.0, 180.0)
            .unwrap();

        assert_eq!(poa.len(), 8760);
        assert_eq!(poa.index(), tmy.frame.index());
        assert!(poa.values().iter().all(|v| *v >= 0.0));
        assert!(poa.sum() > 0.0);
        // no irradiance in the synthetic data at midnight
        assert_eq!(poa.values()[0], 0.0);
    }

    #[test]
    fn test_transpose_requires_irradiance_columns() {
        let mut tmy = synthetic_dataset(51.98, 5.91);
        let mut frame = crate::domain::TmyFrame::new("time(UTC)", tmy.frame.index().to_vec());
        frame
            .insert_column(columns::GHI, tmy.frame.column(columns::GHI).unwrap().to_vec())
            .unwrap();
        tmy.frame = frame;

        let err = IrradianceTransposer::default()
            .transpose(&tmy, 35.0, 180.0)
            .unwrap_err();
        assert!(matches!(err, YieldError::Schema(_)));
    }
}
