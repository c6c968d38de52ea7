//! Typical meteorological year frames and their site metadata.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::series::HourlySeries;
use crate::error::{Result, YieldError};

/// Rows in a TMY: one per hour of a 365-day year
pub const HOURS_PER_YEAR: usize = 8760;

/// Column names as published by PVGIS, plus the derived ones added locally
pub mod columns {
    /// 2 m air temperature (°C)
    pub const TEMPERATURE: &str = "T2m";
    /// Relative humidity (%)
    pub const RELATIVE_HUMIDITY: &str = "RH";
    /// Global horizontal irradiance (W/m²)
    pub const GHI: &str = "G(h)";
    /// Beam normal irradiance (W/m²)
    pub const DNI: &str = "Gb(n)";
    /// Diffuse horizontal irradiance (W/m²)
    pub const DHI: &str = "Gd(h)";
    /// Infrared horizontal irradiance (W/m²)
    pub const INFRARED: &str = "IR(h)";
    /// 10 m wind speed (m/s)
    pub const WIND_SPEED: &str = "WS10m";
    /// 10 m wind direction (°)
    pub const WIND_DIRECTION: &str = "WD10m";
    /// Surface pressure (Pa)
    pub const PRESSURE: &str = "SP";
    /// Plane-of-array irradiance, when supplied upstream
    pub const POA: &str = "POA";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";

    /// The nine meteorological fields every TMY row carries
    pub const METEOROLOGICAL: [&str; 9] = [
        TEMPERATURE,
        RELATIVE_HUMIDITY,
        GHI,
        DNI,
        DHI,
        INFRARED,
        WIND_SPEED,
        WIND_DIRECTION,
        PRESSURE,
    ];
}

/// Sensor heights of the PVGIS TMY (m)
pub const WIND_SPEED_HEIGHT_M: f64 = 10.0;
pub const TEMPERATURE_HEIGHT_M: f64 = 2.0;
pub const PRESSURE_HEIGHT_M: f64 = 10.0;

/// Column-oriented hourly table indexed by timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmyFrame {
    index_name: String,
    index: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl TmyFrame {
    pub fn new(index_name: impl Into<String>, index: Vec<NaiveDateTime>) -> Self {
        Self {
            index_name: index_name.into(),
            index,
            columns: BTreeMap::new(),
        }
    }

    /// Label of the timestamp index, e.g. `time(UTC)`
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Adds or replaces a column. The column must cover every row.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(YieldError::Schema(format!(
                "column {name} has {} values for {} rows",
                values.len(),
                self.index.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| YieldError::Schema(format!("missing column {name}")))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// A column together with the frame's index
    pub fn series(&self, name: &str) -> Result<HourlySeries> {
        HourlySeries::new(self.index.clone(), self.column(name)?.to_vec())
    }

    /// Whether the coordinate columns carried by the frame equal `(lat, lon)`
    /// on every row. A frame without those columns never matches.
    pub fn coordinates_match(&self, lat: f64, lon: f64) -> bool {
        let matches = |name: &str, expected: f64| {
            self.columns
                .get(name)
                .map(|col| {
                    !col.is_empty() && col.len() == self.index.len() && col.iter().all(|v| *v == expected)
                })
                .unwrap_or(false)
        };
        matches(columns::LAT, lat) && matches(columns::LON, lon)
    }
}

/// Site metadata attached to a fetched frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmyMetadata {
    pub latitude: f64,
    pub longitude: f64,
    /// Timezone label taken from the index name, e.g. `UTC`
    pub timezone: String,
    pub wind_speed_height: f64,
    pub temperature_height: f64,
    pub pressure_height: f64,
}

impl TmyMetadata {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| YieldError::Metadata(format!("unknown timezone {}: {e}", self.timezone)))
    }
}

/// A TMY frame travelling together with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TmyDataset {
    pub frame: TmyFrame,
    pub meta: TmyMetadata,
}

impl TmyDataset {
    /// Attaches the PVGIS sensor heights, the requested coordinates and the
    /// timezone found in the index label.
    pub fn annotate(frame: TmyFrame, lat: f64, lon: f64) -> Result<Self> {
        let timezone = timezone_from_index_name(frame.index_name())?;
        Ok(Self {
            meta: TmyMetadata {
                latitude: lat,
                longitude: lon,
                timezone,
                wind_speed_height: WIND_SPEED_HEIGHT_M,
                temperature_height: TEMPERATURE_HEIGHT_M,
                pressure_height: PRESSURE_HEIGHT_M,
            },
            frame,
        })
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }
}

/// Extracts the token between the first `(` and the following `)`.
///
/// PVGIS names its time column `time(UTC)`; the format is not documented
/// upstream, so anything else is reported rather than guessed at.
pub fn timezone_from_index_name(name: &str) -> Result<String> {
    let missing = || {
        YieldError::Metadata(format!(
            "index label {name:?} carries no parenthesized timezone"
        ))
    };
    let (_, rest) = name.split_once('(').ok_or_else(missing)?;
    let (token, _) = rest.split_once(')').ok_or_else(missing)?;
    let token = token.trim();
    if token.is_empty() {
        return Err(missing());
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::remap_to_year;
    use rstest::rstest;

    fn frame(rows: usize) -> TmyFrame {
        TmyFrame::new("time(UTC)", remap_to_year(rows, Some(2007)).unwrap())
    }

    #[rstest]
    #[case("time(UTC)", "UTC")]
    #[case("time (Europe/Amsterdam)", "Europe/Amsterdam")]
    #[case("(UTC) time", "UTC")]
    fn test_timezone_token(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(timezone_from_index_name(name).unwrap(), expected);
    }

    #[rstest]
    #[case("time")]
    #[case("time(UTC")]
    #[case("time()")]
    fn test_timezone_token_missing(#[case] name: &str) {
        let err = timezone_from_index_name(name).unwrap_err();
        assert!(matches!(err, YieldError::Metadata(_)));
    }

    #[test]
    fn test_annotate_sets_heights_and_location() {
        let dataset = TmyDataset::annotate(frame(3), 52.0, 5.5).unwrap();
        assert_eq!(dataset.meta.timezone, "UTC");
        assert_eq!(dataset.meta.wind_speed_height, 10.0);
        assert_eq!(dataset.meta.temperature_height, 2.0);
        assert_eq!(dataset.meta.pressure_height, 10.0);
        assert_eq!(dataset.meta.latitude, 52.0);
        assert_eq!(dataset.meta.longitude, 5.5);
        assert_eq!(dataset.meta.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_unknown_timezone() {
        let mut dataset = TmyDataset::annotate(frame(1), 0.0, 0.0).unwrap();
        dataset.meta.timezone = "Mars/Olympus".to_string();
        assert!(matches!(dataset.meta.tz(), Err(YieldError::Metadata(_))));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let f = frame(2);
        assert!(matches!(f.column(columns::GHI), Err(YieldError::Schema(_))));
    }

    #[test]
    fn test_short_column_rejected() {
        let mut f = frame(3);
        assert!(f.insert_column(columns::GHI, vec![1.0]).is_err());
        assert!(f.insert_column(columns::GHI, vec![1.0, 2.0, 3.0]).is_ok());
        assert!(f.has_column(columns::GHI));
    }

    #[test]
    fn test_coordinates_match_requires_columns() {
        let mut f = frame(3);
        assert!(!f.coordinates_match(52.0, 5.5));

        f.insert_column(columns::LAT, vec![52.0; 3]).unwrap();
        assert!(!f.coordinates_match(52.0, 5.5));

        f.insert_column(columns::LON, vec![5.5; 3]).unwrap();
        assert!(f.coordinates_match(52.0, 5.5));
        assert!(!f.coordinates_match(52.0, 5.50001));
    }
}
