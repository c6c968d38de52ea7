//! PVGIS typical-meteorological-year client
//!
//! Fetches the hourly TMY of the JRC PVGIS non-interactive API and turns it
//! into a validated [`TmyFrame`] indexed on a single reference year.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDateTime};
use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::PvgisConfig;
use crate::domain::{columns, TmyFrame, HOURS_PER_YEAR};
use crate::error::{Result, YieldError};

/// Timestamp layout documented for the `time(UTC)` field
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d:%H%M%S";

/// Shorter layout PVGIS actually emits
pub const TIMESTAMP_FORMAT_SHORT: &str = "%Y%m%d:%H%M";

/// Non-leap year every TMY row is re-dated onto. The months of a TMY come
/// from different source years, any of which may be a leap year.
pub const REFERENCE_YEAR: i32 = 2007;

/// Anything able to deliver the raw TMY frame for a coordinate pair
#[async_trait]
pub trait TmySource: Send + Sync {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<TmyFrame>;
}

/// HTTP client for the PVGIS `tmy` endpoint
#[derive(Clone)]
pub struct PvgisClient {
    client: Client,
    base_url: String,
}

impl PvgisClient {
    pub fn new(config: &PvgisConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    fn tmy_url(&self) -> String {
        format!("{}/tmy", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TmySource for PvgisClient {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<TmyFrame> {
        let url = self.tmy_url();
        info!(lat, lon, "fetching TMY from PVGIS");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("outputformat", "json".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YieldError::Request {
                lat,
                lon,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: TmyResponse = serde_json::from_str(&body)?;
        let mut frame = parse_tmy(payload.outputs.tmy_hourly)?;

        frame.insert_column(columns::LAT, vec![lat; frame.len()])?;
        frame.insert_column(columns::LON, vec![lon; frame.len()])?;

        info!(lat, lon, rows = frame.len(), "TMY fetched");
        Ok(frame)
    }
}

#[derive(Debug, Deserialize)]
struct TmyResponse {
    outputs: TmyOutputs,
}

#[derive(Debug, Deserialize)]
struct TmyOutputs {
    tmy_hourly: Vec<Map<String, Value>>,
}

/// Parses one `time(UTC)` value.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT_SHORT))
        .map_err(|e| YieldError::Timestamp(format!("{raw:?}: {e}")))
}

/// Builds a frame from the `tmy_hourly` records.
///
/// Every row is re-dated onto [`REFERENCE_YEAR`], then the index must form
/// exactly [`HOURS_PER_YEAR`] consecutive hours.
pub(crate) fn parse_tmy(rows: Vec<Map<String, Value>>) -> Result<TmyFrame> {
    let index_name = rows
        .first()
        .and_then(|row| row.keys().find(|k| k.starts_with("time")).cloned())
        .ok_or_else(|| YieldError::Schema("TMY payload has no time field".to_string()))?;

    let mut index = Vec::with_capacity(rows.len());
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); columns::METEOROLOGICAL.len()];

    for (i, row) in rows.iter().enumerate() {
        let raw = row
            .get(&index_name)
            .and_then(Value::as_str)
            .ok_or_else(|| YieldError::Schema(format!("row {i} has no {index_name} value")))?;
        index.push(parse_timestamp(raw)?);

        for (name, column) in columns::METEOROLOGICAL.iter().zip(values.iter_mut()) {
            let value = row
                .get(*name)
                .and_then(Value::as_f64)
                .ok_or_else(|| YieldError::Schema(format!("row {i} has no numeric {name}")))?;
            column.push(value);
        }
    }

    let index = normalize_year(index)?;
    validate_hourly(&index)?;
    debug!(index_name = %index_name, rows = index.len(), "parsed TMY rows");

    let mut frame = TmyFrame::new(index_name, index);
    for (name, column) in columns::METEOROLOGICAL.iter().zip(values) {
        frame.insert_column(*name, column)?;
    }
    Ok(frame)
}

/// Moves every timestamp onto [`REFERENCE_YEAR`]. A 29 February row has no
/// place there and is rejected.
fn normalize_year(index: Vec<NaiveDateTime>) -> Result<Vec<NaiveDateTime>> {
    index
        .into_iter()
        .map(|t| {
            t.with_year(REFERENCE_YEAR).ok_or_else(|| {
                YieldError::Schema(format!(
                    "{t} cannot be moved to reference year {REFERENCE_YEAR}"
                ))
            })
        })
        .collect()
}

fn validate_hourly(index: &[NaiveDateTime]) -> Result<()> {
    if index.len() != HOURS_PER_YEAR {
        return Err(YieldError::Schema(format!(
            "expected {HOURS_PER_YEAR} hourly rows, got {}",
            index.len()
        )));
    }
    if let Some((pos, (a, b))) = index
        .iter()
        .tuple_windows()
        .find_position(|(a, b)| **b - **a != Duration::hours(1))
    {
        return Err(YieldError::Schema(format!(
            "row {} ({b}) does not follow {a} by one hour",
            pos + 1
        )));
    }
    Ok(())
}
