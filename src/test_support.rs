//! Synthetic TMY data shared by unit tests.

use std::f64::consts::PI;

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::{json, Map, Value};

use crate::domain::{columns, TmyDataset, TmyFrame, HOURS_PER_YEAR};
use crate::weather::pvgis::parse_tmy;

/// A year of PVGIS-style hourly records whose months come from different
/// source years, like a real TMY.
pub fn pvgis_rows() -> Vec<Map<String, Value>> {
    let start = NaiveDate::from_ymd_opt(2007, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();

    (0..HOURS_PER_YEAR)
        .map(|h| {
            let t = start + Duration::hours(h as i64);
            let year = match t.month() {
                1 => 2008,
                2 => 2012,
                m if m % 2 == 0 => 2011,
                _ => 2007,
            };
            let t = t.with_year(year).unwrap();

            let day = (h / 24) as f64;
            let hour_of_day = (h % 24) as f64;
            let daylight = ((hour_of_day - 6.0) * PI / 12.0).sin().max(0.0);
            let season = 0.6 + 0.4 * (2.0 * PI * (day - 172.0) / 365.0).cos();
            let ghi = 800.0 * daylight * season;

            let row = json!({
                "time(UTC)": t.format("%Y%m%d:%H%M").to_string(),
                "T2m": 10.0 + 8.0 * (2.0 * PI * (day - 200.0) / 365.0).cos(),
                "RH": 70.0,
                "G(h)": ghi,
                "Gb(n)": 0.9 * ghi,
                "Gd(h)": 0.3 * ghi,
                "IR(h)": 300.0,
                "WS10m": 5.0 + 3.0 * (h as f64 * 0.37).sin(),
                "WD10m": 225.0,
                "SP": 101325.0 - 300.0 * (h as f64 * 0.05).cos(),
            });
            match row {
                Value::Object(map) => map,
                _ => unreachable!(),
            }
        })
        .collect()
}

/// The parsed frame of [`pvgis_rows`] tagged with the given coordinates
pub fn synthetic_frame(lat: f64, lon: f64) -> TmyFrame {
    let mut frame = parse_tmy(pvgis_rows()).unwrap();
    frame.insert_column(columns::LAT, vec![lat; frame.len()]).unwrap();
    frame.insert_column(columns::LON, vec![lon; frame.len()]).unwrap();
    frame
}

pub fn synthetic_dataset(lat: f64, lon: f64) -> TmyDataset {
    TmyDataset::annotate(synthetic_frame(lat, lon), lat, lon).unwrap()
}
