//! PVGIS payloads and a mock endpoint shared by the integration tests.

use std::f64::consts::PI;
use std::path::PathBuf;

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::{json, Value};
use vre_yield::config::PvgisConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `tmy` response body covering one year, months drawn from mixed years.
pub fn tmy_payload(lat: f64, lon: f64) -> Value {
    let start = NaiveDate::from_ymd_opt(2005, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();

    let hourly: Vec<Value> = (0..8760)
        .map(|h| {
            let t = start + Duration::hours(h);
            // January from a leap year, as PVGIS often picks
            let year = if t.month() == 1 || t.month() % 3 == 0 { 2016 } else { 2005 };
            let t = t.with_year(year).unwrap();

            let hour_of_day = (h % 24) as f64;
            let ghi = (700.0 * ((hour_of_day - 6.0) * PI / 12.0).sin()).max(0.0);
            json!({
                "time(UTC)": t.format("%Y%m%d:%H%M").to_string(),
                "T2m": 9.5,
                "RH": 80.0,
                "G(h)": ghi,
                "Gb(n)": 0.8 * ghi,
                "Gd(h)": 0.35 * ghi,
                "IR(h)": 310.0,
                "WS10m": 4.0 + 4.0 * ((h as f64) * 0.11).sin().abs(),
                "WD10m": 240.0,
                "SP": 101_000.0,
            })
        })
        .collect();

    json!({
        "inputs": { "location": { "latitude": lat, "longitude": lon, "elevation": 12.0 } },
        "outputs": { "tmy_hourly": hourly },
        "meta": {}
    })
}

/// Mounts a `GET /api/tmy` mock for the coordinates, expecting `calls` hits.
pub async fn mount_tmy(server: &MockServer, lat: f64, lon: f64, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/tmy"))
        .and(query_param("lat", lat.to_string()))
        .and(query_param("lon", lon.to_string()))
        .and(query_param("outputformat", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tmy_payload(lat, lon)))
        .expect(calls)
        .mount(server)
        .await;
}

pub fn pvgis_config(server: &MockServer) -> PvgisConfig {
    PvgisConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_seconds: Some(10),
    }
}

/// Per-test cache file location, removed up front.
pub fn cache_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("vre-yield-it-{}", std::process::id()))
        .join(format!("{name}.bin"));
    let _ = std::fs::remove_file(&path);
    path
}
