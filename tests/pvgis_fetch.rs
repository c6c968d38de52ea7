//! PVGIS client and cache behaviour against a mock endpoint.

mod common;

use chrono::{Datelike, Timelike};
use common::{cache_path, mount_tmy, pvgis_config};
use vre_yield::domain::columns;
use vre_yield::weather::pvgis::REFERENCE_YEAR;
use vre_yield::weather::{FileCache, MemoryCache, PvgisClient, TmyCache, TmyRepository, TmySource};
use vre_yield::YieldError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_parses_payload_and_tags_coordinates() {
    let server = MockServer::start().await;
    mount_tmy(&server, 51.98, 5.91, 1).await;

    let client = PvgisClient::new(&pvgis_config(&server)).unwrap();
    let frame = client.fetch(51.98, 5.91).await.unwrap();

    assert_eq!(frame.len(), 8760);
    assert_eq!(frame.index_name(), "time(UTC)");
    assert!(frame.index().iter().all(|t| t.year() == REFERENCE_YEAR));
    let feb_28 = frame.index()[1415];
    assert_eq!((feb_28.month(), feb_28.day(), feb_28.hour()), (2, 28, 23));
    assert_eq!(frame.index()[1416] - feb_28, chrono::Duration::hours(1));
    assert_eq!(frame.index()[0].hour(), 0);
    assert!(frame.coordinates_match(51.98, 5.91));
    for name in columns::METEOROLOGICAL {
        assert!(frame.has_column(name), "missing {name}");
    }
}

#[tokio::test]
async fn same_coordinates_hit_remote_once() {
    let server = MockServer::start().await;
    mount_tmy(&server, 52.1, 5.2, 1).await;

    let client = PvgisClient::new(&pvgis_config(&server)).unwrap();
    let mut repo = TmyRepository::new(client, MemoryCache::new());

    let first = repo.fetch_or_cached(52.1, 5.2).await.unwrap();
    let second = repo.fetch_or_cached(52.1, 5.2).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.meta.timezone, "UTC");
    // expect(1) is verified when the server drops
}

#[tokio::test]
async fn new_coordinates_refetch_and_overwrite() {
    let server = MockServer::start().await;
    mount_tmy(&server, 52.1, 5.2, 2).await;
    mount_tmy(&server, 48.0, 11.0, 1).await;

    let client = PvgisClient::new(&pvgis_config(&server)).unwrap();
    let mut repo = TmyRepository::new(client, MemoryCache::new());

    repo.fetch_or_cached(52.1, 5.2).await.unwrap();
    repo.fetch_or_cached(48.0, 11.0).await.unwrap();
    let record = repo.cache().load().unwrap().unwrap();
    assert_eq!((record.lat, record.lon), (48.0, 11.0));

    repo.fetch_or_cached(52.1, 5.2).await.unwrap();
}

#[tokio::test]
async fn rejected_request_names_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tmy"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Location over the sea. Please, select another location",
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PvgisClient::new(&pvgis_config(&server)).unwrap();
    let mut repo = TmyRepository::new(client, MemoryCache::new());

    let err = repo.fetch_or_cached(10.0, -30.0).await.unwrap_err();
    assert!(matches!(
        err,
        YieldError::Request { lat, lon, status: 400 } if lat == 10.0 && lon == -30.0
    ));
    assert!(err.to_string().contains("lat=10"));
    assert!(repo.cache().load().unwrap().is_none());
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tmy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = PvgisClient::new(&pvgis_config(&server)).unwrap();
    let err = client.fetch(52.0, 5.0).await.unwrap_err();
    assert!(matches!(err, YieldError::Json(_)));
}

#[tokio::test]
async fn file_cache_survives_a_new_process() {
    let server = MockServer::start().await;
    mount_tmy(&server, 51.5, 4.4, 1).await;
    let path = cache_path("survives");

    let client = PvgisClient::new(&pvgis_config(&server)).unwrap();
    let mut repo = TmyRepository::new(client.clone(), FileCache::new(&path));
    let fetched = repo.fetch_or_cached(51.5, 4.4).await.unwrap();

    // a fresh repository over the same file must not go to the network
    let mut reopened = TmyRepository::new(client, FileCache::new(&path));
    let cached = reopened.fetch_or_cached(51.5, 4.4).await.unwrap();
    assert_eq!(fetched, cached);

    std::fs::remove_file(&path).unwrap();
}
