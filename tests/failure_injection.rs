//! Failure injection tests for the forecast endpoint.

use std::time::Duration;

use forecast_api::config::validation::validate_config;
use reqwest::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_every_fifth_forecast_fails_without_upstream_call() {
    let upstream = MockServer::start().await;
    // Six requests, one of which never leaves the process.
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::forecast_body(1)))
        .expect(5)
        .mount(&upstream)
        .await;

    let mut config = common::test_config(&upstream);
    config.output_cache.enabled = false;
    let service = common::start_service(config, common::write_zones(common::default_features())).await;

    let mut statuses = Vec::new();
    for _ in 0..6 {
        statuses.push(service.get("/forecast/WAZ315").await.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::NOT_FOUND,
            StatusCode::OK,
        ]
    );
    assert_eq!(service.diagnostics.requests(), 6);
    assert_eq!(service.diagnostics.failures(), 1);
}

#[tokio::test]
async fn test_disabled_faults_never_inject() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::forecast_body(1)))
        .expect(10)
        .mount(&upstream)
        .await;

    let mut config = common::test_config(&upstream);
    config.output_cache.enabled = false;
    config.faults.enabled = false;
    let service = common::start_service(config, common::write_zones(common::default_features())).await;

    for _ in 0..10 {
        assert_eq!(service.get("/forecast/WAZ315").await.status(), StatusCode::OK);
    }
    assert_eq!(service.diagnostics.failures(), 0);
}

#[tokio::test]
async fn test_transient_upstream_error_is_retried() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::forecast_body(2)))
        .expect(1)
        .mount(&upstream)
        .await;

    let service = common::start_service(
        common::test_config(&upstream),
        common::write_zones(common::default_features()),
    )
    .await;

    let res = service.get("/forecast/WAZ315").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(service.diagnostics.failures(), 0);
}

#[tokio::test]
async fn test_slow_upstream_times_out_as_404() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::forecast_body(1))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&upstream)
        .await;

    let mut config = common::test_config(&upstream);
    config.upstream.request_timeout_secs = 1;
    config.retries.enabled = false;
    let service = common::start_service(config, common::write_zones(common::default_features())).await;

    let res = service.get("/forecast/WAZ315").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(service.diagnostics.failures(), 1);
}

#[tokio::test]
async fn test_hung_upstream_with_retries_degrades_to_404() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::forecast_body(1))
                .set_delay(Duration::from_secs(10)),
        )
        .expect(3)
        .mount(&upstream)
        .await;

    // Shipped retry settings, scaled down: 3 attempts of 1s plus 200ms/400ms backoff.
    let mut config = common::test_config(&upstream);
    config.upstream.request_timeout_secs = 1;
    config.retries = Default::default();
    config.listener.request_timeout_secs = 5;
    assert!(validate_config(&config).is_ok());
    let service = common::start_service(config, common::write_zones(common::default_features())).await;

    let res = service.get("/forecast/WAZ315").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(service.diagnostics.requests(), 1);
    assert_eq!(service.diagnostics.failures(), 1);
}

#[tokio::test]
async fn test_listener_timeout_response_carries_request_id() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/forecast/WAZ315/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::forecast_body(1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&upstream)
        .await;

    // Deliberately outside what validation accepts, to force the listener timeout.
    let mut config = common::test_config(&upstream);
    config.listener.request_timeout_secs = 1;
    config.upstream.request_timeout_secs = 10;
    config.retries.enabled = false;
    assert!(validate_config(&config).is_err());
    let service = common::start_service(config, common::write_zones(common::default_features())).await;

    let res = service
        .client
        .get(service.url("/forecast/WAZ315"))
        .header("x-request-id", "slow-req-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(res.headers()["x-request-id"], "slow-req-1");
}

#[tokio::test]
async fn test_missing_zone_document_fails_soft() {
    let upstream = MockServer::start().await;
    let service = common::start_service(
        common::test_config(&upstream),
        common::write_zones(common::default_features()),
    )
    .await;
    std::fs::remove_file(&service.zones_path).unwrap();

    let res = service.get("/zones").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "[]");

    assert_eq!(service.get("/health").await.status(), StatusCode::SERVICE_UNAVAILABLE);
}
