// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the health, metrics and documentation endpoints

use axum::http::StatusCode;
use serde_json::{Value, json};

mod fixtures;
use fixtures::*;

#[tokio::test]
async fn health_reports_upstream() {
    let upstream = wiremock::MockServer::start().await;
    mount_info_responses(&upstream).await;
    let (addr, _token) = start_adapter(&upstream).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Up");
    assert_eq!(body["environment"], "testing");
    assert_eq!(body["api_clients"]["cryptoapis"], "Up");
}

#[tokio::test]
async fn health_degrades_when_upstream_answers_404() {
    let upstream = wiremock::MockServer::start().await;
    let (addr, _token) = start_adapter(&upstream).await;

    let body: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["status"].get("Degraded").is_some(), "{body}");
    assert!(
        body["api_clients"]["cryptoapis"].get("Degraded").is_some(),
        "{body}"
    );
}

#[tokio::test]
async fn health_degrades_when_upstream_is_unreachable() {
    let config = adapter::ServerConfig::for_testing(closed_port_url());
    let (addr, _token) = start_adapter_with(config).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert!(body["status"].get("Degraded").is_some(), "{body}");
    assert!(body["api_clients"]["cryptoapis"].get("Down").is_some(), "{body}");
}

#[tokio::test]
async fn metrics_count_jobs() {
    let upstream = wiremock::MockServer::start().await;
    mount_info_responses(&upstream).await;
    let (addr, _token) = start_adapter(&upstream).await;

    let client = reqwest::Client::new();
    client
        .post(format!("http://{addr}/"))
        .json(&json!({"data": {"coin": "BTC", "endpoint": "height"}}))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = response.text().await.unwrap();
    assert!(text.contains("bc_info_adapter_requests_total"));
    assert!(text.contains(r#"endpoint="height""#));
    assert!(text.contains("bc_info_adapter_upstream_request_duration"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let upstream = wiremock::MockServer::start().await;
    let (addr, _token) = start_adapter(&upstream).await;

    let body: Value = reqwest::get(format!("http://{addr}/api-doc/openapi.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["paths"].get("/").is_some());

    let page = reqwest::get(format!("http://{addr}/swagger-ui"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("swagger-ui"));
}

#[tokio::test]
async fn cancellation_stops_the_server() {
    let upstream = wiremock::MockServer::start().await;
    let (addr, token) = start_adapter(&upstream).await;

    token.cancel();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(reqwest::get(format!("http://{addr}/health")).await.is_err());
}
