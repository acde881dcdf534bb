// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

use std::net::{SocketAddr, TcpListener};

use adapter::{Server, ServerConfig, ShutdownConfig};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

pub const TEST_API_KEY: &str = "test-api-key";

pub const BTC_DIFFICULTY: f64 = 18_599_593_048_299.49;
pub const BTC_BLOCKS: u64 = 663_913;
pub const ETH_HEIGHT: u64 = 11_565_019;

/// URL of a local port that nothing listens on
pub fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

/// Testing configuration pointed at `upstream`
pub fn testing_config(upstream: &MockServer) -> ServerConfig {
    ServerConfig::for_testing(Url::parse(&upstream.uri()).unwrap())
}

/// Start the adapter pointed at `upstream`
pub async fn start_adapter(upstream: &MockServer) -> (SocketAddr, CancellationToken) {
    start_adapter_with(testing_config(upstream)).await
}

/// Start the adapter with a prepared configuration
pub async fn start_adapter_with(config: ServerConfig) -> (SocketAddr, CancellationToken) {
    Server::new(config, ShutdownConfig::default())
        .expect("Failed to create server")
        .run_for_testing()
        .await
        .expect("Failed to start test server")
}

/// Mount the BTC and ETH mainnet info responses
pub async fn mount_info_responses(upstream: &MockServer) {
    mount_info(upstream, "/v1/bc/btc/mainnet/info", btc_info()).await;
    mount_info(upstream, "/v1/bc/eth/mainnet/info", eth_info()).await;
}

pub async fn mount_info(upstream: &MockServer, info_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(info_path))
        .and(header("X-API-Key", TEST_API_KEY))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(upstream)
        .await;
}

pub fn btc_info() -> Value {
    json!({
        "apiVersion": "1.0",
        "payload": {
            "chain": "main",
            "blocks": BTC_BLOCKS,
            "headers": BTC_BLOCKS,
            "difficulty": BTC_DIFFICULTY,
            "bestBlockHash": "0000000000000000000b3d1e4b2c9e6c",
            "mediantime": 1_609_459_200
        }
    })
}

pub fn eth_info() -> Value {
    json!({
        "apiVersion": "1.0",
        "payload": {
            "chain": "mainnet",
            "height": ETH_HEIGHT,
            "difficulty": "3791631145609618",
            "bestBlockHash": "0x8e1b7d1c9d8a4f1e"
        }
    })
}
