// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! CryptoAPIs test fixtures
//!
//! Provides per-blockchain mock responses for the info endpoint.

use std::net::TcpListener;

use serde_json::{Value, json};
use shared_types::{Blockchain, Network};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

pub const TEST_API_KEY: &str = "test-api-key";

/// URL of a local port that nothing listens on
pub fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

/// Mocks for the CryptoAPIs info endpoint
#[derive(Debug)]
pub struct CryptoApisFixture;

impl CryptoApisFixture {
    /// Path of the info endpoint for a blockchain and network
    pub fn info_path(blockchain: Blockchain, network: Network) -> String {
        format!("/v1/bc/{}/{}/info", blockchain.vendor_name(), network)
    }

    /// Mount a successful info response for every supported blockchain on mainnet
    pub async fn setup_all_blockchains_mocks(mock_server: &MockServer) {
        for &blockchain in Blockchain::all() {
            Self::setup_info_mock(mock_server, blockchain, Network::Mainnet).await;
        }
    }

    /// Mount a successful info response for one blockchain
    pub async fn setup_info_mock(mock_server: &MockServer, blockchain: Blockchain, network: Network) {
        Mock::given(method("GET"))
            .and(path(Self::info_path(blockchain, network)))
            .and(header("X-API-Key", TEST_API_KEY))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(Self::info_response(blockchain)),
            )
            .mount(mock_server)
            .await;
    }

    /// Info payload shaped like the provider's, per blockchain family
    pub fn info_response(blockchain: Blockchain) -> Value {
        match blockchain {
            Blockchain::Ethereum | Blockchain::EthereumClassic => json!({
                "payload": {
                    "chain": "mainnet",
                    "height": 11_565_019,
                    "difficulty": "3791631145609618",
                    "bestBlockHash": "0x8e1b7d1c9d8a4f1e",
                    "txs_count": 943_000_000,
                    "currency": blockchain.symbol()
                }
            }),
            _ => json!({
                "payload": {
                    "chain": "main",
                    "blocks": 663_913,
                    "headers": 663_913,
                    "difficulty": 18_599_593_048_299.49,
                    "bestBlockHash": "0000000000000000000b3d1e4b2c9e6c",
                    "mediantime": 1_609_459_200,
                    "currency": blockchain.symbol()
                }
            }),
        }
    }

    /// Error body in the provider's format
    pub fn error_response(message: &str) -> Value {
        json!({
            "meta": {
                "error": {
                    "code": 4,
                    "message": message
                }
            }
        })
    }
}
