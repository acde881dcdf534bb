// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain data provider integrations
//!
//! This crate provides implementations of the `ApiClient` trait for the external
//! services the adapter reads blockchain metrics from.
//!
//! # Architecture
//!
//! - **Client Implementations**: [`cryptoapis`] - the CryptoAPIs blockchain info integration
//!
//! # Features
//!
//! - **Single Request Semantics**: every call performs exactly one outbound request, no retries
//! - **Status Preservation**: upstream status codes survive into `ApiError`
//! - **Testing Support**: integration tests use wiremock for HTTP simulation

pub mod cryptoapis;

pub use cryptoapis::*;
