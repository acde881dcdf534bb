// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Test fixtures for adapter integration tests
//!
//! A wiremock upstream shaped like the CryptoAPIs info endpoint and a helper
//! that starts the adapter against it.

pub mod upstream;

pub use upstream::*;
