// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the blockchain info adapter
//!
//! This crate provides the symbol table and metric enumerations that are shared
//! between the upstream client crates and the adapter itself, avoiding circular
//! dependencies.

pub mod blockchain;
pub mod metric;

pub use blockchain::{Blockchain, BlockchainParseError};
pub use metric::{Endpoint, MetricParseError, Network};
