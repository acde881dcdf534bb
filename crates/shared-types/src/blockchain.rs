// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain symbol table
//!
//! This module provides the type-safe set of blockchains the adapter can query.
//! Symbols arriving in job requests are resolved here; anything outside the table
//! is rejected before an outbound request is ever built.

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{
        RefOr,
        schema::{ObjectBuilder, Schema, Type},
    },
};

/// Supported blockchains, identified by their ticker symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blockchain {
    /// Bitcoin - BTC
    Bitcoin,
    /// Ethereum - ETH
    Ethereum,
    /// Litecoin - LTC
    Litecoin,
    /// Ethereum Classic - ETC
    EthereumClassic,
    /// Bitcoin Cash - BCH
    BitcoinCash,
    /// Dogecoin - DOGE
    Dogecoin,
    /// Dash - DASH
    Dash,
}

/// Error returned when a symbol does not name a supported blockchain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainParseError {
    /// The symbol is empty or whitespace-only
    #[error("blockchain symbol cannot be empty")]
    Empty,
    /// The symbol is not in the supported set
    #[error("unsupported blockchain: {0}")]
    Unsupported(String),
}

impl Blockchain {
    /// Returns the canonical uppercase ticker symbol
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::Ethereum => "ETH",
            Self::Litecoin => "LTC",
            Self::EthereumClassic => "ETC",
            Self::BitcoinCash => "BCH",
            Self::Dogecoin => "DOGE",
            Self::Dash => "DASH",
        }
    }

    /// Returns the path segment used by data providers for this blockchain
    pub const fn vendor_name(self) -> &'static str {
        match self {
            Self::Bitcoin => "btc",
            Self::Ethereum => "eth",
            Self::Litecoin => "ltc",
            Self::EthereumClassic => "etc",
            Self::BitcoinCash => "bch",
            Self::Dogecoin => "doge",
            Self::Dash => "dash",
        }
    }

    /// Returns all supported blockchains
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bitcoin,
            Self::Ethereum,
            Self::Litecoin,
            Self::EthereumClassic,
            Self::BitcoinCash,
            Self::Dogecoin,
            Self::Dash,
        ]
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Blockchain {
    type Err = BlockchainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        if symbol.is_empty() {
            return Err(BlockchainParseError::Empty);
        }

        // Tickers first, then full names as a courtesy
        match symbol.to_uppercase().as_str() {
            "BTC" | "BITCOIN" => Ok(Self::Bitcoin),
            "ETH" | "ETHEREUM" => Ok(Self::Ethereum),
            "LTC" | "LITECOIN" => Ok(Self::Litecoin),
            "ETC" | "ETHEREUM CLASSIC" => Ok(Self::EthereumClassic),
            "BCH" | "BITCOIN CASH" => Ok(Self::BitcoinCash),
            "DOGE" | "DOGECOIN" => Ok(Self::Dogecoin),
            "DASH" => Ok(Self::Dash),
            _ => Err(BlockchainParseError::Unsupported(symbol.to_string())),
        }
    }
}

impl Serialize for Blockchain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}

// Serialized as the ticker, so the schema is a string enum of tickers
impl PartialSchema for Blockchain {
    fn schema() -> RefOr<Schema> {
        RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(Type::String)
                .description(Some("Ticker symbol of a supported blockchain"))
                .enum_values(Some(Self::all().iter().map(|blockchain| blockchain.symbol())))
                .examples(["BTC"])
                .build(),
        ))
    }
}

impl ToSchema for Blockchain {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Blockchain")
    }
}

impl<'de> Deserialize<'de> for Blockchain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let symbol = String::deserialize(deserializer)?;
        Self::from_str(&symbol).map_err(|_| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&symbol),
                &"a supported blockchain symbol (BTC, ETH, LTC, ETC, BCH, DOGE, DASH)",
            )
        })
    }
}
