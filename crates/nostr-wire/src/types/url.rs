// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay URL

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use url::{ParseError, Url};

/// Relay URL error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Url error
    Url(ParseError),
    /// Scheme other than `ws` or `wss`
    UnsupportedScheme(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(e) => write!(f, "Url: {e}"),
            Self::UnsupportedScheme(s) => write!(f, "Unsupported scheme: {s}"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Url(e)
    }
}

/// Relay URL
///
/// Only `ws://` and `wss://` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayUrl(Url);

impl RelayUrl {
    /// Parse relay URL
    pub fn parse<S>(url: S) -> Result<Self, Error>
    where
        S: AsRef<str>,
    {
        let url: Url = Url::parse(url.as_ref().trim())?;

        match url.scheme() {
            "ws" | "wss" => Ok(Self(url)),
            scheme => Err(Error::UnsupportedScheme(scheme.to_string())),
        }
    }

    /// Get as [`Url`]
    #[inline]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Get as `&str`
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check if the connection is encrypted
    #[inline]
    pub fn is_secure(&self) -> bool {
        self.0.scheme() == "wss"
    }
}

impl FromStr for RelayUrl {
    type Err = Error;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        Self::parse(url)
    }
}

impl TryFrom<Url> for RelayUrl {
    type Error = Error;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        Self::parse(url.as_str())
    }
}

impl fmt::Display for RelayUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RelayUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelayUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let url: String = String::deserialize(deserializer)?;
        Self::parse(url).map_err(serde::de::Error::custom)
    }
}
