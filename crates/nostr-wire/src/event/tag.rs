// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Tag

use serde::{Deserialize, Serialize};

use crate::{EventId, PublicKey};

/// Tag
///
/// Ordered list of strings: the first one is the tag name, the second one its main value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Vec<String>);

impl Tag {
    /// Parse tag from strings
    pub fn parse<I, S>(tag: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tag.into_iter().map(|s| s.into()).collect())
    }

    /// Compose `["e", <id>]` tag
    pub fn event(event_id: EventId) -> Self {
        Self(vec![String::from("e"), event_id.to_hex()])
    }

    /// Compose `["p", <pubkey>]` tag
    pub fn public_key(public_key: PublicKey) -> Self {
        Self(vec![String::from("p"), public_key.to_hex()])
    }

    /// Tag name
    #[inline]
    pub fn kind(&self) -> Option<&str> {
        self.0.first().map(|s| s.as_str())
    }

    /// Tag main value
    #[inline]
    pub fn content(&self) -> Option<&str> {
        self.0.get(1).map(|s| s.as_str())
    }

    /// Get as slice of strings
    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume and get the inner vector
    #[inline]
    pub fn to_vec(self) -> Vec<String> {
        self.0
    }
}
