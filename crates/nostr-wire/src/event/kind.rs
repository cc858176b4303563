// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Kind

use core::fmt;

use serde::{Deserialize, Serialize};

/// Event [`Kind`]
///
/// <https://github.com/nostr-protocol/nips/blob/master/01.md>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(u16);

impl Kind {
    /// Metadata (NIP01)
    pub const METADATA: Self = Self(0);
    /// Short Text Note (NIP01)
    pub const TEXT_NOTE: Self = Self(1);
    /// Contact List (NIP02)
    pub const CONTACT_LIST: Self = Self(3);
    /// Reaction (NIP25)
    pub const REACTION: Self = Self(7);

    /// Construct from number
    #[inline]
    pub const fn from_u16(kind: u16) -> Self {
        Self(kind)
    }

    /// Get as number
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Check if it's a replaceable kind (`0`, `3` or `10000..20000`)
    pub fn is_replaceable(&self) -> bool {
        matches!(self.0, 0 | 3 | 10_000..=19_999)
    }
}

impl From<u16> for Kind {
    fn from(kind: u16) -> Self {
        Self(kind)
    }
}

impl From<Kind> for u16 {
    fn from(kind: Kind) -> Self {
        kind.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
