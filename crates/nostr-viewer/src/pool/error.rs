// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::fmt;

use nostr_wire::SubscriptionId;

/// Relay pool error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// A subscription with the same ID is already live
    DuplicateSubscription(SubscriptionId),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSubscription(id) => write!(f, "subscription '{id}' already exists"),
        }
    }
}
