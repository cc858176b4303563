// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Constants

use std::time::Duration;

/// Default per-relay connection timeout
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) const WEBSOCKET_TX_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the per-relay outbound queue
pub(super) const OUTBOUND_QUEUE_SIZE: usize = 1024;
