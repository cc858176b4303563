// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Client Options

use std::num::NonZeroUsize;
use std::time::Duration;

use async_wsocket::ConnectionMode;

use crate::events::DEFAULT_SEEN_CAPACITY;
use crate::relay::constants::DEFAULT_CONNECTION_TIMEOUT;

/// Well-known public relays used by [`Client::connect_default`](super::Client::connect_default)
pub const DEFAULT_RELAYS: [&str; 4] = [
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.primal.net",
    "wss://relay.nostr.band",
];

/// Options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub(super) relays: Vec<String>,
    pub(super) connection_mode: ConnectionMode,
    pub(super) connection_timeout: Duration,
    pub(super) fetch_match_grace: Duration,
    pub(super) fetch_eose_grace: Duration,
    pub(super) fetch_timeout: Duration,
    pub(super) batch_timeout: Duration,
    pub(super) follow_list_timeout: Duration,
    pub(super) reaction_window: Duration,
    pub(super) dedup_capacity: NonZeroUsize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            relays: DEFAULT_RELAYS.iter().map(|url| url.to_string()).collect(),
            connection_mode: ConnectionMode::default(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            fetch_match_grace: Duration::from_millis(500),
            fetch_eose_grace: Duration::from_secs(2),
            fetch_timeout: Duration::from_secs(10),
            batch_timeout: Duration::from_secs(3),
            follow_list_timeout: Duration::from_secs(5),
            reaction_window: Duration::from_secs(3),
            dedup_capacity: DEFAULT_SEEN_CAPACITY,
        }
    }
}

impl ClientOptions {
    /// Create new default options
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Relays used by [`Client::connect_default`](super::Client::connect_default) (default: [`DEFAULT_RELAYS`])
    pub fn relays<I, S>(mut self, relays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relays = relays.into_iter().map(|url| url.into()).collect();
        self
    }

    /// Connection mode (default: direct)
    #[inline]
    pub fn connection_mode(mut self, mode: ConnectionMode) -> Self {
        self.connection_mode = mode;
        self
    }

    /// Per-relay connection timeout (default: 5 sec)
    #[inline]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// How long a fetch-by-id subscription stays open after the event was found (default: 500 ms)
    #[inline]
    pub fn fetch_match_grace(mut self, grace: Duration) -> Self {
        self.fetch_match_grace = grace;
        self
    }

    /// How long a fetch-by-id waits for a match after the first `EOSE` (default: 2 sec)
    #[inline]
    pub fn fetch_eose_grace(mut self, grace: Duration) -> Self {
        self.fetch_eose_grace = grace;
        self
    }

    /// Upper bound of a fetch-by-id, for relays that never send `EOSE` (default: 10 sec)
    #[inline]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Default timeout of [`Client::fetch_events`](super::Client::fetch_events) and profile fetches (default: 3 sec)
    #[inline]
    pub fn batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// Follow list wait (default: 5 sec)
    #[inline]
    pub fn follow_list_timeout(mut self, timeout: Duration) -> Self {
        self.follow_list_timeout = timeout;
        self
    }

    /// Reactions collection window (default: 3 sec)
    #[inline]
    pub fn reaction_window(mut self, window: Duration) -> Self {
        self.reaction_window = window;
        self
    }

    /// Capacity of the seen IDs cache used by [`Subscribe::deduplicate`](super::Subscribe::deduplicate)
    #[inline]
    pub fn dedup_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.dedup_capacity = capacity;
        self
    }
}
