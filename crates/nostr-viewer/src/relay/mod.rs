// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay

use std::time::Duration;

use nostr_wire::{ClientMessage, RelayUrl};

pub mod constants;
mod error;
mod inner;
mod status;

pub use self::error::Error;
use self::inner::InnerRelay;
pub use self::status::RelayStatus;
use crate::shared::SharedState;
use crate::transport::websocket::{FrameStream, TextSink};

/// Relay connection
///
/// Created by [`RelayPool::connect`](crate::pool::RelayPool::connect) and owned by the pool.
/// A relay is never reconnected: once closed, a new one must be created.
#[derive(Debug, Clone)]
pub struct Relay {
    pub(crate) inner: InnerRelay,
}

impl Relay {
    #[inline]
    pub(crate) fn new(url: RelayUrl, state: SharedState) -> Self {
        Self {
            inner: InnerRelay::new(url, state),
        }
    }

    /// Get relay url
    #[inline]
    pub fn url(&self) -> &RelayUrl {
        &self.inner.url
    }

    /// Get status
    #[inline]
    pub fn status(&self) -> RelayStatus {
        self.inner.status()
    }

    /// Check if relay is connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    /// Queue a message for the relay
    ///
    /// Fails with [`Error::NotConnected`] if the relay isn't connected.
    #[inline]
    pub fn send_msg(&self, msg: &ClientMessage) -> Result<(), Error> {
        self.inner.send_msg(msg)
    }

    /// Ask the connection task to close the socket and exit
    #[inline]
    pub fn disconnect(&self) {
        self.inner.disconnect()
    }

    #[inline]
    pub(crate) async fn try_connect(
        &self,
        timeout: Duration,
    ) -> Result<(TextSink, FrameStream), Error> {
        self.inner.try_connect(timeout).await
    }

    /// Run the connection task. The returned sink is still open.
    #[inline]
    pub(crate) async fn run(&self, ws_tx: TextSink, ws_rx: FrameStream) -> TextSink {
        self.inner.run(ws_tx, ws_rx).await
    }

    /// Close the socket, bounded by [`WEBSOCKET_TX_TIMEOUT`](constants::WEBSOCKET_TX_TIMEOUT)
    #[inline]
    pub(crate) async fn close(&self, ws_tx: TextSink) {
        self.inner.close(ws_tx).await
    }

    /// Mark as closed. Must be called with the pool write lock held.
    pub(crate) fn set_closed(&self) {
        if !self.status().is_closed() {
            self.inner.set_status(RelayStatus::Closed, true);
        }
    }

    #[inline]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}
