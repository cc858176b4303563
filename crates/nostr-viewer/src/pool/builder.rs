// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay Pool builder

use std::sync::Arc;

use async_wsocket::ConnectionMode;

use super::RelayPool;
use crate::transport::websocket::{DefaultWebsocketTransport, WebSocketTransport};

/// Relay Pool builder
#[derive(Debug, Clone)]
pub struct RelayPoolBuilder {
    /// WebSocket transport
    pub websocket_transport: Arc<dyn WebSocketTransport>,
    /// Connection mode (direct or through a proxy)
    pub connection_mode: ConnectionMode,
}

impl Default for RelayPoolBuilder {
    fn default() -> Self {
        Self {
            websocket_transport: Arc::new(DefaultWebsocketTransport),
            connection_mode: ConnectionMode::default(),
        }
    }
}

impl RelayPoolBuilder {
    /// New default builder
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a WebSocket transport
    #[inline]
    pub fn websocket_transport<T>(mut self, transport: T) -> Self
    where
        T: WebSocketTransport + 'static,
    {
        self.websocket_transport = Arc::new(transport);
        self
    }

    /// Set connection mode
    #[inline]
    pub fn connection_mode(mut self, mode: ConnectionMode) -> Self {
        self.connection_mode = mode;
        self
    }

    /// Build relay pool
    #[inline]
    pub fn build(self) -> RelayPool {
        RelayPool::from_builder(self)
    }
}
