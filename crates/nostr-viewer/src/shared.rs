// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::sync::Arc;

use async_wsocket::ConnectionMode;

use crate::registry::SubscriptionRegistry;
use crate::transport::websocket::WebSocketTransport;

/// State shared by the pool and every relay it owns
#[derive(Debug, Clone)]
pub(crate) struct SharedState {
    pub(crate) transport: Arc<dyn WebSocketTransport>,
    pub(crate) connection_mode: ConnectionMode,
    pub(crate) registry: SubscriptionRegistry,
}

impl SharedState {
    pub(crate) fn new(
        transport: Arc<dyn WebSocketTransport>,
        connection_mode: ConnectionMode,
    ) -> Self {
        Self {
            transport,
            connection_mode,
            registry: SubscriptionRegistry::new(),
        }
    }
}
