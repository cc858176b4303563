// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay Pool

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_utility::task;
use atomic_destructor::AtomicDestroyer;
use futures::future;
use nostr_wire::{ClientMessage, Filter, RelayUrl, SubscriptionId};
use tokio::sync::RwLock;

use super::{Error, Output, RelayPoolBuilder};
use crate::registry::SubscriptionHandler;
use crate::relay::Relay;
use crate::shared::SharedState;
use crate::transport::websocket::{FrameStream, TextSink};

pub(super) type Relays = HashMap<RelayUrl, Relay>;

#[derive(Debug)]
pub(super) struct AtomicPrivateData {
    pub(super) relays: RwLock<Relays>,
}

#[derive(Debug, Clone)]
pub(crate) struct InnerRelayPool {
    pub(super) state: SharedState,
    pub(super) atomic: Arc<AtomicPrivateData>,
}

impl AtomicDestroyer for InnerRelayPool {
    fn on_destroy(&self) {
        if self.try_close_all() {
            return;
        }

        // Some lock is busy: finish the teardown in background
        let pool = self.clone();
        task::spawn(async move {
            pool.close_all().await;
        });
    }
}

impl InnerRelayPool {
    pub(super) fn from_builder(builder: RelayPoolBuilder) -> Self {
        Self {
            state: SharedState::new(builder.websocket_transport, builder.connection_mode),
            atomic: Arc::new(AtomicPrivateData {
                relays: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub(super) async fn connect(&self, urls: Vec<RelayUrl>, timeout: Duration) -> Output<()> {
        let mut output: Output<()> = Output::new(());
        let mut pending: Vec<Relay> = Vec::with_capacity(urls.len());

        {
            let relays = self.atomic.relays.read().await;
            let mut seen: HashSet<RelayUrl> = HashSet::with_capacity(urls.len());

            for url in urls {
                if !seen.insert(url.clone()) {
                    continue;
                }

                if relays.contains_key(&url) {
                    output.success.insert(url);
                } else {
                    pending.push(Relay::new(url, self.state.clone()));
                }
            }
        }

        // Every attempt runs concurrently, a slow relay delays only the return of this call
        let results = future::join_all(pending.iter().map(|relay| relay.try_connect(timeout))).await;

        let mut relays = self.atomic.relays.write().await;

        for (relay, result) in pending.into_iter().zip(results) {
            let url: RelayUrl = relay.url().clone();

            match result {
                Ok((ws_tx, ws_rx)) => {
                    if relays.contains_key(&url) {
                        // A concurrent `connect` already added it: keep that one
                        relay.set_closed();
                    } else {
                        relays.insert(url.clone(), relay.clone());
                        self.spawn_connection_task(relay, ws_tx, ws_rx);
                    }

                    output.success.insert(url);
                }
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Connection failed.");
                    output.failed.insert(url, e.to_string());
                }
            }
        }

        output
    }

    fn spawn_connection_task(&self, relay: Relay, ws_tx: TextSink, ws_rx: FrameStream) {
        let pool = self.clone();
        task::spawn(async move {
            let ws_tx: TextSink = relay.run(ws_tx, ws_rx).await;

            // Leave the live set before the socket close, which may take until its timeout
            {
                let mut relays = pool.atomic.relays.write().await;

                relay.set_closed();

                // Another relay with the same url may have been added in the meantime
                if relays
                    .get(relay.url())
                    .is_some_and(|current| current.ptr_eq(&relay))
                {
                    relays.remove(relay.url());
                }
            }

            relay.close(ws_tx).await;
        });
    }

    pub(super) async fn send_msg(&self, msg: &ClientMessage) -> Output<()> {
        let relays = self.atomic.relays.read().await;
        let mut output: Output<()> = Output::new(());

        for (url, relay) in relays.iter().filter(|(_, relay)| relay.is_connected()) {
            match relay.send_msg(msg) {
                Ok(()) => {
                    output.success.insert(url.clone());
                }
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Can't send message to relay.");
                    output.failed.insert(url.clone(), e.to_string());
                }
            }
        }

        output
    }

    pub(super) async fn subscribe(
        &self,
        id: SubscriptionId,
        filter: Filter,
        handler: SubscriptionHandler,
    ) -> Result<Output<SubscriptionId>, Error> {
        if !self
            .state
            .registry
            .insert(id.clone(), filter.clone(), handler)
            .await
        {
            return Err(Error::DuplicateSubscription(id));
        }

        let msg: ClientMessage = ClientMessage::req(id.clone(), filter);
        let output: Output<()> = self.send_msg(&msg).await;

        if output.success.is_empty() {
            tracing::debug!(id = %id, "Subscription not sent to any relay.");
        }

        Ok(output.map(|()| id))
    }

    pub(super) async fn unsubscribe(&self, id: &SubscriptionId) -> Output<()> {
        if self.state.registry.remove(id).await.is_none() {
            return Output::new(());
        }

        let msg: ClientMessage = ClientMessage::close(id.clone());
        self.send_msg(&msg).await
    }

    pub(super) async fn close_all(&self) {
        {
            let mut relays = self.atomic.relays.write().await;
            close_relays(&mut relays);
        }

        self.state.registry.clear().await;

        tracing::debug!("Relay pool closed.");
    }

    fn try_close_all(&self) -> bool {
        if !self.state.registry.try_clear() {
            return false;
        }

        match self.atomic.relays.try_write() {
            Ok(mut relays) => {
                close_relays(&mut relays);
                true
            }
            Err(..) => false,
        }
    }
}

fn close_relays(relays: &mut Relays) {
    for relay in relays.values() {
        relay.set_closed();
        relay.disconnect();
    }

    relays.clear();
}
