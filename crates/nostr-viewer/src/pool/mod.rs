// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay Pool

use std::collections::HashMap;
use std::time::Duration;

use atomic_destructor::AtomicDestructor;
use nostr_wire::{ClientMessage, Filter, RelayUrl, SubscriptionId};

pub mod builder;
mod error;
mod inner;
mod output;

pub use self::builder::RelayPoolBuilder;
pub use self::error::Error;
use self::inner::InnerRelayPool;
pub use self::output::Output;
use crate::registry::{SubscriptionHandler, SubscriptionRegistry};
use crate::relay::Relay;

/// Relay Pool
///
/// Owns the live relay connections and the subscription registry.
/// When the last handle is dropped, every relay is disconnected and the registry is cleared.
#[derive(Debug, Clone)]
pub struct RelayPool {
    inner: AtomicDestructor<InnerRelayPool>,
}

impl Default for RelayPool {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RelayPool {
    /// Construct new default relay pool
    ///
    /// Use [`RelayPool::builder`] to customize it.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// New relay pool builder
    #[inline]
    pub fn builder() -> RelayPoolBuilder {
        RelayPoolBuilder::default()
    }

    #[inline]
    fn from_builder(builder: RelayPoolBuilder) -> Self {
        Self {
            inner: AtomicDestructor::new(InnerRelayPool::from_builder(builder)),
        }
    }

    /// Subscription registry
    #[inline]
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.inner.state.registry
    }

    /// Connect to relays
    ///
    /// Duplicated urls are attempted once and urls already live count as success.
    /// Every other attempt runs concurrently, bounded by `timeout`; the call returns once all of
    /// them settled. Failed relays are reported in [`Output::failed`] and never retried.
    pub async fn connect<I>(&self, urls: I, timeout: Duration) -> Output<()>
    where
        I: IntoIterator<Item = RelayUrl>,
    {
        self.inner
            .connect(urls.into_iter().collect(), timeout)
            .await
    }

    /// Get relays
    pub async fn relays(&self) -> HashMap<RelayUrl, Relay> {
        let relays = self.inner.atomic.relays.read().await;
        relays.clone()
    }

    /// Get relay
    pub async fn relay(&self, url: &RelayUrl) -> Option<Relay> {
        let relays = self.inner.atomic.relays.read().await;
        relays.get(url).cloned()
    }

    /// Get urls of the live relays
    pub async fn relay_urls(&self) -> Vec<RelayUrl> {
        let relays = self.inner.atomic.relays.read().await;
        relays.keys().cloned().collect()
    }

    /// Number of connected relays
    pub async fn connected_count(&self) -> usize {
        let relays = self.inner.atomic.relays.read().await;
        relays.values().filter(|r| r.is_connected()).count()
    }

    /// Send a message to every connected relay
    #[inline]
    pub async fn send_msg(&self, msg: &ClientMessage) -> Output<()> {
        self.inner.send_msg(msg).await
    }

    /// Register a subscription and send `REQ` to the relays connected right now
    ///
    /// Relays connected later don't receive it.
    #[inline]
    pub async fn subscribe(
        &self,
        id: SubscriptionId,
        filter: Filter,
        handler: SubscriptionHandler,
    ) -> Result<Output<SubscriptionId>, Error> {
        self.inner.subscribe(id, filter, handler).await
    }

    /// Remove a subscription and send `CLOSE` to the connected relays
    ///
    /// No frame is sent if the subscription isn't live.
    #[inline]
    pub async fn unsubscribe(&self, id: &SubscriptionId) -> Output<()> {
        self.inner.unsubscribe(id).await
    }

    /// Disconnect and remove every relay, then clear the registry
    ///
    /// The pool can be used again after this call.
    #[inline]
    pub async fn close_all(&self) {
        self.inner.close_all().await
    }
}
