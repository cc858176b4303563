// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Subscription registry
//!
//! Routes `EVENT` and `EOSE` frames from every relay to the callbacks of the matching
//! subscription. Callbacks run synchronously while the registry lock is held, so once
//! [`RelayPool::unsubscribe`](crate::pool::RelayPool::unsubscribe) returns no further event is
//! delivered for that ID. Callbacks must not block and must not call back into the registry:
//! spawn a task or send on a channel instead.

use std::collections::hash_map::{Entry, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nostr_wire::{Event, Filter, RelayMessage, RelayUrl, SubscriptionId};
use tokio::sync::Mutex;

use crate::events::SeenEvents;

/// Event callback
pub type OnEvent = Arc<dyn Fn(Event, RelayUrl) + Send + Sync>;
/// End of stored events callback
pub type OnEndOfStream = Arc<dyn Fn(RelayUrl) + Send + Sync>;

/// Subscription callbacks
#[derive(Clone)]
pub struct SubscriptionHandler {
    on_event: OnEvent,
    on_end_of_stream: Option<OnEndOfStream>,
}

impl fmt::Debug for SubscriptionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandler")
            .field("on_end_of_stream", &self.on_end_of_stream.is_some())
            .finish()
    }
}

impl SubscriptionHandler {
    /// New handler
    pub fn new<F>(on_event: F) -> Self
    where
        F: Fn(Event, RelayUrl) + Send + Sync + 'static,
    {
        Self {
            on_event: Arc::new(on_event),
            on_end_of_stream: None,
        }
    }

    /// Callback invoked when a relay sends `EOSE`
    pub fn on_end_of_stream<F>(mut self, on_end_of_stream: F) -> Self
    where
        F: Fn(RelayUrl) + Send + Sync + 'static,
    {
        self.on_end_of_stream = Some(Arc::new(on_end_of_stream));
        self
    }

    /// Drop events whose ID is already in `seen`
    pub fn deduplicate(mut self, seen: SeenEvents) -> Self {
        let on_event: OnEvent = self.on_event;
        self.on_event = Arc::new(move |event: Event, relay_url: RelayUrl| {
            if seen.insert(event.id) {
                on_event(event, relay_url);
            }
        });
        self
    }

    #[inline]
    fn handle_event(&self, event: Event, relay_url: RelayUrl) {
        (self.on_event)(event, relay_url)
    }

    #[inline]
    fn handle_end_of_stream(&self, relay_url: RelayUrl) {
        if let Some(on_end_of_stream) = &self.on_end_of_stream {
            on_end_of_stream(relay_url)
        }
    }
}

/// Registered subscription
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    filter: Filter,
    handler: SubscriptionHandler,
}

impl Subscription {
    /// Subscription ID
    #[inline]
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Subscription filter
    #[inline]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

/// Subscription registry
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    subscriptions: Arc<Mutex<HashMap<SubscriptionId, Subscription>>>,
    counter: Arc<AtomicU64>,
}

impl SubscriptionRegistry {
    /// New empty registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh subscription ID: `<prefix>-<counter>`
    pub fn next_id(&self, prefix: &str) -> SubscriptionId {
        let n: u64 = self.counter.fetch_add(1, Ordering::SeqCst);
        SubscriptionId::new(format!("{prefix}-{n}"))
    }

    /// Register a subscription
    ///
    /// Returns `false` if the ID is already live.
    pub(crate) async fn insert(
        &self,
        id: SubscriptionId,
        filter: Filter,
        handler: SubscriptionHandler,
    ) -> bool {
        let mut subscriptions = self.subscriptions.lock().await;
        match subscriptions.entry(id) {
            Entry::Occupied(..) => false,
            Entry::Vacant(entry) => {
                let id: SubscriptionId = entry.key().clone();
                entry.insert(Subscription {
                    id,
                    filter,
                    handler,
                });
                true
            }
        }
    }

    pub(crate) async fn remove(&self, id: &SubscriptionId) -> Option<Subscription> {
        let mut subscriptions = self.subscriptions.lock().await;
        subscriptions.remove(id)
    }

    pub(crate) async fn clear(&self) {
        let mut subscriptions = self.subscriptions.lock().await;
        subscriptions.clear();
    }

    /// Clear without waiting. Returns `false` if the lock is busy.
    pub(crate) fn try_clear(&self) -> bool {
        match self.subscriptions.try_lock() {
            Ok(mut subscriptions) => {
                subscriptions.clear();
                true
            }
            Err(..) => false,
        }
    }

    /// Check if a subscription is live
    pub async fn contains(&self, id: &SubscriptionId) -> bool {
        let subscriptions = self.subscriptions.lock().await;
        subscriptions.contains_key(id)
    }

    /// Filter of a live subscription
    pub async fn filter(&self, id: &SubscriptionId) -> Option<Filter> {
        let subscriptions = self.subscriptions.lock().await;
        subscriptions.get(id).map(|s| s.filter.clone())
    }

    /// IDs of the live subscriptions
    pub async fn ids(&self) -> Vec<SubscriptionId> {
        let subscriptions = self.subscriptions.lock().await;
        subscriptions.keys().cloned().collect()
    }

    /// Number of live subscriptions
    pub async fn len(&self) -> usize {
        let subscriptions = self.subscriptions.lock().await;
        subscriptions.len()
    }

    /// Check if there are no live subscriptions
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Route a relay message to the matching subscription
    pub(crate) async fn dispatch(&self, relay_url: &RelayUrl, msg: RelayMessage) {
        match msg {
            RelayMessage::Event {
                subscription_id,
                event,
            } => {
                let subscriptions = self.subscriptions.lock().await;
                match subscriptions.get(&subscription_id) {
                    Some(subscription) => subscription.handler.handle_event(*event, relay_url.clone()),
                    None => tracing::trace!(
                        url = %relay_url,
                        id = %subscription_id,
                        "Dropping event for unknown subscription."
                    ),
                }
            }
            RelayMessage::EndOfStoredEvents(subscription_id) => {
                tracing::debug!(url = %relay_url, id = %subscription_id, "Received EOSE.");

                let subscriptions = self.subscriptions.lock().await;
                if let Some(subscription) = subscriptions.get(&subscription_id) {
                    subscription.handler.handle_end_of_stream(relay_url.clone());
                }
            }
            RelayMessage::Closed {
                subscription_id,
                message,
            } => {
                tracing::debug!(
                    url = %relay_url,
                    id = %subscription_id,
                    msg = %message,
                    "Subscription closed by relay."
                );
            }
            RelayMessage::Auth { challenge } => {
                tracing::debug!(
                    url = %relay_url,
                    challenge = %challenge,
                    "Received AUTH challenge, not authenticating."
                );
            }
            RelayMessage::Notice { message } => {
                tracing::warn!(url = %relay_url, msg = %message, "Received NOTICE.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use nostr_wire::{EventId, Kind, PublicKey, Timestamp};

    use super::*;

    fn event(id: u8) -> Event {
        Event {
            id: EventId::from_byte_array([id; 32]),
            pubkey: PublicKey::from_byte_array([7; 32]),
            created_at: Timestamp::from(1_700_000_000),
            kind: Kind::TEXT_NOTE,
            tags: Vec::new(),
            content: String::from("hello"),
            sig: String::new(),
        }
    }

    fn url(s: &str) -> RelayUrl {
        RelayUrl::parse(s).unwrap()
    }

    type Received = Arc<StdMutex<Vec<(EventId, RelayUrl)>>>;

    fn collector() -> (Received, SubscriptionHandler) {
        let received: Received = Arc::new(StdMutex::new(Vec::new()));
        let sink = received.clone();
        let handler = SubscriptionHandler::new(move |event, relay_url| {
            sink.lock().unwrap().push((event.id, relay_url));
        });
        (received, handler)
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_subscription_id() {
        let registry = SubscriptionRegistry::new();
        let relay = url("wss://relay.example.com");

        let (a_received, a_handler) = collector();
        let (b_received, b_handler) = collector();
        assert!(registry.insert(SubscriptionId::new("a"), Filter::new(), a_handler).await);
        assert!(registry.insert(SubscriptionId::new("b"), Filter::new(), b_handler).await);

        registry
            .dispatch(&relay, RelayMessage::event(SubscriptionId::new("a"), event(1)))
            .await;
        registry
            .dispatch(&relay, RelayMessage::event(SubscriptionId::new("b"), event(2)))
            .await;
        registry
            .dispatch(&relay, RelayMessage::event(SubscriptionId::new("c"), event(3)))
            .await;

        let a = a_received.lock().unwrap().clone();
        let b = b_received.lock().unwrap().clone();
        assert_eq!(a, vec![(EventId::from_byte_array([1; 32]), relay.clone())]);
        assert_eq!(b, vec![(EventId::from_byte_array([2; 32]), relay)]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected_until_removed() {
        let registry = SubscriptionRegistry::new();
        let id = SubscriptionId::new("feed");

        let (_, handler) = collector();
        assert!(registry.insert(id.clone(), Filter::new(), handler.clone()).await);
        assert!(!registry.insert(id.clone(), Filter::new(), handler.clone()).await);

        assert!(registry.remove(&id).await.is_some());
        assert!(registry.remove(&id).await.is_none());
        assert!(registry.insert(id, Filter::new(), handler).await);
    }

    #[tokio::test]
    async fn test_no_delivery_after_remove() {
        let registry = SubscriptionRegistry::new();
        let relay = url("wss://relay.example.com");
        let id = SubscriptionId::new("feed");

        let (received, handler) = collector();
        registry.insert(id.clone(), Filter::new(), handler).await;
        registry.remove(&id).await;

        registry
            .dispatch(&relay, RelayMessage::event(id, event(1)))
            .await;
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_end_of_stream_callback() {
        let registry = SubscriptionRegistry::new();
        let relay = url("wss://relay.example.com");
        let id = SubscriptionId::new("feed");

        let eose: Arc<StdMutex<Vec<RelayUrl>>> = Arc::new(StdMutex::new(Vec::new()));
        let sink = eose.clone();
        let handler = SubscriptionHandler::new(|_, _| {})
            .on_end_of_stream(move |relay_url| sink.lock().unwrap().push(relay_url));
        registry.insert(id.clone(), Filter::new(), handler).await;

        registry.dispatch(&relay, RelayMessage::eose(id)).await;
        registry
            .dispatch(&relay, RelayMessage::eose(SubscriptionId::new("unknown")))
            .await;
        registry.dispatch(&relay, RelayMessage::notice("slow down")).await;

        assert_eq!(eose.lock().unwrap().clone(), vec![relay]);
    }

    #[tokio::test]
    async fn test_deduplicate_handler() {
        let registry = SubscriptionRegistry::new();
        let id = SubscriptionId::new("feed");

        let (received, handler) = collector();
        registry
            .insert(id.clone(), Filter::new(), handler.deduplicate(SeenEvents::default()))
            .await;

        let relay_a = url("wss://a.example.com");
        let relay_b = url("wss://b.example.com");
        registry
            .dispatch(&relay_a, RelayMessage::event(id.clone(), event(1)))
            .await;
        registry
            .dispatch(&relay_b, RelayMessage::event(id.clone(), event(1)))
            .await;
        registry
            .dispatch(&relay_b, RelayMessage::event(id, event(2)))
            .await;

        let received = received.lock().unwrap().clone();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].1, relay_a);
    }

    #[test]
    fn test_next_id() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.next_id("fetch").as_str(), "fetch-0");
        assert_eq!(registry.next_id("fetch").as_str(), "fetch-1");
        assert_eq!(registry.clone().next_id("batch").as_str(), "batch-2");
    }
}
