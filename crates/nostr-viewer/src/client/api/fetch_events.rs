// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::collections::HashSet;
use std::future::IntoFuture;
use std::time::Duration;

use async_utility::time;
use nostr_wire::{Event, Filter, RelayUrl, SubscriptionId};
use tokio::sync::mpsc;

use crate::client::{Client, Error};
use crate::events::Events;
use crate::future::BoxedFuture;
use crate::pool::Output;
use crate::registry::SubscriptionHandler;

/// When to stop collecting events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReqExitPolicy {
    /// Exit once every relay that received the `REQ` sent `EOSE`, or on timeout
    #[default]
    ExitOnEOSE,
    /// Keep collecting until the timeout elapses
    WaitForTimeout,
}

enum BatchSignal {
    Event(Box<Event>),
    EndOfStream(RelayUrl),
}

/// Fetch events
#[must_use = "Does nothing unless you await!"]
pub struct FetchEvents<'client> {
    client: &'client Client,
    filter: Filter,
    timeout: Option<Duration>,
    policy: ReqExitPolicy,
}

impl<'client> FetchEvents<'client> {
    #[inline]
    pub(crate) fn new(client: &'client Client, filter: Filter) -> Self {
        Self {
            client,
            filter,
            timeout: None,
            policy: ReqExitPolicy::default(),
        }
    }

    /// Set a timeout
    ///
    /// Default: [`ClientOptions::batch_timeout`](crate::client::ClientOptions::batch_timeout).
    #[inline]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set request exit policy (default: [`ReqExitPolicy::ExitOnEOSE`]).
    #[inline]
    pub fn policy(mut self, policy: ReqExitPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn exec(self) -> Result<Events, Error> {
        let client: &Client = self.client;
        let timeout: Duration = self.timeout.unwrap_or(client.opts.batch_timeout);
        let sub_id: SubscriptionId = client.pool.registry().next_id("batch");

        let (tx, mut rx) = mpsc::unbounded_channel::<BatchSignal>();

        let tx_eose = tx.clone();
        let handler = SubscriptionHandler::new(move |event: Event, _| {
            let _ = tx.send(BatchSignal::Event(Box::new(event)));
        })
        .on_end_of_stream(move |relay_url: RelayUrl| {
            let _ = tx_eose.send(BatchSignal::EndOfStream(relay_url));
        });

        let output: Output<SubscriptionId> = client
            .pool
            .subscribe(sub_id.clone(), self.filter, handler)
            .await?;

        let mut events: Events = Events::new();

        if !output.success.is_empty() {
            let mut pending: HashSet<RelayUrl> = output.success;
            let policy: ReqExitPolicy = self.policy;

            let collect = async {
                while let Some(signal) = rx.recv().await {
                    match signal {
                        BatchSignal::Event(event) => {
                            events.insert(*event);
                        }
                        BatchSignal::EndOfStream(relay_url) => {
                            pending.remove(&relay_url);

                            if policy == ReqExitPolicy::ExitOnEOSE && pending.is_empty() {
                                break;
                            }
                        }
                    }
                }
            };

            if time::timeout(Some(timeout), collect).await.is_none() {
                tracing::debug!(id = %sub_id, "Stopped collecting events: timeout.");
            }
        }

        client.pool.unsubscribe(&sub_id).await;

        Ok(events)
    }
}

impl<'client> IntoFuture for FetchEvents<'client> {
    type Output = Result<Events, Error>;
    type IntoFuture = BoxedFuture<'client, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exec())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use nostr_wire::{EventId, Kind, PublicKey};

    use super::*;
    use crate::transport::mock::{self, MockTransport};

    fn client(mock: &MockTransport) -> Client {
        Client::builder().websocket_transport(mock.clone()).build()
    }

    #[tokio::test]
    async fn test_fetch_events_dedup_until_eose() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let b = mock.add_relay("wss://b.example.com");
        mock.store(&a, mock::note(1, 2, 100));
        mock.store(&a, mock::note(2, 2, 200));
        mock.store(&b, mock::note(2, 2, 200));
        mock.store(&b, mock::note(3, 4, 300));

        let client = client(&mock);
        client.connect([a.as_str(), b.as_str()]).await;

        let start = Instant::now();
        let events = client
            .fetch_events(Filter::new().author(PublicKey::from_byte_array([2; 32])))
            .timeout(Duration::from_secs(5))
            .await
            .unwrap();

        // Returned on EOSE, well before the timeout
        assert!(start.elapsed() < Duration::from_secs(2));
        let ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec![
                EventId::from_byte_array([2; 32]),
                EventId::from_byte_array([1; 32])
            ]
        );
        assert!(client.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_events_timeout_without_eose() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let silent = mock.add_relay("wss://silent.example.com");
        mock.set_send_eose(&silent, false);
        mock.store(&a, mock::note(1, 2, 100));
        mock.store(&silent, mock::note(2, 2, 100));

        let client = client(&mock);
        client.connect([a.as_str(), silent.as_str()]).await;

        let events = client
            .fetch_events(Filter::new().kind(Kind::TEXT_NOTE))
            .timeout(Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
        assert!(client.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_events_wait_for_timeout() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let client = client(&mock);
        client.connect([a.as_str()]).await;

        let start = Instant::now();
        let events = client
            .fetch_events(Filter::new())
            .timeout(Duration::from_millis(200))
            .policy(ReqExitPolicy::WaitForTimeout)
            .await
            .unwrap();
        assert!(events.is_empty());
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_fetch_events_no_relays() {
        let mock = MockTransport::new();
        let client = client(&mock);

        let events = client.fetch_events(Filter::new()).await.unwrap();
        assert!(events.is_empty());
        assert!(client.subscriptions().await.is_empty());
    }
}
