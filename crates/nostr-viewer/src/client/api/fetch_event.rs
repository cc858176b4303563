// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::future::IntoFuture;
use std::time::Duration;

use async_utility::{task, time};
use nostr_wire::{Event, EventId, Filter, RelayUrl, SubscriptionId};
use tokio::sync::mpsc;

use crate::client::{Client, Error};
use crate::future::BoxedFuture;
use crate::pool::Output;
use crate::registry::SubscriptionHandler;

/// Callback receiving the result of [`EventFetcher::fetch_event`]
///
/// `None` means that no relay has the event.
pub type FetchCallback = Box<dyn FnOnce(Option<Event>) + Send + 'static>;

/// Fetch a single event by ID
///
/// Narrow capability handed to rendering code that needs to resolve event references.
pub trait EventFetcher: Send + Sync {
    /// Fetch the event in background and invoke `callback` once with the result
    fn fetch_event(&self, id: EventId, callback: FetchCallback);
}

impl EventFetcher for Client {
    fn fetch_event(&self, id: EventId, callback: FetchCallback) {
        let client: Client = self.clone();
        task::spawn(async move {
            match client.event_by_id(id).await {
                Ok(event) => callback(event),
                Err(e) => {
                    tracing::error!(id = %id, error = %e, "Impossible to fetch event.");
                    callback(None);
                }
            }
        });
    }
}

enum FetchSignal {
    Found(Box<Event>),
    EndOfStream,
    GraceExpired,
}

/// Fetch event by ID
#[must_use = "Does nothing unless you await!"]
pub struct FetchEventById<'client> {
    client: &'client Client,
    id: EventId,
    timeout: Option<Duration>,
}

impl<'client> FetchEventById<'client> {
    #[inline]
    pub(crate) fn new(client: &'client Client, id: EventId) -> Self {
        Self {
            client,
            id,
            timeout: None,
        }
    }

    /// Overall timeout, for relays that never send `EOSE`
    ///
    /// Default: [`ClientOptions::fetch_timeout`](crate::client::ClientOptions::fetch_timeout).
    #[inline]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn subscription_id(&self) -> SubscriptionId {
        let hex: String = self.id.to_hex();
        self.client
            .pool
            .registry()
            .next_id(&format!("fetch-{}", &hex[..16]))
    }

    async fn exec(self) -> Result<Option<Event>, Error> {
        let client: &Client = self.client;
        let id: EventId = self.id;
        let sub_id: SubscriptionId = self.subscription_id();
        let timeout: Duration = self.timeout.unwrap_or(client.opts.fetch_timeout);

        let (tx, mut rx) = mpsc::unbounded_channel::<FetchSignal>();

        let tx_event = tx.clone();
        let tx_eose = tx.clone();
        let handler = SubscriptionHandler::new(move |event: Event, relay_url: RelayUrl| {
            if event.id == id {
                let _ = tx_event.send(FetchSignal::Found(Box::new(event)));
            } else {
                tracing::warn!(
                    url = %relay_url,
                    expected = %id,
                    received = %event.id,
                    "Relay sent an event with a different ID."
                );
            }
        })
        .on_end_of_stream(move |_| {
            let _ = tx_eose.send(FetchSignal::EndOfStream);
        });

        let filter: Filter = Filter::new().id(id).limit(1);
        let output: Output<SubscriptionId> =
            client.pool.subscribe(sub_id.clone(), filter, handler).await?;

        if output.success.is_empty() {
            client.pool.unsubscribe(&sub_id).await;
            return Ok(None);
        }

        let eose_grace: Duration = client.opts.fetch_eose_grace;
        let result: Option<Event> = time::timeout(Some(timeout), async {
            let mut grace_started: bool = false;

            while let Some(signal) = rx.recv().await {
                match signal {
                    FetchSignal::Found(event) => return Some(*event),
                    FetchSignal::EndOfStream => {
                        if !grace_started {
                            grace_started = true;

                            let tx = tx.clone();
                            task::spawn(async move {
                                time::sleep(eose_grace).await;
                                let _ = tx.send(FetchSignal::GraceExpired);
                            });
                        }
                    }
                    FetchSignal::GraceExpired => return None,
                }
            }

            None
        })
        .await
        .flatten();

        match &result {
            Some(..) => {
                // Leave the subscription open a little longer, then close it in background
                let pool = client.pool.clone();
                let grace: Duration = client.opts.fetch_match_grace;
                task::spawn(async move {
                    time::sleep(grace).await;
                    pool.unsubscribe(&sub_id).await;
                });
            }
            None => {
                tracing::debug!(id = %id, "Event not found.");
                client.pool.unsubscribe(&sub_id).await;
            }
        }

        Ok(result)
    }
}

impl<'client> IntoFuture for FetchEventById<'client> {
    type Output = Result<Option<Event>, Error>;
    type IntoFuture = BoxedFuture<'client, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exec())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nostr_wire::{ClientMessage, RelayMessage};
    use tokio::sync::oneshot;

    use super::*;
    use crate::client::ClientOptions;
    use crate::transport::mock::{self, MockTransport};

    fn client(mock: &MockTransport) -> Client {
        let opts = ClientOptions::new()
            .fetch_match_grace(Duration::from_millis(50))
            .fetch_eose_grace(Duration::from_millis(200))
            .fetch_timeout(Duration::from_secs(2));
        Client::builder()
            .websocket_transport(mock.clone())
            .opts(opts)
            .build()
    }

    async fn wait_for_empty_registry(client: &Client) {
        for _ in 0..200 {
            if client.subscriptions().await.is_empty() {
                return;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        panic!("fetch subscription never removed");
    }

    #[tokio::test]
    async fn test_fetch_found() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let b = mock.add_relay("wss://b.example.com");
        let note = mock::note(1, 2, 100);
        mock.store(&b, note.clone());

        let client = client(&mock);
        client.connect([a.as_str(), b.as_str()]).await;

        let event = client.event_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(event, note);

        // The REQ carries the expected subscription ID and filter
        let received = mock.received(&b);
        match &received[0] {
            ClientMessage::Req {
                subscription_id,
                filter,
            } => {
                assert!(subscription_id.as_str().starts_with(&format!(
                    "fetch-{}-",
                    &note.id.to_hex()[..16]
                )));
                assert_eq!(**filter, Filter::new().id(note.id).limit(1));
            }
            msg => panic!("unexpected message: {msg:?}"),
        }

        wait_for_empty_registry(&client).await;
        mock.wait_for_frames(&b, 2).await;
        assert!(matches!(mock.received(&b)[1], ClientMessage::Close(..)));
    }

    #[tokio::test]
    async fn test_fetch_not_found_after_eose_grace() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let client = client(&mock);
        client.connect([a.as_str()]).await;

        let id = EventId::from_byte_array([9; 32]);
        let event = client.event_by_id(id).await.unwrap();
        assert!(event.is_none());
        assert!(client.subscriptions().await.is_empty());
        mock.wait_for_frames(&a, 2).await;
        assert!(matches!(mock.received(&a)[1], ClientMessage::Close(..)));
    }

    #[tokio::test]
    async fn test_fetch_match_inside_grace_window() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let late = mock.add_relay("wss://late.example.com");
        mock.set_send_eose(&late, false);
        let note = mock::note(5, 2, 100);

        let client = client(&mock);
        client.connect([a.as_str(), late.as_str()]).await;

        let id: EventId = note.id;
        let fetch = tokio::spawn({
            let client = client.clone();
            async move { client.event_by_id(id).await }
        });

        // `a` sends EOSE without the event; `late` answers within the grace window
        mock.wait_for_frames(&late, 1).await;
        let sub_id = match &mock.received(&late)[0] {
            ClientMessage::Req {
                subscription_id, ..
            } => subscription_id.clone(),
            msg => panic!("unexpected message: {msg:?}"),
        };
        time::sleep(Duration::from_millis(50)).await;
        mock.inject(&late, &RelayMessage::event(sub_id, note.clone()).as_json());

        let event = fetch.await.unwrap().unwrap();
        assert_eq!(event, Some(note));
    }

    #[tokio::test]
    async fn test_fetch_ignores_mismatched_id() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        mock.set_send_eose(&a, false);

        let client = client(&mock);
        client.connect([a.as_str()]).await;

        let wanted = EventId::from_byte_array([1; 32]);
        let fetch = tokio::spawn({
            let client = client.clone();
            async move {
                client
                    .event_by_id(wanted)
                    .timeout(Duration::from_millis(300))
                    .await
            }
        });

        mock.wait_for_frames(&a, 1).await;
        let sub_id = match &mock.received(&a)[0] {
            ClientMessage::Req {
                subscription_id, ..
            } => subscription_id.clone(),
            msg => panic!("unexpected message: {msg:?}"),
        };
        mock.inject(
            &a,
            &RelayMessage::event(sub_id, mock::note(2, 2, 100)).as_json(),
        );

        // No EOSE and no match: the overall timeout ends the fetch
        assert_eq!(fetch.await.unwrap().unwrap(), None);
        assert!(client.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_relays() {
        let mock = MockTransport::new();
        let client = client(&mock);

        let event = client
            .event_by_id(EventId::from_byte_array([1; 32]))
            .await
            .unwrap();
        assert!(event.is_none());
        assert!(client.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_event_fetcher_callback() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let note = mock::note(3, 2, 100);
        mock.store(&a, note.clone());

        let client = client(&mock);
        client.connect([a.as_str()]).await;

        let fetcher: Arc<dyn EventFetcher> = Arc::new(client.clone());

        let (tx, rx) = oneshot::channel();
        fetcher.fetch_event(
            note.id,
            Box::new(move |event| {
                let _ = tx.send(event);
            }),
        );

        let event = time::timeout(Some(Duration::from_secs(2)), rx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, Some(note));
    }
}
