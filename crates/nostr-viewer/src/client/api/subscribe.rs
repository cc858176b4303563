// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::future::IntoFuture;

use nostr_wire::{Filter, RelayUrl, SubscriptionId};

use crate::client::{Client, Error};
use crate::events::SeenEvents;
use crate::future::BoxedFuture;
use crate::pool::Output;
use crate::registry::SubscriptionHandler;

/// Subscribe to events
#[must_use = "Does nothing unless you await!"]
pub struct Subscribe<'client> {
    client: &'client Client,
    id: SubscriptionId,
    filter: Filter,
    handler: SubscriptionHandler,
    deduplicate: bool,
}

impl<'client> Subscribe<'client> {
    #[inline]
    pub(crate) fn new(
        client: &'client Client,
        id: SubscriptionId,
        filter: Filter,
        handler: SubscriptionHandler,
    ) -> Self {
        Self {
            client,
            id,
            filter,
            handler,
            deduplicate: false,
        }
    }

    /// Callback invoked each time a relay sends `EOSE` for this subscription
    #[inline]
    pub fn on_end_of_stream<F>(mut self, on_end_of_stream: F) -> Self
    where
        F: Fn(RelayUrl) + Send + Sync + 'static,
    {
        self.handler = self.handler.on_end_of_stream(on_end_of_stream);
        self
    }

    /// Deliver each event ID only once, whatever the number of relays sending it
    #[inline]
    pub fn deduplicate(mut self) -> Self {
        self.deduplicate = true;
        self
    }
}

impl<'client> IntoFuture for Subscribe<'client> {
    type Output = Result<Output<SubscriptionId>, Error>;
    type IntoFuture = BoxedFuture<'client, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let handler: SubscriptionHandler = if self.deduplicate {
                let seen = SeenEvents::new(self.client.opts.dedup_capacity);
                self.handler.deduplicate(seen)
            } else {
                self.handler
            };

            Ok(self
                .client
                .pool
                .subscribe(self.id, self.filter, handler)
                .await?)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_utility::time;
    use nostr_wire::{Event, EventId};
    use tokio::sync::mpsc;

    use super::*;
    use crate::client::ClientOptions;
    use crate::transport::mock::{self, MockTransport};

    #[tokio::test]
    async fn test_deduplicate_across_relays() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let b = mock.add_relay("wss://b.example.com");
        let note = mock::note(1, 2, 100);
        mock.store(&a, note.clone());
        mock.store(&b, note.clone());
        mock.store(&b, mock::note(2, 2, 90));

        let client = Client::builder()
            .websocket_transport(mock.clone())
            .opts(ClientOptions::new())
            .build();
        client.connect([a.as_str(), b.as_str()]).await;

        let (tx, mut rx) = mpsc::unbounded_channel::<(Event, RelayUrl)>();
        let (eose_tx, mut eose_rx) = mpsc::unbounded_channel::<RelayUrl>();
        let output = client
            .subscribe("feed", Filter::new(), move |event, relay_url| {
                let _ = tx.send((event, relay_url));
            })
            .on_end_of_stream(move |relay_url| {
                let _ = eose_tx.send(relay_url);
            })
            .deduplicate()
            .await
            .unwrap();
        assert_eq!(output.success.len(), 2);

        for _ in 0..2 {
            time::timeout(Some(Duration::from_secs(2)), eose_rx.recv())
                .await
                .flatten()
                .unwrap();
        }

        let mut ids: Vec<EventId> = Vec::new();
        while let Ok((event, _)) = rx.try_recv() {
            ids.push(event.id);
        }
        ids.sort();
        assert_eq!(
            ids,
            vec![
                EventId::from_byte_array([1; 32]),
                EventId::from_byte_array([2; 32])
            ]
        );

        // Without deduplication every copy is delivered
        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
        client
            .subscribe("raw", Filter::new().id(note.id), move |event, _| {
                let _ = tx.send(event);
            })
            .await
            .unwrap();
        time::timeout(Some(Duration::from_secs(2)), rx.recv())
            .await
            .flatten()
            .unwrap();
        time::timeout(Some(Duration::from_secs(2)), rx.recv())
            .await
            .flatten()
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_live_id() {
        let mock = MockTransport::new();
        let client = Client::builder().websocket_transport(mock).build();

        client.subscribe("feed", Filter::new(), |_, _| {}).await.unwrap();
        let err = client
            .subscribe("feed", Filter::new(), |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Pool(..)));

        client.unsubscribe(&SubscriptionId::new("feed")).await;
        client.subscribe("feed", Filter::new(), |_, _| {}).await.unwrap();
    }
}
