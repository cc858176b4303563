// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! In-memory scripted relay

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;

use async_utility::{task, time};
use async_wsocket::ConnectionMode;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Sink, SinkExt, StreamExt};
use nostr_wire::{
    ClientMessage, Event, EventId, Kind, PublicKey, RelayMessage, RelayUrl, Tag, Timestamp, Url,
};

use super::error::TransportError;
use super::websocket::{Frame, FrameStream, TextSink, WebSocketTransport};
use crate::future::BoxedFuture;

#[derive(Debug)]
struct MockRelay {
    events: Vec<Event>,
    reachable: bool,
    connect_delay: Option<Duration>,
    send_eose: bool,
    hang_on_close: bool,
    received: Vec<ClientMessage>,
    connections: HashMap<u64, UnboundedSender<Frame>>,
}

impl MockRelay {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            reachable: true,
            connect_delay: None,
            send_eose: true,
            hang_on_close: false,
            received: Vec::new(),
            connections: HashMap::new(),
        }
    }

    /// Stored events matching the filter, newest first, truncated to its limit
    fn query(&self, msg: &ClientMessage) -> Vec<Event> {
        let ClientMessage::Req { filter, .. } = msg else {
            return Vec::new();
        };

        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| filter.match_event(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            events.truncate(limit);
        }
        events
    }
}

/// Transport backed by in-memory relays
///
/// Answers `REQ` with the stored events matching the filter followed by `EOSE`, records every
/// client frame and lets tests inject raw frames or drop connections.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    relays: Arc<Mutex<HashMap<String, MockRelay>>>,
    next_connection: Arc<Mutex<u64>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MockRelay>> {
        self.relays.lock().unwrap()
    }

    fn with_relay<F, T>(&self, url: &RelayUrl, f: F) -> T
    where
        F: FnOnce(&mut MockRelay) -> T,
    {
        let mut relays = self.lock();
        let relay = relays.get_mut(url.as_str()).expect("unknown mock relay");
        f(relay)
    }

    fn register(&self, url: &str, relay: MockRelay) -> RelayUrl {
        let url = RelayUrl::parse(url).unwrap();
        self.lock().insert(url.as_str().to_string(), relay);
        url
    }

    /// Reachable relay
    pub(crate) fn add_relay(&self, url: &str) -> RelayUrl {
        self.register(url, MockRelay::new())
    }

    /// Relay refusing every connection
    pub(crate) fn add_unreachable(&self, url: &str) -> RelayUrl {
        let mut relay = MockRelay::new();
        relay.reachable = false;
        self.register(url, relay)
    }

    /// Relay accepting connections after `delay`
    pub(crate) fn add_slow(&self, url: &str, delay: Duration) -> RelayUrl {
        let mut relay = MockRelay::new();
        relay.connect_delay = Some(delay);
        self.register(url, relay)
    }

    /// Relay whose socket never finishes closing on the client side
    pub(crate) fn add_hanging_close(&self, url: &str) -> RelayUrl {
        let mut relay = MockRelay::new();
        relay.hang_on_close = true;
        self.register(url, relay)
    }

    pub(crate) fn store(&self, url: &RelayUrl, event: Event) {
        self.with_relay(url, |relay| relay.events.push(event));
    }

    pub(crate) fn set_send_eose(&self, url: &RelayUrl, send_eose: bool) {
        self.with_relay(url, |relay| relay.send_eose = send_eose);
    }

    /// Client messages received so far
    pub(crate) fn received(&self, url: &RelayUrl) -> Vec<ClientMessage> {
        self.with_relay(url, |relay| relay.received.clone())
    }

    pub(crate) fn connections(&self, url: &RelayUrl) -> usize {
        self.with_relay(url, |relay| relay.connections.len())
    }

    /// Push a raw frame to every open connection of the relay
    pub(crate) fn inject(&self, url: &RelayUrl, frame: &str) {
        self.with_relay(url, |relay| {
            for tx in relay.connections.values() {
                let _ = tx.unbounded_send(Frame::Text(frame.to_string()));
            }
        });
    }

    /// Close every open connection from the relay side
    pub(crate) fn drop_connections(&self, url: &RelayUrl) {
        self.with_relay(url, |relay| {
            for tx in relay.connections.values() {
                let _ = tx.unbounded_send(Frame::Close(None));
            }
        });
    }

    /// End the inbound streams without a close frame
    pub(crate) fn end_streams(&self, url: &RelayUrl) {
        self.with_relay(url, |relay| {
            for tx in relay.connections.values() {
                tx.close_channel();
            }
        });
    }

    pub(crate) async fn wait_for_frames(&self, url: &RelayUrl, n: usize) {
        self.wait_until(|| self.received(url).len() >= n).await
    }

    pub(crate) async fn wait_for_connections(&self, url: &RelayUrl, n: usize) {
        self.wait_until(|| self.connections(url) == n).await
    }

    async fn wait_until<F>(&self, condition: F)
    where
        F: Fn() -> bool,
    {
        for _ in 0..500 {
            if condition() {
                return;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        panic!("mock relay condition not reached");
    }

    async fn serve(
        self,
        key: String,
        connection: u64,
        mut client_rx: UnboundedReceiver<String>,
        mut relay_tx: UnboundedSender<Frame>,
    ) {
        while let Some(json) = client_rx.next().await {
            let Ok(msg) = ClientMessage::from_json(&json) else {
                continue;
            };

            let (events, send_eose) = {
                let mut relays = self.lock();
                let Some(relay) = relays.get_mut(&key) else {
                    break;
                };
                relay.received.push(msg.clone());
                (relay.query(&msg), relay.send_eose)
            };

            if let ClientMessage::Req {
                subscription_id, ..
            } = msg
            {
                for event in events {
                    let reply = RelayMessage::event(subscription_id.clone(), event);
                    let _ = relay_tx.send(Frame::Text(reply.as_json())).await;
                }

                if send_eose {
                    let reply = RelayMessage::eose(subscription_id);
                    let _ = relay_tx.send(Frame::Text(reply.as_json())).await;
                }
            }
        }

        if let Some(relay) = self.lock().get_mut(&key) {
            relay.connections.remove(&connection);
        }
    }
}

impl WebSocketTransport for MockTransport {
    fn connect<'a>(
        &'a self,
        url: &'a Url,
        _mode: &'a ConnectionMode,
        _timeout: Duration,
    ) -> BoxedFuture<'a, Result<(TextSink, FrameStream), TransportError>> {
        Box::pin(async move {
            let key: String = url.as_str().to_string();

            let (reachable, delay, hang_on_close) = match self.lock().get(&key) {
                Some(relay) => (relay.reachable, relay.connect_delay, relay.hang_on_close),
                None => (false, None, false),
            };

            if let Some(delay) = delay {
                time::sleep(delay).await;
            }

            if !reachable {
                return Err(TransportError::io(
                    io::ErrorKind::ConnectionRefused,
                    format!("connection refused: {url}"),
                ));
            }

            let (client_tx, client_rx) = mpsc::unbounded::<String>();
            let (relay_tx, relay_rx) = mpsc::unbounded::<Frame>();

            let connection: u64 = {
                let mut next = self.next_connection.lock().unwrap();
                *next += 1;
                *next
            };

            if let Some(relay) = self.lock().get_mut(&key) {
                relay.connections.insert(connection, relay_tx.clone());
            }

            task::spawn(self.clone().serve(key, connection, client_rx, relay_tx));

            let sink = client_tx.sink_map_err(TransportError::backend);
            let sink: TextSink = if hang_on_close {
                Box::new(HangingClose(sink))
            } else {
                Box::new(sink)
            };
            let stream: FrameStream = Box::new(relay_rx.map(Ok));
            Ok((sink, stream))
        })
    }
}

/// Sink whose `poll_close` never completes
struct HangingClose<S>(S);

impl<S> Sink<String> for HangingClose<S>
where
    S: Sink<String, Error = TransportError> + Unpin,
{
    type Error = TransportError;

    fn poll_ready(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready_unpin(cx)
    }

    fn start_send(mut self: Pin<&mut Self>, text: String) -> Result<(), Self::Error> {
        self.0.start_send_unpin(text)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_flush_unpin(cx)
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Pending
    }
}

/// Text note with a predictable ID
pub(crate) fn note(id: u8, author: u8, created_at: u64) -> Event {
    build_event(id, author, created_at, Kind::TEXT_NOTE, Vec::new(), "hello")
}

pub(crate) fn build_event(
    id: u8,
    author: u8,
    created_at: u64,
    kind: Kind,
    tags: Vec<Tag>,
    content: &str,
) -> Event {
    Event {
        id: EventId::from_byte_array([id; 32]),
        pubkey: PublicKey::from_byte_array([author; 32]),
        created_at: Timestamp::from(created_at),
        kind,
        tags,
        content: content.to_string(),
        sig: String::new(),
    }
}
