// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::sync::Arc;
use std::time::Duration;

use async_utility::time;
use futures::{SinkExt, StreamExt};
use nostr_wire::message::MessageHandleError;
use nostr_wire::{ClientMessage, RelayMessage, RelayUrl};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::{Mutex, MutexGuard, Notify};

use super::constants::{OUTBOUND_QUEUE_SIZE, WEBSOCKET_TX_TIMEOUT};
use super::status::AtomicRelayStatus;
use super::{Error, RelayStatus};
use crate::shared::SharedState;
use crate::transport::websocket::{Frame, FrameStream, TextSink};

type ClientMessageJson = String;

#[derive(Debug)]
struct RelayChannels {
    nostr: (Sender<ClientMessageJson>, Mutex<Receiver<ClientMessageJson>>),
    terminate: Notify,
}

impl RelayChannels {
    fn new() -> Self {
        let (tx_nostr, rx_nostr) = mpsc::channel(OUTBOUND_QUEUE_SIZE);

        Self {
            nostr: (tx_nostr, Mutex::new(rx_nostr)),
            terminate: Notify::new(),
        }
    }

    fn send_client_msg(&self, msg: &ClientMessage) -> Result<(), Error> {
        self.nostr
            .0
            .try_send(msg.as_json())
            .map_err(|_| Error::CantSendMessageToDispatcher)
    }

    #[inline]
    async fn rx_nostr(&self) -> MutexGuard<'_, Receiver<ClientMessageJson>> {
        self.nostr.1.lock().await
    }

    #[inline]
    fn terminate(&self) {
        self.terminate.notify_one()
    }
}

#[derive(Debug)]
struct AtomicPrivateData {
    status: AtomicRelayStatus,
    channels: RelayChannels,
}

#[derive(Debug, Clone)]
pub(crate) struct InnerRelay {
    pub(super) url: RelayUrl,
    atomic: Arc<AtomicPrivateData>,
    state: SharedState,
}

impl InnerRelay {
    pub(super) fn new(url: RelayUrl, state: SharedState) -> Self {
        Self {
            url,
            atomic: Arc::new(AtomicPrivateData {
                status: AtomicRelayStatus::default(),
                channels: RelayChannels::new(),
            }),
            state,
        }
    }

    #[inline]
    pub(super) fn status(&self) -> RelayStatus {
        self.atomic.status.load()
    }

    pub(super) fn set_status(&self, status: RelayStatus, log: bool) {
        self.atomic.status.set(status);

        if log {
            match status {
                RelayStatus::Connecting => tracing::debug!("Connecting to '{}'", self.url),
                RelayStatus::Connected => tracing::info!("Connected to '{}'", self.url),
                RelayStatus::Closed => tracing::info!("Disconnected from '{}'", self.url),
            }
        }
    }

    #[inline]
    pub(super) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.atomic, &other.atomic)
    }

    pub(super) async fn try_connect(&self, timeout: Duration) -> Result<(TextSink, FrameStream), Error> {
        self.set_status(RelayStatus::Connecting, true);

        let connect = self.state.transport.connect(
            self.url.as_url(),
            &self.state.connection_mode,
            timeout,
        );

        // Bound the attempt even if the transport ignores `timeout`
        tokio::select! {
            res = time::timeout(Some(timeout), connect) => match res {
                Some(Ok((ws_tx, ws_rx))) => {
                    self.set_status(RelayStatus::Connected, true);
                    Ok((ws_tx, ws_rx))
                }
                Some(Err(e)) => {
                    self.set_status(RelayStatus::Closed, false);
                    Err(Error::Transport(e))
                }
                None => {
                    self.set_status(RelayStatus::Closed, false);
                    Err(Error::Timeout)
                }
            },
            _ = self.handle_terminate() => {
                self.set_status(RelayStatus::Closed, false);
                Err(Error::TerminationRequest)
            }
        }
    }

    /// Run the connection until the peer closes it, an error occurs or termination is requested.
    ///
    /// Returns the sink still open: the caller closes it with [`InnerRelay::close`].
    pub(super) async fn run(&self, mut ws_tx: TextSink, ws_rx: FrameStream) -> TextSink {
        let mut rx_nostr = self.atomic.channels.rx_nostr().await;

        tokio::select! {
            res = self.sender_message_handler(&mut ws_tx, &mut rx_nostr) => match res {
                Ok(()) => tracing::trace!(url = %self.url, "Relay sender exited."),
                Err(e) => tracing::error!(url = %self.url, error = %e, "Relay sender exited with error.")
            },
            res = self.receiver_message_handler(ws_rx) => match res {
                Ok(()) => tracing::trace!(url = %self.url, "Relay receiver exited."),
                Err(e) => tracing::error!(url = %self.url, error = %e, "Relay receiver exited with error.")
            },
            _ = self.handle_terminate() => {},
        }

        ws_tx
    }

    pub(super) async fn close(&self, mut ws_tx: TextSink) {
        match close_ws(&mut ws_tx).await {
            Ok(..) => tracing::debug!(url = %self.url, "WebSocket connection closed."),
            Err(e) => tracing::error!(url = %self.url, error = %e, "Can't close WebSocket connection."),
        }
    }

    async fn sender_message_handler(
        &self,
        ws_tx: &mut TextSink,
        rx_nostr: &mut MutexGuard<'_, Receiver<ClientMessageJson>>,
    ) -> Result<(), Error> {
        while let Some(json) = rx_nostr.recv().await {
            let size: usize = json.len();
            tracing::debug!("Sending '{json}' to '{}' (size: {size} bytes)", self.url);

            send_ws_msg(ws_tx, json).await?;
        }

        Ok(())
    }

    async fn receiver_message_handler(&self, mut ws_rx: FrameStream) -> Result<(), Error> {
        while let Some(frame) = ws_rx.next().await {
            match frame? {
                Frame::Text(json) => self.handle_relay_message(&json).await,
                Frame::Binary(size) => {
                    tracing::warn!(url = %self.url, size, "Binary messages aren't supported.");
                }
                Frame::Close(None) => break,
                Frame::Close(Some(reason)) => {
                    tracing::info!(url = %self.url, reason = %reason, "Connection closed by peer.");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_relay_message(&self, msg: &str) {
        tracing::debug!("Received '{msg}' from '{}'", self.url);

        match RelayMessage::from_json(msg) {
            Ok(message) => self.state.registry.dispatch(&self.url, message).await,
            Err(MessageHandleError::UnknownMessageType(ty)) => {
                tracing::trace!(url = %self.url, ty = %ty, "Ignoring unknown message type.");
            }
            Err(e) => {
                tracing::error!(url = %self.url, msg = %msg, error = %e, "Impossible to handle relay message.");
            }
        }
    }

    #[inline]
    async fn handle_terminate(&self) {
        self.atomic.channels.terminate.notified().await;
    }

    pub(super) fn send_msg(&self, msg: &ClientMessage) -> Result<(), Error> {
        if !self.status().is_connected() {
            return Err(Error::NotConnected);
        }

        self.atomic.channels.send_client_msg(msg)
    }

    #[inline]
    pub(super) fn disconnect(&self) {
        self.atomic.channels.terminate();
    }
}

/// Send WebSocket message with timeout set to [WEBSOCKET_TX_TIMEOUT].
async fn send_ws_msg(tx: &mut TextSink, json: String) -> Result<(), Error> {
    match time::timeout(Some(WEBSOCKET_TX_TIMEOUT), tx.send(json)).await {
        Some(res) => Ok(res?),
        None => Err(Error::Timeout),
    }
}

/// Close WebSocket with timeout set to [WEBSOCKET_TX_TIMEOUT].
async fn close_ws(tx: &mut TextSink) -> Result<(), Error> {
    match time::timeout(Some(WEBSOCKET_TX_TIMEOUT), tx.close()).await {
        Some(res) => Ok(res?),
        None => Err(Error::Timeout),
    }
}
