// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! WebSocket transport
//!
//! Nostr relays speak JSON over text frames, so a connection is handed to the relay task as a
//! sink of outbound texts and a stream of inbound [`Frame`]s.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_wsocket::{ConnectionMode, Message, WebSocket};
use futures::{future, Sink, SinkExt, Stream, StreamExt, TryStreamExt};
use nostr_wire::Url;

use super::error::TransportError;
use crate::future::BoxedFuture;

/// Outbound text frames
pub type TextSink = Box<dyn Sink<String, Error = TransportError> + Send + Unpin>;
/// Inbound frames
pub type FrameStream = Box<dyn Stream<Item = Result<Frame, TransportError>> + Send + Unpin>;

/// Frame received from a relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Text frame
    Text(String),
    /// Binary frame (payload size). Not part of the protocol.
    Binary(usize),
    /// Close frame, with the code and reason sent by the peer
    Close(Option<String>),
}

impl Frame {
    fn from_message(msg: Message) -> Option<Self> {
        match msg {
            Message::Text(text) => Some(Self::Text(text)),
            Message::Binary(data) => Some(Self::Binary(data.len())),
            Message::Close(None) => Some(Self::Close(None)),
            Message::Close(Some(frame)) => {
                Some(Self::Close(Some(format!("{} {}", frame.code, frame.reason))))
            }
            // Ping and pong are answered by the backend
            _ => None,
        }
    }
}

/// WebSocket transport
///
/// Opens a text-framed duplex channel to a relay. Tests plug an in-memory relay in here.
pub trait WebSocketTransport: fmt::Debug + Send + Sync {
    /// Connect
    fn connect<'a>(
        &'a self,
        url: &'a Url,
        mode: &'a ConnectionMode,
        timeout: Duration,
    ) -> BoxedFuture<'a, Result<(TextSink, FrameStream), TransportError>>;
}

/// Default websocket transport, backed by `async-wsocket`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultWebsocketTransport;

impl WebSocketTransport for DefaultWebsocketTransport {
    fn connect<'a>(
        &'a self,
        url: &'a Url,
        mode: &'a ConnectionMode,
        timeout: Duration,
    ) -> BoxedFuture<'a, Result<(TextSink, FrameStream), TransportError>> {
        Box::pin(async move {
            let socket: WebSocket = WebSocket::connect(url, mode, timeout)
                .await
                .map_err(TransportError::backend)?;

            let (tx, rx) = socket.split();

            let sink: TextSink = Box::new(TextFrames(tx));
            let stream: FrameStream = Box::new(
                rx.map_err(TransportError::backend)
                    .try_filter_map(|msg| future::ready(Ok(Frame::from_message(msg)))),
            );

            Ok((sink, stream))
        })
    }
}

/// Wraps a [`Message`] sink into a [`TextSink`]
///
/// NOTE: `sink_map_err` panics on a second error, map them here instead
struct TextFrames<S>(S);

impl<S> Sink<String> for TextFrames<S>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    type Error = TransportError;

    fn poll_ready(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready_unpin(cx).map_err(TransportError::backend)
    }

    fn start_send(mut self: Pin<&mut Self>, text: String) -> Result<(), Self::Error> {
        self.0
            .start_send_unpin(Message::Text(text))
            .map_err(TransportError::backend)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_flush_unpin(cx).map_err(TransportError::backend)
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_close_unpin(cx).map_err(TransportError::backend)
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;

    use super::*;

    #[tokio::test]
    async fn test_text_frames_sink() {
        let (tx, mut rx) = mpsc::unbounded::<Message>();
        let mut sink: TextSink = Box::new(TextFrames(tx));

        sink.send(String::from(r#"["CLOSE","a"]"#)).await.unwrap();
        sink.close().await.unwrap();

        assert!(matches!(rx.next().await, Some(Message::Text(text)) if text == r#"["CLOSE","a"]"#));
        assert!(rx.next().await.is_none());

        // Errors are reported every time, never a panic
        assert!(sink.send(String::from("late")).await.is_err());
        assert!(sink.send(String::from("later")).await.is_err());
    }

    #[test]
    fn test_frame_from_message() {
        assert_eq!(
            Frame::from_message(Message::Text(String::from(r#"["EOSE","a"]"#))),
            Some(Frame::Text(String::from(r#"["EOSE","a"]"#)))
        );
        assert_eq!(
            Frame::from_message(Message::Binary(vec![1, 2, 3])),
            Some(Frame::Binary(3))
        );
        assert_eq!(Frame::from_message(Message::Close(None)), Some(Frame::Close(None)));
    }
}
