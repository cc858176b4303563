// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay error

use std::fmt;

use crate::transport::error::TransportError;

/// [`Relay`](super::Relay) error
#[derive(Debug)]
pub enum Error {
    /// Transport error
    Transport(TransportError),
    /// Connection or send timeout
    Timeout,
    /// Relay not connected
    NotConnected,
    /// The outbound queue is full or the connection task is gone
    CantSendMessageToDispatcher,
    /// Termination requested while connecting
    TerminationRequest,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{e}"),
            Self::Timeout => write!(f, "timeout"),
            Self::NotConnected => write!(f, "relay not connected"),
            Self::CantSendMessageToDispatcher => {
                write!(f, "can't send message to the relay dispatcher")
            }
            Self::TerminationRequest => write!(f, "termination requested"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
