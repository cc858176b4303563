// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay status

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug)]
pub(super) struct AtomicRelayStatus {
    value: AtomicU8,
}

impl Default for AtomicRelayStatus {
    fn default() -> Self {
        Self::new(RelayStatus::Connecting)
    }
}

impl AtomicRelayStatus {
    #[inline]
    pub(super) fn new(status: RelayStatus) -> Self {
        Self {
            value: AtomicU8::new(status as u8),
        }
    }

    #[inline]
    pub(super) fn set(&self, status: RelayStatus) {
        self.value.store(status as u8, Ordering::SeqCst);
    }

    pub(super) fn load(&self) -> RelayStatus {
        match self.value.load(Ordering::SeqCst) {
            0 => RelayStatus::Connecting,
            1 => RelayStatus::Connected,
            _ => RelayStatus::Closed,
        }
    }
}

/// Relay connection status
///
/// A relay only moves forward: `Connecting`, then `Connected`, then `Closed`.
/// A closed relay is never reopened; connecting again creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelayStatus {
    /// Trying to connect.
    Connecting = 0,
    /// Connected.
    Connected = 1,
    /// The connection failed or has been closed.
    Closed = 2,
}

impl fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl RelayStatus {
    /// Check if is `Connected`
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if is `Closed`
    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_status_roundtrip() {
        let status = AtomicRelayStatus::default();
        assert_eq!(status.load(), RelayStatus::Connecting);

        status.set(RelayStatus::Connected);
        assert!(status.load().is_connected());

        status.set(RelayStatus::Closed);
        assert!(status.load().is_closed());
        assert_eq!(status.load().to_string(), "Closed");
    }
}
