// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

//! Nostr protocol types for read-only clients.
//!
//! Pure data side: keys, events, filters, NIP-01 wire messages and the
//! NIP-19 identifier codec. No I/O happens here.

pub use serde_json;
pub use url::{self, Url};

pub mod event;
pub mod filter;
pub mod key;
pub mod message;
pub mod nips;
pub mod prelude;
pub mod types;
pub mod util;

pub use self::event::{Event, EventId, Kind, Tag};
pub use self::filter::{Filter, SingleLetterTag};
pub use self::key::PublicKey;
pub use self::message::{ClientMessage, RelayMessage, SubscriptionId};
pub use self::types::{RelayUrl, Timestamp};
pub use self::util::JsonUtil;
