// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]
#![doc = include_str!("../README.md")]

pub use nostr_wire;

pub mod client;
pub mod events;
mod future;
pub mod pool;
pub mod prelude;
pub mod registry;
pub mod relay;
mod shared;
pub mod transport;

pub use self::client::{Client, ClientBuilder, ClientOptions, EventFetcher};
pub use self::events::{Events, SeenEvents};
pub use self::pool::{Output, RelayPool, RelayPoolBuilder};
pub use self::relay::{Relay, RelayStatus};
