// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

mod fetch_event;
mod fetch_events;
mod profile;
mod reactions;
mod subscribe;

pub use self::fetch_event::*;
pub use self::fetch_events::*;
pub use self::subscribe::*;
