// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Prelude

#![allow(unknown_lints)]
#![allow(ambiguous_glob_reexports)]
#![doc(hidden)]

pub use async_wsocket::ConnectionMode;
pub use nostr_wire::prelude::*;

pub use crate::client::{self, *};
pub use crate::events::*;
pub use crate::pool::{self, *};
pub use crate::registry::*;
pub use crate::relay::{self, *};
pub use crate::*;
