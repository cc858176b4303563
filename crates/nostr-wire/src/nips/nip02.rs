// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! NIP02: follow list (kind 3)
//!
//! <https://github.com/nostr-protocol/nips/blob/master/02.md>

use std::collections::HashSet;

use crate::{Event, Kind, PublicKey};

/// Followed public keys in tag order, without duplicates
///
/// Returns `None` if the event is not a kind 3. Malformed `p` tags are skipped.
pub fn follow_list(event: &Event) -> Option<Vec<PublicKey>> {
    if event.kind != Kind::CONTACT_LIST {
        return None;
    }

    let mut seen: HashSet<PublicKey> = HashSet::new();
    Some(
        event
            .public_keys()
            .filter(|public_key| seen.insert(*public_key))
            .collect(),
    )
}
