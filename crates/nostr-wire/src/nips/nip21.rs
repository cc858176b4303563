// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! NIP21: `nostr:` URI scheme
//!
//! <https://github.com/nostr-protocol/nips/blob/master/21.md>

use super::nip19::{self, ToBech32};
use crate::{EventId, PublicKey};

/// URI scheme
pub const SCHEME: &str = "nostr";

/// Strip the `nostr:` scheme, if any (case-insensitive)
pub fn strip_prefix(uri: &str) -> &str {
    match uri.split_once(':') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(SCHEME) => rest,
        _ => uri,
    }
}

/// Render as `nostr:` URI
pub trait ToNostrUri: ToBech32<Err = nip19::Error> {
    /// Get `nostr:` URI
    fn to_nostr_uri(&self) -> Result<String, nip19::Error> {
        Ok(format!("{SCHEME}:{}", self.to_bech32()?))
    }
}

impl ToNostrUri for PublicKey {}
impl ToNostrUri for EventId {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nips::nip19::FromBech32;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("nostr:npub1abc"), "npub1abc");
        assert_eq!(strip_prefix("NOSTR:npub1abc"), "npub1abc");
        assert_eq!(strip_prefix("npub1abc"), "npub1abc");
        assert_eq!(strip_prefix("nostr"), "nostr");
        assert_eq!(strip_prefix("nostrich"), "nostrich");
        assert_eq!(strip_prefix("nostré:x"), "nostré:x");
    }

    #[test]
    fn test_to_nostr_uri() {
        let public_key = PublicKey::from_byte_array([4u8; 32]);
        let uri = public_key.to_nostr_uri().unwrap();
        assert!(uri.starts_with("nostr:npub1"));
        assert_eq!(PublicKey::from_bech32(strip_prefix(&uri)).unwrap(), public_key);
    }
}
