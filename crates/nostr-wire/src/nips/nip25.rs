// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! NIP25: reactions (kind 7)
//!
//! <https://github.com/nostr-protocol/nips/blob/master/25.md>

use std::collections::BTreeMap;

use crate::{Event, EventId, Kind};

/// Emoji shown for a like (`+` or empty content)
pub const LIKE: &str = "👍";
/// Emoji shown for a dislike (`-`)
pub const DISLIKE: &str = "👎";

/// Reaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// `+` or empty content
    Like,
    /// `-`
    Dislike,
    /// Any other content (usually an emoji)
    Emoji(String),
}

impl Reaction {
    /// Parse from event content
    pub fn from_content(content: &str) -> Self {
        match content.trim() {
            "" | "+" => Self::Like,
            "-" => Self::Dislike,
            other => Self::Emoji(other.to_string()),
        }
    }

    /// Parse from a kind 7 event
    pub fn from_event(event: &Event) -> Option<Self> {
        if event.kind != Kind::REACTION {
            return None;
        }
        Some(Self::from_content(&event.content))
    }

    /// Emoji to display
    pub fn as_emoji(&self) -> &str {
        match self {
            Self::Like => LIKE,
            Self::Dislike => DISLIKE,
            Self::Emoji(emoji) => emoji,
        }
    }
}

/// Reactions tally for a single event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reactions {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl Reactions {
    /// Tally reactions referencing `target`
    ///
    /// Events that are not kind 7 or don't reference `target` in an `e` tag are skipped.
    pub fn tally<'a, I>(target: &EventId, events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut reactions = Self::default();
        for event in events {
            if !event.event_ids().any(|id| &id == target) {
                continue;
            }

            if let Some(reaction) = Reaction::from_event(event) {
                reactions.add(&reaction);
            }
        }
        reactions
    }

    /// Count a reaction
    pub fn add(&mut self, reaction: &Reaction) {
        *self.counts.entry(reaction.as_emoji().to_string()).or_default() += 1;
        self.total += 1;
    }

    /// Count for an emoji
    pub fn count(&self, emoji: &str) -> usize {
        self.counts.get(emoji).copied().unwrap_or_default()
    }

    /// Total number of reactions
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Check if there are no reactions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate `(emoji, count)`, most used first
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        let mut counts: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PublicKey, Tag, Timestamp};

    fn reaction(id: u8, target: EventId, content: &str) -> Event {
        Event {
            id: EventId::from_byte_array([id; 32]),
            pubkey: PublicKey::from_byte_array([id; 32]),
            created_at: Timestamp::from(u64::from(id)),
            kind: Kind::REACTION,
            tags: vec![Tag::event(target)],
            content: content.to_string(),
            sig: String::new(),
        }
    }

    #[test]
    fn test_reaction_from_content() {
        assert_eq!(Reaction::from_content(""), Reaction::Like);
        assert_eq!(Reaction::from_content("+"), Reaction::Like);
        assert_eq!(Reaction::from_content("-"), Reaction::Dislike);
        assert_eq!(
            Reaction::from_content("🤙"),
            Reaction::Emoji(String::from("🤙"))
        );
        assert_eq!(Reaction::Like.as_emoji(), "👍");
    }

    #[test]
    fn test_tally() {
        let target = EventId::from_byte_array([9u8; 32]);
        let other = EventId::from_byte_array([8u8; 32]);
        let events = vec![
            reaction(1, target, "+"),
            reaction(2, target, ""),
            reaction(3, target, "🤙"),
            reaction(4, other, "+"),
        ];

        let reactions = Reactions::tally(&target, &events);
        assert_eq!(reactions.total(), 3);
        assert_eq!(reactions.count(LIKE), 2);
        assert_eq!(reactions.count("🤙"), 1);
        assert_eq!(reactions.iter().next(), Some((LIKE, 2)));
    }
}
