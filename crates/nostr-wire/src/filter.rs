// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Subscription filter
//!
//! <https://github.com/nostr-protocol/nips/blob/master/01.md>

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Event, EventId, JsonUtil, Kind, PublicKey, Timestamp};

/// Generic tag queries (`#e`, `#p`, ...)
pub type GenericTags = BTreeMap<SingleLetterTag, BTreeSet<String>>;

/// Single letter tag error
#[derive(Debug, PartialEq, Eq)]
pub enum SingleLetterTagError {
    /// Not an ASCII letter
    InvalidChar(char),
    /// Expected a single char
    ExpectedChar,
}

impl std::error::Error for SingleLetterTagError {}

impl fmt::Display for SingleLetterTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar(c) => write!(f, "Invalid single letter tag: {c}"),
            Self::ExpectedChar => write!(f, "Expected a single char"),
        }
    }
}

/// Single letter tag name (`a-z`, `A-Z`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SingleLetterTag(char);

impl SingleLetterTag {
    /// `e` tag
    pub const E: Self = Self('e');
    /// `p` tag
    pub const P: Self = Self('p');

    /// Parse from char
    pub fn from_char(c: char) -> Result<Self, SingleLetterTagError> {
        if c.is_ascii_alphabetic() {
            Ok(Self(c))
        } else {
            Err(SingleLetterTagError::InvalidChar(c))
        }
    }

    /// Parse from a tag name (must be exactly one char)
    pub fn parse(s: &str) -> Result<Self, SingleLetterTagError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(SingleLetterTagError::ExpectedChar),
        }
    }

    /// Get as char
    #[inline]
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for SingleLetterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription filter
///
/// Serialized verbatim as the NIP-01 JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// List of [`EventId`]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub ids: Option<BTreeSet<EventId>>,
    /// List of [`PublicKey`]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub authors: Option<BTreeSet<PublicKey>>,
    /// List of a kind numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub kinds: Option<BTreeSet<Kind>>,
    /// An integer unix timestamp, events must be newer than this to pass
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub since: Option<Timestamp>,
    /// An integer unix timestamp, events must be older than this to pass
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub until: Option<Timestamp>,
    /// Maximum number of events to be returned in the initial query
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub limit: Option<usize>,
    /// Generic tag queries
    #[serde(
        flatten,
        serialize_with = "serialize_generic_tags",
        deserialize_with = "deserialize_generic_tags"
    )]
    #[serde(default)]
    pub generic_tags: GenericTags,
}

impl Filter {
    /// Create new empty [`Filter`]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add [`EventId`]
    #[inline]
    pub fn id(self, id: EventId) -> Self {
        self.ids([id])
    }

    /// Add event ids
    #[inline]
    pub fn ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = EventId>,
    {
        self.ids = extend_or_collect(self.ids, ids);
        self
    }

    /// Add author
    #[inline]
    pub fn author(self, author: PublicKey) -> Self {
        self.authors([author])
    }

    /// Add authors
    #[inline]
    pub fn authors<I>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = PublicKey>,
    {
        self.authors = extend_or_collect(self.authors, authors);
        self
    }

    /// Add kind
    #[inline]
    pub fn kind(self, kind: Kind) -> Self {
        self.kinds([kind])
    }

    /// Add kinds
    #[inline]
    pub fn kinds<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = Kind>,
    {
        self.kinds = extend_or_collect(self.kinds, kinds);
        self
    }

    /// Add event referenced in `e` tag
    #[inline]
    pub fn event(self, id: EventId) -> Self {
        self.custom_tag(SingleLetterTag::E, [id])
    }

    /// Add pubkey referenced in `p` tag
    #[inline]
    pub fn pubkey(self, pubkey: PublicKey) -> Self {
        self.custom_tag(SingleLetterTag::P, [pubkey])
    }

    /// Add since unix timestamp
    #[inline]
    pub fn since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    /// Add until unix timestamp
    #[inline]
    pub fn until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }

    /// Add limit
    #[inline]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add custom tag
    pub fn custom_tag<I, T>(mut self, tag: SingleLetterTag, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.generic_tags
            .entry(tag)
            .or_default()
            .extend(values.into_iter().map(|v| v.into()));
        self
    }

    /// Check if [`Filter`] is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self == &Filter::default()
    }

    #[inline]
    fn ids_match(&self, event: &Event) -> bool {
        self.ids
            .as_ref()
            .map_or(true, |ids| ids.is_empty() || ids.contains(&event.id))
    }

    #[inline]
    fn authors_match(&self, event: &Event) -> bool {
        self.authors.as_ref().map_or(true, |authors| {
            authors.is_empty() || authors.contains(&event.pubkey)
        })
    }

    #[inline]
    fn kind_match(&self, event: &Event) -> bool {
        self.kinds
            .as_ref()
            .map_or(true, |kinds| kinds.is_empty() || kinds.contains(&event.kind))
    }

    fn tag_match(&self, event: &Event) -> bool {
        if self.generic_tags.is_empty() {
            return true;
        }

        if event.tags.is_empty() {
            return false;
        }

        // Build tags indexes
        let mut idx: BTreeMap<SingleLetterTag, BTreeSet<&str>> = BTreeMap::new();
        for (single_letter_tag, content) in event.tags.iter().filter_map(|t| {
            let name = SingleLetterTag::parse(t.kind()?).ok()?;
            Some((name, t.content()?))
        }) {
            idx.entry(single_letter_tag).or_default().insert(content);
        }

        // Match
        self.generic_tags.iter().all(|(tag_name, set)| {
            if let Some(val_set) = idx.get(tag_name) {
                set.iter().any(|t| val_set.contains(t.as_str()))
            } else {
                false
            }
        })
    }

    /// Determine if [`Filter`] match given [`Event`].
    ///
    /// Provided for callers and test relays: the subscription registry never filters.
    #[inline]
    pub fn match_event(&self, event: &Event) -> bool {
        self.ids_match(event)
            && self.authors_match(event)
            && self.kind_match(event)
            && self.since.map_or(true, |t| event.created_at >= t)
            && self.until.map_or(true, |t| event.created_at <= t)
            && self.tag_match(event)
    }
}

impl JsonUtil for Filter {
    type Err = serde_json::Error;
}

fn serialize_generic_tags<S>(generic_tags: &GenericTags, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(generic_tags.len()))?;
    for (tag, values) in generic_tags.iter() {
        map.serialize_entry(&format!("#{tag}"), values)?;
    }
    map.end()
}

fn deserialize_generic_tags<'de, D>(deserializer: D) -> Result<GenericTags, D::Error>
where
    D: Deserializer<'de>,
{
    struct GenericTagsVisitor;

    impl<'de> Visitor<'de> for GenericTagsVisitor {
        type Value = GenericTags;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("map in which the keys are \"#X\" for some character X")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut generic_tags = GenericTags::new();
            while let Some(key) = map.next_key::<String>()? {
                let mut chars = key.chars();
                if let (Some('#'), Some(ch), None) = (chars.next(), chars.next(), chars.next()) {
                    let tag: SingleLetterTag =
                        SingleLetterTag::from_char(ch).map_err(serde::de::Error::custom)?;
                    let values: BTreeSet<String> = map.next_value()?;
                    generic_tags.insert(tag, values);
                } else {
                    map.next_value::<serde::de::IgnoredAny>()?;
                }
            }
            Ok(generic_tags)
        }
    }

    deserializer.deserialize_map(GenericTagsVisitor)
}

fn extend_or_collect<T, I>(mut set: Option<BTreeSet<T>>, iter: I) -> Option<BTreeSet<T>>
where
    I: IntoIterator<Item = T>,
    T: Ord,
{
    match set.as_mut() {
        Some(s) => {
            s.extend(iter);
        }
        None => set = Some(iter.into_iter().collect()),
    };
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tag;

    const ID: &str = "d94a3f4dd87b9a3b0bed183b32e916fa29c8020107845d1752d72697fe5309a5";
    const PK: &str = "aa4fc8665f5696e33db7e1a572e3b0f5b3d615837b0f362dcb1c8068b098c7b4";

    fn event(kind: Kind, created_at: u64, tags: Vec<Tag>) -> Event {
        Event {
            id: EventId::from_hex(ID).unwrap(),
            pubkey: PublicKey::from_hex(PK).unwrap(),
            created_at: Timestamp::from(created_at),
            kind,
            tags,
            content: String::new(),
            sig: String::new(),
        }
    }

    #[test]
    fn test_filter_serialization() {
        let filter = Filter::new()
            .id(EventId::from_hex(ID).unwrap())
            .limit(1);
        assert_eq!(filter.as_json(), format!(r#"{{"ids":["{ID}"],"limit":1}}"#));

        let filter = Filter::new()
            .kind(Kind::REACTION)
            .event(EventId::from_hex(ID).unwrap());
        assert_eq!(filter.as_json(), format!(r##"{{"kinds":[7],"#e":["{ID}"]}}"##));
    }

    #[test]
    fn test_filter_deserialization() {
        let json = format!(
            r##"{{"authors":["{PK}"],"kinds":[3],"#p":["{PK}"],"search":"ignored","since":10}}"##
        );
        let filter = Filter::from_json(json).unwrap();
        assert_eq!(
            filter,
            Filter::new()
                .author(PublicKey::from_hex(PK).unwrap())
                .kind(Kind::CONTACT_LIST)
                .pubkey(PublicKey::from_hex(PK).unwrap())
                .since(Timestamp::from(10))
        );
    }

    #[test]
    fn test_match_event() {
        let pk = PublicKey::from_hex(PK).unwrap();
        let e = event(Kind::TEXT_NOTE, 100, vec![Tag::public_key(pk)]);

        assert!(Filter::new().match_event(&e));
        assert!(Filter::new().kind(Kind::TEXT_NOTE).author(pk).match_event(&e));
        assert!(Filter::new().pubkey(pk).match_event(&e));
        assert!(!Filter::new().kind(Kind::REACTION).match_event(&e));
        assert!(!Filter::new().since(Timestamp::from(101)).match_event(&e));
        assert!(!Filter::new().until(Timestamp::from(99)).match_event(&e));
        assert!(!Filter::new()
            .event(EventId::all_zeros())
            .match_event(&e));
    }

    #[test]
    fn test_single_letter_tag() {
        assert_eq!(SingleLetterTag::parse("e"), Ok(SingleLetterTag::E));
        assert_eq!(
            SingleLetterTag::parse("ee"),
            Err(SingleLetterTagError::ExpectedChar)
        );
        assert_eq!(
            SingleLetterTag::from_char('1'),
            Err(SingleLetterTagError::InvalidChar('1'))
        );
    }
}
