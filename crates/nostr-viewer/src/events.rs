// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Event collections and seen-id tracking

use std::collections::hash_map::{self, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::{cmp, fmt, vec};

use lru::LruCache;
use nostr_wire::{Event, EventId};

/// Default capacity of [`SeenEvents`]
pub const DEFAULT_SEEN_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Bounded set of recently seen event IDs
///
/// Relays deliver the same event independently, so a subscriber that fans out to many relays
/// sees duplicates. The oldest IDs are evicted once `capacity` is reached.
pub struct SeenEvents {
    cache: Mutex<LruCache<EventId, ()>>,
}

impl fmt::Debug for SeenEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeenEvents")
            .field("len", &self.len())
            .finish()
    }
}

impl Default for SeenEvents {
    fn default() -> Self {
        Self::new(DEFAULT_SEEN_CAPACITY)
    }
}

impl SeenEvents {
    /// New tracker holding up to `capacity` IDs
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Mark `id` as seen
    ///
    /// Returns `true` if the ID wasn't already tracked.
    pub fn insert(&self, id: EventId) -> bool {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put(id, ()).is_none()
    }

    /// Check if `id` has been seen, without refreshing it
    pub fn contains(&self, id: &EventId) -> bool {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.contains(id)
    }

    /// Number of tracked IDs
    pub fn len(&self) -> usize {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.len()
    }

    /// Check if no ID is tracked
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Events collection, keyed by ID
///
/// Iteration order is newest first (`created_at` descending, then ID ascending).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Events {
    events: HashMap<EventId, Event>,
}

impl Events {
    /// New empty collection
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event
    ///
    /// Returns `false` if an event with the same ID was already there.
    pub fn insert(&mut self, event: Event) -> bool {
        match self.events.entry(event.id) {
            hash_map::Entry::Occupied(..) => false,
            hash_map::Entry::Vacant(entry) => {
                entry.insert(event);
                true
            }
        }
    }

    /// Number of events
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Check if contains the event
    #[inline]
    pub fn contains(&self, id: &EventId) -> bool {
        self.events.contains_key(id)
    }

    /// Get event by ID
    #[inline]
    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.get(id)
    }

    /// Newest event
    pub fn first(&self) -> Option<&Event> {
        self.events.values().min_by(|a, b| newest_first(a, b))
    }

    /// Events, newest first
    pub fn to_vec(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.values().cloned().collect();
        events.sort_by(newest_first);
        events
    }

    /// Iterate events, newest first
    pub fn iter(&self) -> vec::IntoIter<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by(|a, b| newest_first(a, b));
        events.into_iter()
    }
}

fn newest_first(a: &Event, b: &Event) -> cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

impl IntoIterator for Events {
    type Item = Event;
    type IntoIter = vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        let mut events: Vec<Event> = self.events.into_values().collect();
        events.sort_by(newest_first);
        events.into_iter()
    }
}

impl Extend<Event> for Events {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = Event>,
    {
        for event in iter {
            self.insert(event);
        }
    }
}

impl FromIterator<Event> for Events {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Event>,
    {
        let mut events = Self::new();
        events.extend(iter);
        events
    }
}
