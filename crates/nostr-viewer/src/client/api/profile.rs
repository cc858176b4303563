// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use nostr_wire::nips::nip01::Metadata;
use nostr_wire::nips::nip02;
use nostr_wire::{Filter, Kind, PublicKey};

use crate::client::{Client, Error};
use crate::events::Events;

impl Client {
    /// Fetch the newest valid profile metadata (kind 0) of `public_key`
    ///
    /// Events with malformed content are logged and skipped.
    pub async fn fetch_metadata(&self, public_key: PublicKey) -> Result<Option<Metadata>, Error> {
        let filter: Filter = Filter::new()
            .author(public_key)
            .kind(Kind::METADATA)
            .limit(1);
        let events: Events = self
            .fetch_events(filter)
            .timeout(self.opts.batch_timeout)
            .await?;

        for event in events.into_iter() {
            if event.pubkey != public_key {
                tracing::warn!(id = %event.id, "Relay sent metadata of another author.");
                continue;
            }

            match Metadata::from_event(&event) {
                Ok(metadata) => return Ok(Some(metadata)),
                Err(e) => {
                    tracing::error!(id = %event.id, error = %e, "Skipping malformed metadata.")
                }
            }
        }

        Ok(None)
    }

    /// Fetch the follow list of `public_key`, from its newest contact list (kind 3)
    ///
    /// Returns `None` if no contact list arrived within the follow list timeout.
    pub async fn fetch_follow_list(
        &self,
        public_key: PublicKey,
    ) -> Result<Option<Vec<PublicKey>>, Error> {
        let filter: Filter = Filter::new()
            .author(public_key)
            .kind(Kind::CONTACT_LIST)
            .limit(1);
        let events: Events = self
            .fetch_events(filter)
            .timeout(self.opts.follow_list_timeout)
            .await?;

        Ok(events
            .iter()
            .find(|event| event.pubkey == public_key)
            .and_then(nip02::follow_list))
    }
}
