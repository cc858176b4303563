// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use nostr_wire::nips::nip25::Reactions;
use nostr_wire::{EventId, Filter, Kind};

use super::ReqExitPolicy;
use crate::client::{Client, Error};
use crate::events::Events;

impl Client {
    /// Tally the reactions (kind 7) to an event
    ///
    /// Collects for the whole reaction window, then closes the subscription.
    /// Empty content and `+` count as 👍.
    pub async fn fetch_reactions(&self, event_id: EventId) -> Result<Reactions, Error> {
        let filter: Filter = Filter::new().kind(Kind::REACTION).event(event_id);
        let events: Events = self
            .fetch_events(filter)
            .timeout(self.opts.reaction_window)
            .policy(ReqExitPolicy::WaitForTimeout)
            .await?;
        Ok(Reactions::tally(&event_id, events.iter()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nostr_wire::nips::nip25::LIKE;
    use nostr_wire::Tag;

    use super::*;
    use crate::client::ClientOptions;
    use crate::transport::mock::{self, MockTransport};

    #[tokio::test]
    async fn test_fetch_reactions() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let b = mock.add_relay("wss://b.example.com");
        let target = EventId::from_byte_array([1; 32]);
        let other = EventId::from_byte_array([2; 32]);

        let reaction = |id: u8, content: &str, to: EventId| {
            mock::build_event(id, id, 100, Kind::REACTION, vec![Tag::event(to)], content)
        };
        mock.store(&a, reaction(10, "+", target));
        mock.store(&a, reaction(11, "", target));
        mock.store(&a, reaction(12, "🔥", target));
        mock.store(&b, reaction(12, "🔥", target));
        mock.store(&b, reaction(13, "+", other));

        let opts = ClientOptions::new().reaction_window(Duration::from_millis(300));
        let client = Client::builder()
            .websocket_transport(mock.clone())
            .opts(opts)
            .build();
        client.connect([a.as_str(), b.as_str()]).await;

        let reactions = client.fetch_reactions(target).await.unwrap();
        assert_eq!(reactions.total(), 3);
        assert_eq!(reactions.count(LIKE), 2);
        assert_eq!(reactions.count("🔥"), 1);
        assert!(client.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_reactions_empty() {
        let mock = MockTransport::new();
        let a = mock.add_relay("wss://a.example.com");
        let opts = ClientOptions::new().reaction_window(Duration::from_millis(100));
        let client = Client::builder()
            .websocket_transport(mock)
            .opts(opts)
            .build();
        client.connect([a.as_str()]).await;

        let reactions = client
            .fetch_reactions(EventId::from_byte_array([1; 32]))
            .await
            .unwrap();
        assert!(reactions.is_empty());
    }
}
