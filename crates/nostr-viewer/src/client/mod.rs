// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Client

use std::collections::HashMap;

use nostr_wire::{Event, EventId, Filter, RelayUrl, SubscriptionId};

mod api;
mod builder;
mod error;
mod options;

pub use self::api::*;
pub use self::builder::*;
pub use self::error::Error;
pub use self::options::*;
use crate::pool::{Output, RelayPool, RelayPoolBuilder};
use crate::registry::SubscriptionHandler;

/// Read-only nostr client
///
/// Every instance owns its own relay pool and subscription registry.
#[derive(Debug, Clone)]
pub struct Client {
    pool: RelayPool,
    opts: ClientOptions,
}

impl Default for Client {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Construct a new default client
    ///
    /// Use the [`Client::builder`] to configure it.
    #[inline]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Construct client
    ///
    /// # Example
    /// ```rust,no_run
    /// use std::time::Duration;
    ///
    /// use nostr_viewer::prelude::*;
    ///
    /// let opts = ClientOptions::new().batch_timeout(Duration::from_secs(5));
    /// let client: Client = Client::builder().opts(opts).build();
    /// ```
    #[inline]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn from_builder(builder: ClientBuilder) -> Self {
        let pool: RelayPool = RelayPoolBuilder {
            websocket_transport: builder.websocket_transport,
            connection_mode: builder.opts.connection_mode.clone(),
        }
        .build();

        Self {
            pool,
            opts: builder.opts,
        }
    }

    /// Get relay pool
    #[inline]
    pub fn pool(&self) -> &RelayPool {
        &self.pool
    }

    /// Get options
    #[inline]
    pub fn opts(&self) -> &ClientOptions {
        &self.opts
    }

    /// Connect to relays
    ///
    /// Relays that fail to connect within the connection timeout are reported in
    /// [`Output::failed`] and are not retried.
    /// Urls that can't be parsed are skipped and returned as the output value,
    /// with the parse error.
    pub async fn connect<I, S>(&self, urls: I) -> Output<HashMap<String, String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut invalid: HashMap<String, String> = HashMap::new();
        let mut valid: Vec<RelayUrl> = Vec::new();

        for url in urls.into_iter() {
            let url: &str = url.as_ref();
            match RelayUrl::parse(url) {
                Ok(url) => valid.push(url),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Skipping invalid relay url.");
                    invalid.insert(url.to_string(), e.to_string());
                }
            }
        }

        self.pool
            .connect(valid, self.opts.connection_timeout)
            .await
            .map(|()| invalid)
    }

    /// Connect to the relays set in [`ClientOptions::relays`]
    #[inline]
    pub async fn connect_default(&self) -> Output<HashMap<String, String>> {
        self.connect(&self.opts.relays).await
    }

    /// Number of connected relays
    #[inline]
    pub async fn connected_count(&self) -> usize {
        self.pool.connected_count().await
    }

    /// Urls of the live relays
    #[inline]
    pub async fn relay_urls(&self) -> Vec<RelayUrl> {
        self.pool.relay_urls().await
    }

    /// IDs of the live subscriptions
    #[inline]
    pub async fn subscriptions(&self) -> Vec<SubscriptionId> {
        self.pool.registry().ids().await
    }

    /// Subscribe to events
    ///
    /// `REQ` is sent only to the relays connected at call time. `on_event` runs for every
    /// matching event of every relay, duplicates included, unless
    /// [`Subscribe::deduplicate`] is set.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use nostr_viewer::prelude::*;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::default();
    /// client.connect(["wss://relay.damus.io"]).await;
    ///
    /// let filter = Filter::new().kind(Kind::TEXT_NOTE).limit(20);
    /// client
    ///     .subscribe("feed", filter, |event, relay_url| {
    ///         println!("{relay_url}: {}", event.content);
    ///     })
    ///     .on_end_of_stream(|relay_url| println!("{relay_url}: end of stored events"))
    ///     .deduplicate()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<I, F>(&self, id: I, filter: Filter, on_event: F) -> Subscribe<'_>
    where
        I: Into<SubscriptionId>,
        F: Fn(Event, RelayUrl) + Send + Sync + 'static,
    {
        Subscribe::new(self, id.into(), filter, SubscriptionHandler::new(on_event))
    }

    /// Unsubscribe
    ///
    /// Unknown IDs are ignored and no `CLOSE` is sent.
    #[inline]
    pub async fn unsubscribe(&self, id: &SubscriptionId) -> Output<()> {
        self.pool.unsubscribe(id).await
    }

    /// Fetch a single event by ID
    ///
    /// Resolves to `None` if no relay has it.
    #[inline]
    pub fn event_by_id(&self, id: EventId) -> FetchEventById<'_> {
        FetchEventById::new(self, id)
    }

    /// Fetch events matching a filter
    ///
    /// Collects until every relay that received the `REQ` sent `EOSE` or the timeout elapsed.
    #[inline]
    pub fn fetch_events(&self, filter: Filter) -> FetchEvents<'_> {
        FetchEvents::new(self, filter)
    }

    /// Disconnect every relay and drop every subscription
    ///
    /// The client can be connected again afterwards.
    #[inline]
    pub async fn close_all(&self) {
        self.pool.close_all().await
    }
}
