// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

use std::env;
use std::error::Error;

use nostr_viewer::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let input: String = env::args().nth(1).unwrap_or_else(|| {
        String::from("npub1sg6plzptd64u62a878hep2kev88swjh3tw00gjsfl8f237lmu63q0uf63m")
    });

    // Accepts npub, nostr: URI or hex
    let public_key = PublicKey::parse(&input)?;
    println!("Public key: {}", public_key.to_bech32()?);

    let client = Client::default();
    let output = client.connect_default().await;
    println!("Connected to {} relays", output.success.len());
    for (url, error) in output.failed.iter() {
        println!("Can't connect to {url}: {error}");
    }
    for (url, error) in output.iter() {
        println!("Invalid relay url {url}: {error}");
    }

    match client.fetch_metadata(public_key).await? {
        Some(metadata) => {
            println!("Name: {}", metadata.best_name().unwrap_or("<unnamed>"));
            if let Some(about) = &metadata.about {
                println!("About: {about}");
            }
        }
        None => println!("No profile found"),
    }

    if let Some(follows) = client.fetch_follow_list(public_key).await? {
        println!("Following {} accounts", follows.len());
    }

    // Latest notes, deduplicated across relays
    let filter = Filter::new()
        .author(public_key)
        .kind(Kind::TEXT_NOTE)
        .limit(5);
    let notes = client.fetch_events(filter).await?;
    for note in notes.iter() {
        let reactions = client.fetch_reactions(note.id).await?;
        println!(
            "[{}] {} ({} reactions)",
            note.created_at,
            note.content,
            reactions.total()
        );
    }

    // Resolve a referenced event through the narrow fetcher capability
    if let Some(first) = notes.first() {
        let fetcher: &dyn EventFetcher = &client;
        let (tx, rx) = tokio::sync::oneshot::channel();
        fetcher.fetch_event(
            first.id,
            Box::new(move |event| {
                let _ = tx.send(event);
            }),
        );
        if let Ok(Some(event)) = rx.await {
            println!("Fetched {} by ID", event.id.to_bech32()?);
        }
    }

    client.close_all().await;

    Ok(())
}
