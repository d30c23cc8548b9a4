//! Wires a hub and a medium over loopback windows and runs one session.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use seance_hub::{EmbeddingContext, FileStore, Hub, MemoryStore, StoreAdapter};
use seance_loopback::{LoopbackHost, Port, Window};
use seance_medium::{Lifecycle, Medium, call};
use seance_protocol::constants::MessageType;

use crate::config::Config;

/// Runs the demo session against the configured store.
pub async fn run(config: Config) -> anyhow::Result<()> {
    match config.store_path.clone() {
        Some(path) => {
            let store = FileStore::open(path)?;
            tracing::info!(path = %store.path().display(), "using file store");
            session(config, store).await
        }
        None => session(config, MemoryStore::new()).await,
    }
}

async fn session<S>(config: Config, store: S) -> anyhow::Result<()>
where
    S: StoreAdapter + Send + 'static,
{
    let cancel = CancellationToken::new();

    // -- Windows --
    let (hub_window, hub_events) = Window::open(&config.hub_origin);
    let (medium_window, medium_events) = Window::open(&config.medium_origin);

    // -- Hub, framed inside the medium's page --
    let to_parent = Arc::new(Port::new(&config.hub_origin, medium_window.clone()));
    let embedding = EmbeddingContext::framed(&config.hub_origin, &config.medium_origin);
    let mut hub = Hub::new(config.hub.clone(), store, to_parent, embedding)?;
    let hub_cancel = cancel.clone();
    let hub_task = tokio::spawn(async move {
        hub.run(hub_events, hub_cancel).await;
        hub
    });

    // -- Medium --
    let host = Arc::new(LoopbackHost::new(&config.medium_origin));
    host.register_hub(hub_window.clone());

    let lifecycle = Lifecycle::default()
        .on_created(|uuid| tracing::info!(uuid, "medium created"))
        .on_destroyed(|uuid| tracing::info!(uuid, "medium destroyed"));
    let medium = Medium::init(config.medium.clone(), lifecycle, host.clone(), medium_events)?;

    medium_window.load()?;
    let api = medium.sequence().await?;
    tracing::info!(uuid = medium.uuid(), "connected to seance");

    // -- Session --
    let written = call(
        &api,
        MessageType::Set,
        json!([{"greeting": "hello"}, {"visits": 3}]),
    )
    .await?;
    report("set", &written);

    let read = call(&api, MessageType::Get, json!(["greeting", "visits", "missing"])).await?;
    report("get", &read);

    let removed = call(&api, MessageType::Delete, json!(["greeting"])).await?;
    report("delete", &removed);

    let after = call(&api, MessageType::Get, json!(["greeting"])).await?;
    report("get", &after);

    // -- Teardown --
    medium_window.before_unload()?;
    while !medium.is_closed() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    hub_window.before_unload()?;
    let hub = hub_task.await?;
    tracing::info!(
        peers = hub.registry().len(),
        frames = host.frame_count(),
        "session closed"
    );

    cancel.cancel();
    Ok(())
}

fn report(op: &str, result: &Value) {
    tracing::info!(op, result = %result, "query result");
}
