fn main() {
    println!("Run `cargo test -p loopback-e2e` to execute the end-to-end protocol scenarios.");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::task::JoinHandle;
    use tokio_util::sync::CancellationToken;

    use seance_hub::{EmbeddingContext, Hub, HubConfig, MemoryStore};
    use seance_loopback::{LoopbackHost, Port, Window};
    use seance_medium::{ClientError, ConnectionState, Lifecycle, Medium, MediumConfig, call};
    use seance_protocol::constants::MessageType;

    const HUB: &str = "http://hub.test";
    const CLIENT: &str = "http://client.test";

    /// A hub framed in a client page, plus the medium embedding it.
    struct Rig {
        hub_window: Window,
        medium_window: Window,
        host: Arc<LoopbackHost>,
        medium: Medium,
        hub_task: JoinHandle<Hub<MemoryStore>>,
        cancel: CancellationToken,
    }

    fn rig(pool: &[&str], embedding: EmbeddingContext, medium_config: MediumConfig) -> Rig {
        let (hub_window, hub_events) = Window::open(HUB);
        let (medium_window, medium_events) = Window::open(CLIENT);

        let to_parent = Arc::new(Port::new(HUB, medium_window.clone()));
        let mut hub = Hub::new(
            HubConfig::new(pool.iter().copied()),
            MemoryStore::new(),
            to_parent,
            embedding,
        )
        .unwrap();
        let cancel = CancellationToken::new();
        let hub_cancel = cancel.clone();
        let hub_task = tokio::spawn(async move {
            hub.run(hub_events, hub_cancel).await;
            hub
        });

        let host = Arc::new(LoopbackHost::new(CLIENT));
        host.register_hub(hub_window.clone());
        let medium =
            Medium::init(medium_config, Lifecycle::default(), host.clone(), medium_events).unwrap();

        Rig {
            hub_window,
            medium_window,
            host,
            medium,
            hub_task,
            cancel,
        }
    }

    fn framed_rig() -> Rig {
        rig(
            &[CLIENT],
            EmbeddingContext::framed(HUB, CLIENT),
            MediumConfig::new(HUB),
        )
    }

    async fn wait_for_state(medium: &Medium, state: ConnectionState) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while medium.connection_state() != state {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("state never reached");
    }

    /// Stops the hub without a teardown broadcast and hands it back.
    async fn stop_hub(rig: Rig) -> Hub<MemoryStore> {
        rig.cancel.cancel();
        rig.hub_task.await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn mount_ack_connects_and_get_reports_absent_key() {
        let rig = framed_rig();
        rig.medium_window.load().unwrap();

        let api = rig.medium.sequence().await.unwrap();
        assert_eq!(rig.medium.connection_state(), ConnectionState::Connected);

        let result = call(&api, MessageType::Get, json!(["k"])).await.unwrap();
        assert_eq!(result, json!([{"k": null}]));

        let hub = stop_hub(rig).await;
        assert_eq!(hub.registry().len(), 1);
        assert!(hub.registry().contains(CLIENT));
    }

    #[tokio::test(start_paused = true)]
    async fn set_get_delete_round_trip() {
        let rig = framed_rig();
        rig.medium_window.load().unwrap();
        let api = rig.medium.sequence().await.unwrap();

        let pairs = json!([{"key": "v"}, {"count": 2, "ignored": "x"}]);
        let written = call(&api, MessageType::Set, pairs).await.unwrap();
        assert_eq!(written, json!([{"key": true}, {"count": true}]));

        let read = call(&api, MessageType::Get, json!(["key", "count"]))
            .await
            .unwrap();
        assert_eq!(read, json!([{"key": "v"}, {"count": "2"}]));

        let removed = call(&api, MessageType::Delete, json!(["key", "never-set"]))
            .await
            .unwrap();
        assert_eq!(removed, json!([{"key": true}, {"never-set": true}]));

        let read = call(&api, MessageType::Get, json!(["key"])).await.unwrap();
        assert_eq!(read, json!([{"key": null}]));

        let hub = stop_hub(rig).await;
        assert_eq!(hub.store().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn callbacks_fire_for_chained_calls() {
        let rig = framed_rig();
        rig.medium_window.load().unwrap();
        let api = rig.medium.sequence().await.unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<(Option<String>, Value)>();
        let tx2 = tx.clone();
        api.set(
            json!([{"theme": "dark"}]),
            Some(Box::new(move |err, result| {
                let _ = tx.send((err, result));
            })),
        )
        .unwrap()
        .get(
            json!(["theme"]),
            Some(Box::new(move |err, result| {
                let _ = tx2.send((err, result));
            })),
        )
        .unwrap();

        assert_eq!(rx.recv().await.unwrap(), (None, json!([{"theme": true}])));
        assert_eq!(rx.recv().await.unwrap(), (None, json!([{"theme": "dark"}])));
        assert_eq!(rig.medium.pending_requests(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_pair_fails_the_batch_on_the_hub() {
        let rig = framed_rig();
        rig.medium_window.load().unwrap();
        let api = rig.medium.sequence().await.unwrap();

        let err = call(&api, MessageType::Set, json!([{"a": "1"}, {}]))
            .await
            .err()
            .unwrap();
        assert!(matches!(&err, ClientError::Hub(_)));
        assert_eq!(err.to_string(), "seance error: invalid payload: pair at index 1 has no entries");

        let read = call(&api, MessageType::Get, json!(["a"])).await.unwrap();
        assert_eq!(read, json!([{"a": null}]));
    }

    #[tokio::test(start_paused = true)]
    async fn hub_teardown_disconnects_medium() {
        let mut config = MediumConfig::new(HUB);
        config.max_conn_attempts = 3;
        let rig = rig(&[CLIENT], EmbeddingContext::framed(HUB, CLIENT), config);
        rig.medium_window.load().unwrap();
        rig.medium.sequence().await.unwrap();

        rig.hub_window.before_unload().unwrap();
        wait_for_state(&rig.medium, ConnectionState::Disconnected).await;

        let hub = rig.hub_task.await.unwrap();
        assert!(hub.registry().is_empty());

        let err = rig.medium.sequence().await.err().unwrap();
        assert!(matches!(err, ClientError::Unreachable { origin } if origin == HUB));
    }

    #[tokio::test(start_paused = true)]
    async fn top_level_hub_connects_through_heartbeat() {
        let rig = rig(
            &[CLIENT],
            EmbeddingContext::top_level(HUB),
            MediumConfig::new(HUB),
        );
        rig.medium_window.load().unwrap();

        let started = tokio::time::Instant::now();
        rig.medium.sequence().await.unwrap();
        // The mount is registered but not acknowledged; the first SYN is.
        assert!(started.elapsed() >= Duration::from_secs(1));

        let hub = stop_hub(rig).await;
        assert_eq!(hub.registry().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unlisted_origin_never_connects() {
        let mut config = MediumConfig::new(HUB);
        config.max_conn_attempts = 4;
        let rig = rig(
            &["http://other.test"],
            EmbeddingContext::framed(HUB, CLIENT),
            config,
        );
        rig.medium_window.load().unwrap();

        let err = rig.medium.sequence().await.err().unwrap();
        assert!(matches!(err, ClientError::Unreachable { .. }));
        assert_eq!(rig.medium.connection_state(), ConnectionState::Disconnected);
        // MOUNT plus every heartbeat is still waiting for an answer.
        assert!(rig.medium.pending_requests() >= 2);

        let hub = stop_hub(rig).await;
        assert!(hub.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_ejects_and_removes_frame() {
        let rig = framed_rig();
        rig.medium_window.load().unwrap();
        rig.medium.sequence().await.unwrap();
        assert_eq!(rig.host.frame_count(), 1);

        rig.medium_window.before_unload().unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while !rig.medium.is_closed() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(rig.host.frame_count(), 0);

        // Let the hub drain the UNMOUNT before stopping it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let hub = stop_hub(rig).await;
        assert!(hub.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn forged_ack_from_foreign_origin_is_ignored() {
        let mut config = MediumConfig::new(HUB);
        config.max_conn_attempts = 2;
        let rig = rig(&[], EmbeddingContext::framed(HUB, CLIENT), config);
        rig.medium_window.load().unwrap();

        for id in 1..=3 {
            rig.medium_window
                .deliver(
                    "http://evil.test",
                    json!({"id": id, "error": null, "result": "ACK"}).to_string(),
                )
                .unwrap();
        }

        assert!(rig.medium.sequence().await.is_err());
        assert_eq!(rig.medium.connection_state(), ConnectionState::Disconnected);
    }
}
