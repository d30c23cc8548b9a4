//! Medium connection engine.
//!
//! Owns the proxy channel, the correlator and the connection state.
//! The state turns `Connected` only on an `ACK` and `Disconnected` only
//! on the hub's `CLOSE` broadcast.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use seance_protocol::codec;
use seance_protocol::constants::MessageType;
use seance_protocol::envelope::Request;
use seance_protocol::ids::IdSource;
use seance_protocol::log::ProtocolLogger;
use seance_protocol::transport::{Inbound, WindowEvent};

use crate::ClientError;
use crate::api::Seance;
use crate::correlator::{Correlator, ResponseCallback};
use crate::proxy::{ProxyFrame, ProxyHost};
use crate::types::{ConnectionState, Lifecycle, MediumConfig};

/// State shared by the medium handle, its pumps and every [`Seance`].
pub(crate) struct Inner {
    pub(crate) uuid: String,
    pub(crate) config: MediumConfig,
    ids: IdSource,
    pub(crate) correlator: Correlator,
    state: Mutex<ConnectionState>,
    frame: ProxyFrame,
    host: Arc<dyn ProxyHost>,
    lifecycle: Lifecycle,
    logger: ProtocolLogger,
    mounted: AtomicBool,
    unmounted: AtomicBool,
    pub(crate) cancel: CancellationToken,
}

impl Inner {
    pub(crate) fn new(
        uuid: String,
        config: MediumConfig,
        lifecycle: Lifecycle,
        host: Arc<dyn ProxyHost>,
        frame: ProxyFrame,
    ) -> Self {
        Self {
            logger: ProtocolLogger::new("Medium", config.logger, config.verbose),
            uuid,
            config,
            ids: IdSource::new(),
            correlator: Correlator::new(),
            state: Mutex::new(ConnectionState::Disconnected),
            frame,
            host,
            lifecycle,
            mounted: AtomicBool::new(false),
            unmounted: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != next {
            debug!(from = ?*state, to = ?next, "connection state changed");
            *state = next;
        }
    }

    /// Heartbeat acknowledgement handler.
    pub(crate) fn acknowledge(&self) {
        self.set_state(ConnectionState::Connected);
    }

    /// Sends a request to the hub, registering `cb` under a fresh id.
    pub(crate) fn emit(&self, kind: MessageType, payload: Value, cb: Option<ResponseCallback>) {
        let id = self.ids.next_id();
        // Registered before posting so a fast response always finds its entry.
        self.correlator.register(id.clone(), cb);

        let request = Request::new(&self.uuid, id, kind, payload);
        if let Ok(detail) = serde_json::to_value(&request) {
            self.logger.log("send", &detail);
        }

        match codec::serialize(&request) {
            Ok(data) => {
                if let Err(e) = self.frame.channel.post(data, &self.config.seance_origin) {
                    warn!(id = %request.id, kind = %kind, error = %e, "failed to post request");
                }
            }
            Err(e) => warn!(id = %request.id, error = %e, "failed to serialize request"),
        }
    }

    /// Handles one inbound message. Anything failing a guard is dropped
    /// silently.
    pub(crate) fn recv(&self, message: &Inbound) {
        if message.origin != self.config.seance_origin {
            return;
        }
        let Some(data) = message.text_data() else {
            return;
        };
        let Ok(envelope) = codec::deserialize(data) else {
            return;
        };
        let Some(id) = envelope.id.as_ref() else {
            return;
        };
        if envelope.result.is_none() && envelope.error.is_none() {
            return;
        }

        // Hub shutdown; bypasses the correlator entirely.
        if envelope.is_close_broadcast() {
            info!(origin = %message.origin, "seance closed");
            self.set_state(ConnectionState::Disconnected);
            return;
        }

        let Some(cb) = self.correlator.take(id) else {
            return;
        };

        if let Ok(detail) = serde_json::to_value(&envelope) {
            self.logger.log("recv", &detail);
        }

        if envelope
            .result
            .as_ref()
            .is_some_and(|r| MessageType::Ack.matches(r))
        {
            self.acknowledge();
            return;
        }

        if let Some(cb) = cb {
            cb(envelope.error, envelope.result.unwrap_or(Value::Null));
        }
    }

    /// Announces the medium to the hub. Runs once.
    pub(crate) fn mount(&self) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.emit(MessageType::Mount, Value::from(self.uuid.as_str()), None);
        info!(uuid = %self.uuid, seance = %self.config.seance_origin, "medium mounted");
        (self.lifecycle.created)(&self.uuid);
    }

    /// Withdraws from the hub, removes the proxy frame and stops the
    /// pumps. Runs once.
    pub(crate) fn unmount(&self) {
        if self.unmounted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.emit(MessageType::Unmount, Value::from(self.uuid.as_str()), None);
        (self.lifecycle.destroyed)(&self.uuid);
        self.host.destroy(&self.frame.id);
        self.cancel.cancel();
        info!(uuid = %self.uuid, "medium unmounted");
    }

    /// Yields the capability object if the connection is confirmed.
    fn resolve(self: &Arc<Self>) -> Result<Seance, ClientError> {
        match self.state() {
            ConnectionState::Connected => Ok(Seance::new(self.clone())),
            ConnectionState::Disconnected => Err(ClientError::NotConnected),
        }
    }
}

/// Client handle for one hub.
///
/// Dropping the handle stops its pumps; it does not unmount.
pub struct Medium {
    inner: Arc<Inner>,
    _recv_handle: tokio::task::JoinHandle<()>,
    _poll_handle: tokio::task::JoinHandle<()>,
}

impl Medium {
    /// Renders the proxy frame and starts the heartbeat and event pumps.
    ///
    /// Must be called within a tokio runtime. `events` carries the
    /// embedding window's messages and lifecycle signals; mounting
    /// happens on its `Load` event.
    pub fn init(
        config: MediumConfig,
        lifecycle: Lifecycle,
        host: Arc<dyn ProxyHost>,
        events: mpsc::Receiver<WindowEvent>,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        let uuid = uuid::Uuid::new_v4().to_string();
        let channel = host.create(&config.seance_origin, &uuid)?;
        let frame = ProxyFrame {
            id: uuid.clone(),
            channel,
        };
        let inner = Arc::new(Inner::new(uuid, config, lifecycle, host, frame));

        let poll_handle = tokio::spawn(crate::pumps::poll::poll_pump(inner.clone()));
        let recv_handle = tokio::spawn(crate::pumps::recv::recv_pump(inner.clone(), events));

        debug!(uuid = %inner.uuid, seance = %inner.config.seance_origin, "medium initialized");
        Ok(Self {
            inner,
            _recv_handle: recv_handle,
            _poll_handle: poll_handle,
        })
    }

    /// Resolves to the [`Seance`] capability once the hub has confirmed
    /// the connection.
    ///
    /// Makes up to `max_conn_attempts` attempts, `conn_interval` apart,
    /// then fails with [`ClientError::Unreachable`].
    pub async fn sequence(&self) -> Result<Seance, ClientError> {
        let attempts = self.inner.config.max_conn_attempts.max(1);
        for attempt in 1..=attempts {
            match self.inner.resolve() {
                Ok(api) => {
                    debug!(attempt, "connection confirmed");
                    return Ok(api);
                }
                Err(e) => trace!(attempt, attempts, error = %e, "seance not reachable yet"),
            }
            if attempt < attempts {
                tokio::time::sleep(self.inner.config.conn_interval).await;
            }
        }

        warn!(origin = %self.inner.config.seance_origin, attempts, "giving up on seance");
        Err(ClientError::Unreachable {
            origin: self.inner.config.seance_origin.clone(),
        })
    }

    pub fn uuid(&self) -> &str {
        &self.inner.uuid
    }

    pub fn seance_origin(&self) -> &str {
        &self.inner.config.seance_origin
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.state()
    }

    /// Number of requests still awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.inner.correlator.len()
    }

    /// Returns `true` once the medium has unmounted or been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Stops the pumps without unmounting.
    pub fn close(&self) {
        self.inner.cancel.cancel();
    }
}

impl Drop for Medium {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
        self._recv_handle.abort();
        self._poll_handle.abort();
    }
}
