//! Hub dispatcher: the inbound guard chain and response emission.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use seance_protocol::codec;
use seance_protocol::constants::MessageType;
use seance_protocol::envelope::{Identifier, Response};
use seance_protocol::log::ProtocolLogger;
use seance_protocol::transport::{Inbound, Transport};

use crate::HubError;
use crate::actions;
use crate::embedding::EmbeddingContext;
use crate::registry::PeerRegistry;
use crate::store::StoreAdapter;
use crate::types::HubConfig;

/// The store-owning side of the protocol.
///
/// Processing is stateless request/response apart from the
/// [`PeerRegistry`]. Responses go out through `transport`, addressed to
/// the origin of the message that caused them.
pub struct Hub<S: StoreAdapter> {
    registry: PeerRegistry,
    store: S,
    transport: Arc<dyn Transport>,
    embedding: EmbeddingContext,
    logger: ProtocolLogger,
}

impl<S: StoreAdapter> Hub<S> {
    pub fn new(
        config: HubConfig,
        store: S,
        transport: Arc<dyn Transport>,
        embedding: EmbeddingContext,
    ) -> Result<Self, HubError> {
        config.validate()?;
        Ok(Self {
            registry: PeerRegistry::new(config.origins),
            store,
            transport,
            embedding,
            logger: ProtocolLogger::new("Seance", config.logger, config.verbose),
        })
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles one inbound message. Anything failing a guard is dropped
    /// without a log entry or a response.
    pub fn recv(&mut self, message: &Inbound) {
        let origin = message.origin.as_str();
        if origin.is_empty() {
            return;
        }
        let Some(data) = message.text_data() else {
            return;
        };

        // Unknown senders are rejected before the payload is parsed.
        if !self.registry.is_candidate(origin) {
            return;
        }

        let Ok(envelope) = codec::deserialize(data) else {
            return;
        };
        let (Some(id), Some(kind), Some(payload)) =
            (envelope.id.clone(), envelope.kind.as_deref(), envelope.payload.as_ref())
        else {
            return;
        };
        // The shutdown id is never a valid request id.
        if id.is_destroy() {
            return;
        }

        // Only request types are handled; `ACK`, `CLOSE` and unknown
        // types are dropped like any other malformed input.
        let Some(kind) = MessageType::parse(kind).filter(|ty| {
            ty.is_query()
                || matches!(
                    ty,
                    MessageType::Mount | MessageType::Unmount | MessageType::Syn
                )
        }) else {
            return;
        };

        let mut detail = serde_json::to_value(&envelope).unwrap_or(Value::Null);
        if let Value::Object(obj) = &mut detail {
            obj.insert("senderOrigin".into(), Value::from(origin));
        }
        self.logger.log("recv", &detail);

        match kind {
            MessageType::Mount => self.incorporate(origin, id),
            MessageType::Unmount => self.eject(origin),
            MessageType::Syn => self.emit(Response::ack(id), origin),
            _ => self.process_action(kind, id, payload, origin),
        }
    }

    /// Registers `origin` and acknowledges the mount, but only from the
    /// genuine embedding context of that origin.
    pub fn incorporate(&mut self, origin: &str, id: Identifier) {
        if !self.registry.insert(origin) {
            return;
        }
        tracing::info!(origin, peers = self.registry.len(), "peer incorporated");

        if self.embedding.document_url() != origin {
            return;
        }
        self.emit(Response::ack(id), origin);
    }

    /// Removes `origin` from the registry. Never responds.
    pub fn eject(&mut self, origin: &str) {
        if self.registry.remove(origin).is_some() {
            tracing::info!(origin, peers = self.registry.len(), "peer ejected");
        }
    }

    /// Runs a store query and emits exactly one response for it.
    fn process_action(&mut self, kind: MessageType, id: Identifier, payload: &Value, origin: &str) {
        let outcome = match kind {
            MessageType::Get => actions::get(&self.store, payload),
            MessageType::Set => actions::set(&mut self.store, payload),
            MessageType::Delete => actions::delete(&mut self.store, payload),
            _ => return,
        };

        let response = match outcome {
            Ok(result) => Response::ok(id, result),
            Err(e) => Response::failed(id, e.to_string()),
        };
        self.emit(response, origin);
    }

    /// Broadcasts `CLOSE` to every registered peer and clears the registry.
    pub fn before_destroy(&mut self) {
        for peer in self.registry.drain() {
            self.emit(Response::close(), &peer.origin);
        }
        tracing::info!("hub torn down");
    }

    /// Sends a response to `origin`.
    fn emit(&self, response: Response, origin: &str) {
        if let Ok(Value::Object(mut detail)) = serde_json::to_value(&response) {
            detail.insert("receiverOrigin".into(), Value::from(origin));
            self.logger.log("send", &Value::Object(detail));
        }

        let data = match codec::serialize(&response) {
            Ok(d) => d,
            Err(e) => {
                warn!(id = %response.id, error = %e, "failed to serialize response");
                return;
            }
        };
        if let Err(e) = self.transport.post(data, origin) {
            warn!(id = %response.id, origin, error = %e, "failed to post response");
        }
    }
}
