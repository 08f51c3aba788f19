//! The command dispatcher: the core of the bridge.
//!
//! One inbound payload in, one outbound event frame out, synchronously.
//! Commands are parsed, routed by `commandType`, executed against the
//! injected variable store, and the outcome is wrapped in an event envelope.
//! Every failure path is recovered locally into a `CommandFailed` event;
//! `handle` never raises past the protocol boundary.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use super::BridgeConfig;
use super::error::{DispatchError, DispatchResult};
use super::store::VariableStore;
use super::value::{TableValue, Value};
use crate::protocol::command::{
    CommandEnvelope, MIME_JSON, MIME_TABLE_SCHEMA, REQUEST_VALUE_COMMAND,
    REQUEST_VALUE_INFOS_COMMAND, RequestValue, SEND_VALUE_COMMAND, SendValue,
};
use crate::protocol::envelope::{
    COMMAND_PAYLOAD, CommFrame, CommPayload, EventEnvelope, OutboundFrame,
};
use crate::protocol::event::{KernelEvent, KernelValueInfo};

/// Parses inbound payloads, routes commands, and produces event frames.
pub struct CommandDispatcher {
    store: Arc<dyn VariableStore>,
    config: BridgeConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher over `store` with the default configuration.
    pub fn new(store: Arc<dyn VariableStore>) -> Self {
        Self::with_config(store, BridgeConfig::default())
    }

    /// Create a dispatcher with an explicit configuration.
    pub fn with_config(store: Arc<dyn VariableStore>, config: BridgeConfig) -> Self {
        Self { store, config }
    }

    /// The `KernelReady` frame sent once when a channel opens.
    pub fn is_ready(&self) -> OutboundFrame {
        EventEnvelope::new(KernelEvent::ready()).into_frame()
    }

    /// Handle one decoded inbound payload, producing the reply frame.
    pub fn handle(&self, payload: &CommPayload) -> OutboundFrame {
        match self.dispatch(payload) {
            Ok(envelope) => envelope.into_frame(),
            Err(err) => {
                tracing::debug!(error = %err, "command failed");
                EventEnvelope::new(KernelEvent::failed(err.to_string())).into_frame()
            }
        }
    }

    /// Handle one raw inbound frame, parsing the outer wrapper first.
    ///
    /// Transports that deliver text (the stdio daemon) funnel through here;
    /// outer parse failures take the same `CommandFailed` path as malformed
    /// command bodies.
    pub fn handle_frame(&self, raw: &str) -> OutboundFrame {
        match serde_json::from_str::<CommFrame>(raw) {
            Ok(frame) => self.handle(&frame.content.data),
            Err(err) => {
                tracing::debug!(error = %err, "unparseable inbound frame");
                EventEnvelope::new(KernelEvent::failed(
                    DispatchError::Protocol(err.to_string()).to_string(),
                ))
                .into_frame()
            }
        }
    }

    fn dispatch(&self, payload: &CommPayload) -> DispatchResult<EventEnvelope> {
        if payload.payload_type != COMMAND_PAYLOAD {
            return Err(DispatchError::UnrecognizedPayloadType(
                payload.payload_type.clone(),
            ));
        }

        let raw: Json = serde_json::from_str(&payload.command_or_event)
            .map_err(|err| DispatchError::Protocol(err.to_string()))?;
        let command: CommandEnvelope = serde_json::from_value(raw.clone())
            .map_err(|err| DispatchError::Protocol(err.to_string()))?;

        tracing::debug!(
            command_type = %command.command_type,
            id = %command.id,
            "received command"
        );

        match command.command_type.as_str() {
            SEND_VALUE_COMMAND => self.handle_send_value(&command),
            REQUEST_VALUE_COMMAND => self.handle_request_value(&command, raw),
            REQUEST_VALUE_INFOS_COMMAND => self.handle_request_value_infos(raw),
            other => {
                tracing::warn!(command_type = %other, "unsupported command");
                Err(DispatchError::UnsupportedCommand(other.to_string()))
            }
        }
    }

    fn handle_send_value(&self, command: &CommandEnvelope) -> DispatchResult<EventEnvelope> {
        let send: SendValue = parse_payload(&command.command)?;

        if !is_valid_identifier(&send.name) {
            return Err(DispatchError::InvalidIdentifier(send.name));
        }

        let encoded = send.formatted_value.value.as_deref().ok_or_else(|| {
            DispatchError::Protocol("formattedValue.value is null".to_string())
        })?;

        let value = match send.formatted_value.mime_type.as_str() {
            MIME_JSON => Value::Scalar(parse_json(encoded)?),
            MIME_TABLE_SCHEMA => {
                let payload = parse_json(encoded)?;
                let table = TableValue::from_payload(&payload).map_err(|source| {
                    tracing::debug!(name = %send.name, error = %source, "table conversion failed");
                    DispatchError::TableConversion {
                        name: send.name.clone(),
                        source,
                    }
                })?;
                Value::Table(table)
            }
            _ => {
                return Err(DispatchError::UnsupportedMimeType {
                    name: send.name.clone(),
                    mime_type: send.formatted_value.mime_type.clone(),
                });
            }
        };

        self.store.set(&send.name, value);
        Ok(EventEnvelope::new(KernelEvent::succeeded()))
    }

    fn handle_request_value(
        &self,
        command: &CommandEnvelope,
        raw: Json,
    ) -> DispatchResult<EventEnvelope> {
        let request: RequestValue = parse_payload(&command.command)?;

        let value = self
            .store
            .get(&request.name)
            .ok_or_else(|| DispatchError::VariableNotFound(request.name.clone()))?;

        let formatted = value.formatted(&request.mime_type, self.config.preview_max_rows)?;
        let natural = value.natural()?;

        Ok(EventEnvelope::correlated(
            KernelEvent::value_produced(request.name, natural, formatted),
            raw,
        ))
    }

    fn handle_request_value_infos(&self, raw: Json) -> DispatchResult<EventEnvelope> {
        let mut infos = Vec::new();
        for name in self.store.names() {
            // A concurrently mutating runtime may unbind between names() and
            // get(); skip rather than fail the whole enumeration.
            let Some(value) = self.store.get(&name) else {
                continue;
            };

            let type_name = value.type_name();
            if self.config.excluded_types.iter().any(|t| *t == type_name) {
                continue;
            }

            let formatted = value.formatted(MIME_JSON, self.config.preview_max_rows)?;
            infos.push(KernelValueInfo {
                name,
                formatted_value: formatted,
                type_name,
            });
        }

        Ok(EventEnvelope::correlated(
            KernelEvent::value_infos_produced(infos),
            raw,
        ))
    }
}

fn parse_payload<T: DeserializeOwned>(payload: &Json) -> DispatchResult<T> {
    serde_json::from_value(payload.clone()).map_err(|err| DispatchError::Protocol(err.to_string()))
}

fn parse_json(text: &str) -> DispatchResult<Json> {
    serde_json::from_str(text).map_err(|err| DispatchError::Protocol(err.to_string()))
}

/// Language-agnostic identifier rule: non-empty, starts with a letter or
/// underscore, remaining characters letters, digits, or underscores.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
