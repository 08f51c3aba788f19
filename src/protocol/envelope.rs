//! Frame-level encode/decode: the outer wrappers both directions travel in.
//!
//! Inbound frames arrive as `{ content: { data: { type, commandOrEvent } } }`
//! with the command JSON-encoded inside the `commandOrEvent` string. Outbound
//! frames mirror that shape one level up: `{ type: "event", commandOrEvent }`
//! where the embedded string decodes to `{ event, eventType, command }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{COMMAND_FAILED_EVENT, KernelEvent};

/// Payload type tag carried by inbound command frames.
pub const COMMAND_PAYLOAD: &str = "command";
/// Payload type tag carried by outbound event frames.
pub const EVENT_PAYLOAD: &str = "event";

/// A full inbound frame as delivered by the host channel.
#[derive(Debug, Clone, Deserialize)]
pub struct CommFrame {
    /// Host message content.
    pub content: CommContent,
}

/// The `content` object of an inbound frame.
#[derive(Debug, Clone, Deserialize)]
pub struct CommContent {
    /// The bridge-level payload.
    pub data: CommPayload,
}

/// The bridge-level payload of an inbound frame.
#[derive(Debug, Clone, Deserialize)]
pub struct CommPayload {
    /// Payload type tag; only [`COMMAND_PAYLOAD`] is dispatched.
    #[serde(rename = "type")]
    pub payload_type: String,
    /// JSON-encoded [`CommandEnvelope`](super::command::CommandEnvelope).
    #[serde(rename = "commandOrEvent")]
    pub command_or_event: String,
}

/// A serialized outbound event frame, ready for the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundFrame {
    /// Always [`EVENT_PAYLOAD`].
    #[serde(rename = "type")]
    pub payload_type: String,
    /// JSON-encoded `{ event, eventType, command }` body.
    #[serde(rename = "commandOrEvent")]
    pub command_or_event: String,
}

/// Pairs an event with its discriminator and, when available, the raw decoded
/// command it replies to.
///
/// Invariants: the serialized `eventType` always equals the discriminator of
/// the carried event, and `command` is an explicit `null` whenever no
/// triggering command is attached.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    event: KernelEvent,
    command: Option<Value>,
}

#[derive(Serialize)]
struct EnvelopeBody<'a> {
    event: &'a KernelEvent,
    #[serde(rename = "eventType")]
    event_type: &'static str,
    command: &'a Option<Value>,
}

impl EventEnvelope {
    /// Wrap an event with no command correlation.
    pub fn new(event: KernelEvent) -> Self {
        Self {
            event,
            command: None,
        }
    }

    /// Wrap an event and attach the raw decoded command it replies to.
    pub fn correlated(event: KernelEvent, command: Value) -> Self {
        Self {
            event,
            command: Some(command),
        }
    }

    /// The carried event.
    pub fn event(&self) -> &KernelEvent {
        &self.event
    }

    /// Serialize into the outer wire frame.
    pub fn into_frame(self) -> OutboundFrame {
        let body = EnvelopeBody {
            event: &self.event,
            event_type: self.event.event_type(),
            command: &self.command,
        };

        let command_or_event = match serde_json::to_string(&body) {
            Ok(text) => text,
            // Unreachable for well-formed events; keep the reply well-formed
            // anyway rather than panicking inside the protocol boundary.
            Err(err) => serde_json::json!({
                "event": { "message": format!("failed to process comm data. {err}") },
                "eventType": COMMAND_FAILED_EVENT,
                "command": Value::Null,
            })
            .to_string(),
        };

        OutboundFrame {
            payload_type: EVENT_PAYLOAD.to_string(),
            command_or_event,
        }
    }
}
