//! Outbound wire schema: kernel events.
//!
//! Events are serialized untagged; the discriminator travels separately in
//! the envelope's `eventType` field (see [`super::envelope`]).

use serde::Serialize;
use serde_json::Value;

use super::command::FormattedValue;

/// Event discriminator emitted once when a channel opens.
pub const KERNEL_READY_EVENT: &str = "KernelReady";
/// Event discriminator for a command that completed without a value.
pub const COMMAND_SUCCEEDED_EVENT: &str = "CommandSucceeded";
/// Event discriminator for a command that failed.
pub const COMMAND_FAILED_EVENT: &str = "CommandFailed";
/// Event discriminator for a single produced value.
pub const VALUE_PRODUCED_EVENT: &str = "ValueProduced";
/// Event discriminator for an enumeration of bound variables.
pub const VALUE_INFOS_PRODUCED_EVENT: &str = "ValueInfosProduced";

/// Outcome of handling one inbound message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KernelEvent {
    /// The bridge is up and listening.
    KernelReady(KernelReady),
    /// The command succeeded and produced no value.
    CommandSucceeded(CommandSucceeded),
    /// The command failed; carries a human-readable diagnostic.
    CommandFailed(CommandFailed),
    /// A single variable's value.
    ValueProduced(ValueProduced),
    /// The full variable enumeration.
    ValueInfosProduced(ValueInfosProduced),
}

impl KernelEvent {
    /// Wire discriminator for this event's variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            KernelEvent::KernelReady(_) => KERNEL_READY_EVENT,
            KernelEvent::CommandSucceeded(_) => COMMAND_SUCCEEDED_EVENT,
            KernelEvent::CommandFailed(_) => COMMAND_FAILED_EVENT,
            KernelEvent::ValueProduced(_) => VALUE_PRODUCED_EVENT,
            KernelEvent::ValueInfosProduced(_) => VALUE_INFOS_PRODUCED_EVENT,
        }
    }

    /// Build a `KernelReady` event with an empty kernel-info list.
    pub fn ready() -> Self {
        KernelEvent::KernelReady(KernelReady {
            kernel_infos: Vec::new(),
        })
    }

    /// Build a `CommandSucceeded` event.
    pub fn succeeded() -> Self {
        KernelEvent::CommandSucceeded(CommandSucceeded {})
    }

    /// Build a `CommandFailed` event carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        KernelEvent::CommandFailed(CommandFailed {
            message: message.into(),
        })
    }

    /// Build a `ValueProduced` event.
    pub fn value_produced(
        name: impl Into<String>,
        value: Value,
        formatted_value: FormattedValue,
    ) -> Self {
        KernelEvent::ValueProduced(ValueProduced {
            name: name.into(),
            value,
            formatted_value,
        })
    }

    /// Build a `ValueInfosProduced` event.
    pub fn value_infos_produced(value_infos: Vec<KernelValueInfo>) -> Self {
        KernelEvent::ValueInfosProduced(ValueInfosProduced { value_infos })
    }
}

/// Payload of `KernelReady`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelReady {
    /// Host kernel descriptors; always empty for this bridge.
    pub kernel_infos: Vec<Value>,
}

/// Payload of `CommandSucceeded`. Serializes as the empty object.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSucceeded {}

/// Payload of `CommandFailed`.
#[derive(Debug, Clone, Serialize)]
pub struct CommandFailed {
    /// Human-readable diagnostic. Never a panic, never a fault.
    pub message: String,
}

/// Payload of `ValueProduced`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueProduced {
    /// Variable identifier.
    pub name: String,
    /// The value in its natural decoded form: a JSON scalar or structure,
    /// or an array of row records for tabular values.
    pub value: Value,
    /// The presentation encoding of the same value.
    pub formatted_value: FormattedValue,
}

/// Payload of `ValueInfosProduced`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueInfosProduced {
    /// One entry per enumerated variable, in store enumeration order.
    pub value_infos: Vec<KernelValueInfo>,
}

/// One enumerated variable: its name, formatted preview, and runtime type
/// label. The label is descriptive only and never used for dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelValueInfo {
    /// Variable identifier.
    pub name: String,
    /// Formatted preview of the current value.
    pub formatted_value: FormattedValue,
    /// Runtime type label, e.g. `"string"` or `"table"`.
    pub type_name: String,
}
