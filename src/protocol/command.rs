//! Inbound wire schema: commands and their typed payloads.
//!
//! This module centralises the command-side record layouts exchanged with the
//! front-end orchestrator. Keeping the schema in one place keeps the
//! dispatcher, the channel adapter, and the tests in lockstep.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command discriminator for writing a variable into the kernel namespace.
pub const SEND_VALUE_COMMAND: &str = "SendValue";
/// Command discriminator for reading a single variable back.
pub const REQUEST_VALUE_COMMAND: &str = "RequestValue";
/// Command discriminator for enumerating all bound variables.
pub const REQUEST_VALUE_INFOS_COMMAND: &str = "RequestValueInfos";

/// Mime tag for generic JSON-encoded scalar or structured values.
pub const MIME_JSON: &str = "application/json";
/// Mime tag for tabular values (schema plus row records on the way in, a
/// textual preview on the way out).
pub const MIME_TABLE_SCHEMA: &str = "application/table-schema+json";

/// A decoded inbound command.
///
/// All five fields are required; a frame missing any of them is rejected as
/// malformed before dispatch. `command` stays a raw [`Value`] here and is
/// re-parsed into the payload type selected by `command_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    /// Opaque transaction token assigned by the sender.
    pub token: String,
    /// Unique request identifier.
    pub id: String,
    /// Discriminator selecting the payload type and handler.
    pub command_type: String,
    /// Type-specific payload, parsed per `command_type`.
    pub command: Value,
    /// Ordered hop identifiers. Preserved, never interpreted.
    pub routing_slip: Vec<String>,
}

/// Payload of a `SendValue` command.
///
/// Routing metadata the sender includes alongside (`targetKernelName` and
/// friends) is deliberately not modelled; it survives untouched in the raw
/// command echo.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendValue {
    /// Target variable identifier.
    pub name: String,
    /// The encoded value to bind.
    pub formatted_value: FormattedValue,
}

/// Payload of a `RequestValue` command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestValue {
    /// Variable identifier to read.
    pub name: String,
    /// Preferred output encoding.
    pub mime_type: String,
}

/// A value paired with the content-type tag describing its encoding.
///
/// `value` is `None` only to represent "no value produced", e.g. a scalar
/// requested under a mime type the formatter does not render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedValue {
    /// Content-type tag.
    pub mime_type: String,
    /// Encoded value text, or `None` for "no value produced".
    pub value: Option<String>,
}

impl FormattedValue {
    /// Pair an encoded text with its mime tag.
    pub fn new(mime_type: impl Into<String>, value: Option<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            value,
        }
    }
}
