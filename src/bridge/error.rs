//! Error types for the bridge.
//!
//! Domain errors use thiserror; every [`DispatchError`] display string is the
//! exact diagnostic that travels inside a `CommandFailed` event, so the error
//! taxonomy and the protocol messages cannot drift apart.

use std::io;
use thiserror::Error;

/// Errors the dispatcher recovers into `CommandFailed` events.
///
/// None of these propagate past the dispatcher's `handle`; each handled
/// message is independent and the dispatcher stays usable after any of them.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Payload was not decodable: malformed JSON, missing envelope fields,
    /// a malformed command payload, or a value with no JSON representation.
    /// Carries the decoder's own diagnostic verbatim.
    #[error("failed to process comm data. {0}")]
    Protocol(String),

    /// The frame's payload type tag was not `"command"`.
    #[error("payload type \"{0}\" not supported")]
    UnrecognizedPayloadType(String),

    /// Unknown `commandType` discriminator.
    #[error("command \"{0}\" not supported")]
    UnsupportedCommand(String),

    /// SendValue target name is not a legal identifier.
    #[error("Invalid Identifier: \"{0}\"")]
    InvalidIdentifier(String),

    /// RequestValue named a variable absent from the store.
    #[error("Variable \"{0}\" not found.")]
    VariableNotFound(String),

    /// SendValue carried a mime type the bridge cannot decode.
    #[error("Failed to set value for \"{name}\". \"{mime_type}\" mimetype not supported.")]
    UnsupportedMimeType {
        /// Target variable name.
        name: String,
        /// The unsupported mime tag.
        mime_type: String,
    },

    /// Tabular construction from a table-schema+json payload failed.
    #[error("Cannot create pandas dataframe for: \"{name}\". {source}")]
    TableConversion {
        /// Target variable name.
        name: String,
        /// Underlying construction failure.
        source: TableError,
    },
}

/// Convenience result alias for dispatch operations.
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Failures while constructing a tabular value from a decoded payload.
#[derive(Debug, Error)]
pub enum TableError {
    /// The payload was not an object carrying a `data` field.
    #[error("table payload must be a JSON object with a \"data\" field")]
    PayloadShape,

    /// The `data` field was not an array.
    #[error("\"data\" must be an array of row records")]
    DataNotArray,

    /// A row record was not a JSON object.
    #[error("row {0} is not an object")]
    RowNotObject(usize),
}

/// Errors surfaced to the embedding host by the channel adapter.
///
/// These never reach the wire; a transport failure means there is no wire to
/// reach.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A message arrived before `open` completed. Usage error, not protocol
    /// error.
    #[error("channel has not been opened")]
    NotOpen,

    /// Transport write failed.
    #[error("channel transport error: {0}")]
    Io(#[from] io::Error),

    /// Outbound frame could not be serialized.
    #[error("failed to encode outbound frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Convenience result alias for channel operations.
pub type ChannelResult<T> = std::result::Result<T, ChannelError>;
