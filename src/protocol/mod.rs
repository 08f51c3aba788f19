//! Wire schema for the command/event protocol.
//!
//! The front-end sends commands, the bridge answers with events; both travel
//! JSON-encoded inside a `commandOrEvent` string wrapped in a typed frame.
//! [`command`] models the inbound half, [`event`] the outbound half, and
//! [`envelope`] the frame wrappers and reply correlation.

pub mod command;
pub mod envelope;
pub mod event;

pub use command::{
    CommandEnvelope, FormattedValue, MIME_JSON, MIME_TABLE_SCHEMA, RequestValue, SendValue,
};
pub use envelope::{CommFrame, CommPayload, EventEnvelope, OutboundFrame};
pub use event::{KernelEvent, KernelValueInfo};
