//! Tether – a command/event variable-sharing bridge between a notebook
//! front-end and an embedded kernel
//!
//! This crate implements the command-event dispatch protocol with:
//! - JSON-encoded commands in, JSON-encoded events out, one reply per frame
//! - Three variable-exchange operations: set, read, enumerate
//! - Value formatting across scalars and tabular data
//! - Local recovery of every failure into a well-formed `CommandFailed` event
//! - A stdio/TCP daemon for hosts that speak newline-delimited JSON

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Bridge core: dispatcher, channel adapter, store, value model
pub mod bridge;

/// Wire schema: commands, events, envelopes
pub mod protocol;

// Re-export key types for convenience
pub use bridge::{BridgeConfig, ChannelTarget, CommandDispatcher, InMemoryStore, VariableStore};

/// Current version of the Tether bridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
