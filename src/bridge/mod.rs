//! Bridge core: dispatcher, channel adapter, variable store, value model.
//!
//! This module provides the pieces an embedding host wires together: a
//! [`CommandDispatcher`] over a [`VariableStore`], attached to a transport
//! through a [`ChannelTarget`].

use serde::{Deserialize, Serialize};

// Submodules
pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod store;
pub mod value;

/// Configuration for the bridge dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Maximum rows rendered into a tabular preview.
    pub preview_max_rows: usize,

    /// Runtime type labels excluded from variable enumeration.
    pub excluded_types: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            preview_max_rows: 5,
            excluded_types: vec!["module".to_string()],
        }
    }
}

pub use channel::{ChannelTarget, CommChannel, WriterChannel};
pub use dispatcher::CommandDispatcher;
pub use error::{ChannelError, DispatchError, TableError};
pub use store::{InMemoryStore, VariableStore};
pub use value::{TableValue, Value};
