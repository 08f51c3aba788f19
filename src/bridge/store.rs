//! The variable store seam between the bridge and the hosting runtime.
//!
//! The dispatcher neither owns nor lifecycle-manages the namespace it reads
//! and writes; it goes through [`VariableStore`] so the hosting runtime's
//! binding mechanism stays out of the protocol and the dispatcher stays
//! independently testable.

use parking_lot::RwLock;

use super::value::Value;

/// External namespace of named values the dispatcher reads and writes on
/// behalf of commands.
///
/// `names` enumerates the currently bound user-level variable names in
/// source order. Callers must not assume the order is alphabetical.
pub trait VariableStore: Send + Sync {
    /// Read the value bound to `name`, if any.
    fn get(&self, name: &str) -> Option<Value>;

    /// Bind `name` to `value`, replacing any existing binding.
    fn set(&self, name: &str, value: Value);

    /// Enumerate bound names in source order.
    fn names(&self) -> Vec<String>;
}

/// Shared in-memory store preserving insertion order.
///
/// Rebinding an existing name keeps its enumeration position, the way a
/// live interpreter namespace would.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<Vec<(String, Value)>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableStore for InMemoryStore {
    fn get(&self, name: &str) -> Option<Value> {
        self.entries
            .read()
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value.clone())
    }

    fn set(&self, name: &str, value: Value) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|(bound, _)| bound == name) {
            Some(entry) => entry.1 = value,
            None => entries.push((name.to_string(), value)),
        }
    }

    fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enumeration_preserves_insertion_order() {
        let store = InMemoryStore::new();
        store.set("zebra", Value::Scalar(json!(1)));
        store.set("apple", Value::Scalar(json!(2)));
        store.set("mango", Value::Scalar(json!(3)));

        assert_eq!(store.names(), ["zebra", "apple", "mango"]);
    }

    #[test]
    fn rebinding_keeps_the_original_position() {
        let store = InMemoryStore::new();
        store.set("a", Value::Scalar(json!(1)));
        store.set("b", Value::Scalar(json!(2)));
        store.set("a", Value::Scalar(json!(3)));

        assert_eq!(store.names(), ["a", "b"]);
        assert_eq!(store.get("a"), Some(Value::Scalar(json!(3))));
    }

    #[test]
    fn get_on_missing_name_is_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("missing"), None);
    }
}
