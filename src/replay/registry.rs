//! Per-channel replay cursor registry.

use super::cursor::ReplayCursor;
use crate::error::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Maps bare channel names to the cursor they resume from.
///
/// Entries are added on subscribe and never removed.
#[derive(Debug, Default)]
pub struct ReplayRegistry {
    cursors: RwLock<HashMap<String, ReplayCursor>>,
}

impl ReplayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `cursor` for `channel` unless one is already present.
    ///
    /// Returns true if the cursor was inserted.
    pub fn register(&self, channel: &str, cursor: ReplayCursor) -> bool {
        let mut cursors = self.cursors.write();
        if cursors.contains_key(channel) {
            return false;
        }
        cursors.insert(channel.to_string(), cursor);
        true
    }

    /// Cursor registered for `channel`.
    pub fn get(&self, channel: &str) -> Option<ReplayCursor> {
        self.cursors.read().get(channel).cloned()
    }

    /// Resume value for `channel`, or `None` if it was never registered.
    ///
    /// Subscribe requests for unregistered channels therefore go out without
    /// an `ext.replay` entry and the server applies its own default.
    pub fn resume_value(&self, channel: &str) -> Option<Value> {
        // Clone out so store reads happen without the registry lock held.
        let cursor = self.get(channel)?;
        Some(cursor.resume_value(channel))
    }

    /// Advance the cursor for `channel` to `replay_id`.
    ///
    /// Only dynamic cursors move; returns whether a store was written.
    pub fn record(&self, channel: &str, replay_id: i64) -> Result<bool> {
        match self.get(channel) {
            Some(ReplayCursor::Dynamic(store)) => {
                store.set(channel, replay_id)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Registered channel names, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.cursors.read().keys().cloned().collect();
        channels.sort();
        channels
    }

    pub fn len(&self) -> usize {
        self.cursors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplayError;
    use crate::replay::cursor::{MemoryReplayStore, ReplayStore};
    use serde_json::json;
    use std::sync::Arc;

    struct FailingStore;

    impl ReplayStore for FailingStore {
        fn get(&self, _channel: &str) -> Option<i64> {
            None
        }

        fn set(&self, _channel: &str, _replay_id: i64) -> Result<()> {
            Err(ReplayError::Store("disk full".to_string()))
        }
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = ReplayRegistry::new();

        assert!(registry.register("a", ReplayCursor::Fixed(10)));
        assert!(!registry.register("a", ReplayCursor::Fixed(20)));

        assert_eq!(registry.get("a"), Some(ReplayCursor::Fixed(10)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_record_only_moves_dynamic() {
        let registry = ReplayRegistry::new();
        let store = Arc::new(MemoryReplayStore::new());

        registry.register("fixed", ReplayCursor::Fixed(-1));
        registry.register("opaque", ReplayCursor::passthrough(json!("x")));
        registry.register("dyn", ReplayCursor::from(store.clone()));

        assert!(!registry.record("fixed", 9).unwrap());
        assert!(!registry.record("opaque", 9).unwrap());
        assert!(!registry.record("unknown", 9).unwrap());
        assert!(registry.record("dyn", 9).unwrap());

        assert_eq!(registry.resume_value("fixed"), Some(json!(-1)));
        assert_eq!(registry.resume_value("opaque"), Some(json!("x")));
        assert_eq!(registry.resume_value("dyn"), Some(json!(9)));
        assert_eq!(registry.resume_value("unknown"), None);
    }

    #[test]
    fn test_record_surfaces_store_errors() {
        let registry = ReplayRegistry::new();
        registry.register("a", ReplayCursor::dynamic(Arc::new(FailingStore)));

        let result = registry.record("a", 3);
        assert!(matches!(result, Err(ReplayError::Store(_))));
    }

    #[test]
    fn test_channels_sorted() {
        let registry = ReplayRegistry::new();
        registry.register("b", ReplayCursor::default());
        registry.register("a", ReplayCursor::default());
        assert_eq!(registry.channels(), vec!["a".to_string(), "b".to_string()]);
    }
}
