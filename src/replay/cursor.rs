//! Replay cursors and pluggable replay stores.

use crate::error::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Sentinel: replay every event the server still retains.
pub const REPLAY_ALL: i64 = -2;

/// Sentinel: deliver only events published after subscribing.
pub const REPLAY_NEW: i64 = -1;

/// Storage for the last seen replay id per channel.
///
/// Implementations are shared between the subscribe path (reads) and the
/// inbound event path (writes), so they must be usable through `&self`.
pub trait ReplayStore: Send + Sync {
    /// Last recorded replay id for `channel`, if any.
    fn get(&self, channel: &str) -> Option<i64>;

    /// Record `replay_id` as the latest position seen on `channel`.
    fn set(&self, channel: &str, replay_id: i64) -> Result<()>;
}

/// In-memory replay store.
///
/// Positions live as long as the store; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryReplayStore {
    positions: RwLock<HashMap<String, i64>>,
}

impl MemoryReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channels with a recorded position.
    pub fn len(&self) -> usize {
        self.positions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.read().is_empty()
    }
}

impl ReplayStore for MemoryReplayStore {
    fn get(&self, channel: &str) -> Option<i64> {
        self.positions.read().get(channel).copied()
    }

    fn set(&self, channel: &str, replay_id: i64) -> Result<()> {
        self.positions.write().insert(channel.to_string(), replay_id);
        Ok(())
    }
}

/// Where a channel resumes from when it is (re)subscribed.
#[derive(Clone)]
pub enum ReplayCursor {
    /// A sentinel or explicit replay id. Never advanced by inbound events.
    Fixed(i64),
    /// A store that is read on subscribe and advanced by inbound events.
    Dynamic(Arc<dyn ReplayStore>),
    /// A caller-supplied value forwarded to the server as-is.
    Passthrough(Value),
}

impl ReplayCursor {
    /// Replay all retained events.
    pub fn all() -> Self {
        ReplayCursor::Fixed(REPLAY_ALL)
    }

    /// Only new events.
    pub fn new_events() -> Self {
        ReplayCursor::Fixed(REPLAY_NEW)
    }

    pub fn dynamic(store: Arc<dyn ReplayStore>) -> Self {
        ReplayCursor::Dynamic(store)
    }

    pub fn passthrough(value: Value) -> Self {
        ReplayCursor::Passthrough(value)
    }

    /// Value to send in `ext.replay` when subscribing to `channel`.
    ///
    /// A dynamic store with nothing recorded for `channel` yet resumes from
    /// [`REPLAY_ALL`], the same position a fresh default cursor requests.
    pub fn resume_value(&self, channel: &str) -> Value {
        match self {
            ReplayCursor::Fixed(id) => Value::from(*id),
            ReplayCursor::Dynamic(store) => Value::from(store.get(channel).unwrap_or(REPLAY_ALL)),
            ReplayCursor::Passthrough(value) => value.clone(),
        }
    }

    /// Whether inbound events may advance this cursor.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ReplayCursor::Dynamic(_))
    }
}

impl Default for ReplayCursor {
    fn default() -> Self {
        Self::all()
    }
}

impl From<i64> for ReplayCursor {
    fn from(id: i64) -> Self {
        ReplayCursor::Fixed(id)
    }
}

impl From<Arc<MemoryReplayStore>> for ReplayCursor {
    fn from(store: Arc<MemoryReplayStore>) -> Self {
        ReplayCursor::Dynamic(store)
    }
}

impl From<Arc<dyn ReplayStore>> for ReplayCursor {
    fn from(store: Arc<dyn ReplayStore>) -> Self {
        ReplayCursor::Dynamic(store)
    }
}

impl fmt::Debug for ReplayCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayCursor::Fixed(id) => write!(f, "Fixed({})", id),
            ReplayCursor::Dynamic(_) => write!(f, "Dynamic(..)"),
            ReplayCursor::Passthrough(value) => write!(f, "Passthrough({})", value),
        }
    }
}

impl PartialEq for ReplayCursor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ReplayCursor::Fixed(a), ReplayCursor::Fixed(b)) => a == b,
            (ReplayCursor::Dynamic(a), ReplayCursor::Dynamic(b)) => Arc::ptr_eq(a, b),
            (ReplayCursor::Passthrough(a), ReplayCursor::Passthrough(b)) => a == b,
            _ => false,
        }
    }
}
