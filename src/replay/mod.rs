//! Replay tracking for durable topic subscriptions.
//!
//! - `cursor`: where a channel resumes from, and pluggable stores
//! - `registry`: channel to cursor map shared by the session
//! - `extension`: pipeline hook that reads and writes the registry

mod cursor;
mod extension;
mod registry;

pub use cursor::{MemoryReplayStore, ReplayCursor, ReplayStore, REPLAY_ALL, REPLAY_NEW};
pub use extension::ReplayExtension;
pub use registry::ReplayRegistry;
