//! Pipeline extension that tracks and requests replay positions.

use super::registry::ReplayRegistry;
use crate::pipeline::{Extension, Next};
use crate::types::{channel_from_topic, topic_for, Message};
use serde_json::Map;
use std::sync::Arc;
use tracing::{debug, warn};

/// Records replay ids from inbound events and adds `ext.replay` to
/// outbound subscribe requests.
pub struct ReplayExtension {
    registry: Arc<ReplayRegistry>,
}

impl ReplayExtension {
    pub fn new(registry: Arc<ReplayRegistry>) -> Self {
        Self { registry }
    }
}

impl Extension for ReplayExtension {
    fn name(&self) -> &str {
        "replay"
    }

    fn incoming(&self, message: Message, next: Next<'_>) -> Option<Message> {
        let channel = channel_from_topic(&message.channel).to_string();
        let replay_id = message.replay_id();

        let forwarded = next(message);

        // Bookkeeping failures must not affect delivery.
        if let Some(replay_id) = replay_id {
            match self.registry.record(&channel, replay_id) {
                Ok(true) => debug!(channel = %channel, replay_id, "replay position recorded"),
                Ok(false) => {}
                Err(e) => warn!(channel = %channel, replay_id, error = %e, "failed to record replay position"),
            }
        }

        forwarded
    }

    /// Adds `ext.replay` to `/meta/subscribe` requests.
    ///
    /// Each subscribed topic whose channel is in the registry gets an entry.
    /// A request naming no registered channel is forwarded without `ext`
    /// changes; every other message is forwarded untouched.
    fn outgoing(&self, mut message: Message, next: Next<'_>) -> Option<Message> {
        if !message.is_subscribe() {
            return next(message);
        }

        let mut replay = Map::new();
        for subscription in message.subscriptions() {
            let channel = channel_from_topic(subscription);
            if let Some(value) = self.registry.resume_value(channel) {
                debug!(channel = %channel, replay = %value, "requesting replay");
                replay.insert(topic_for(channel), value);
            }
        }

        if !replay.is_empty() {
            message.set_replay_map(replay);
        }

        next(message)
    }
}
