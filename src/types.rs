//! Core wire types for the replay layer.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix that turns a bare channel name into a wire topic.
pub const TOPIC_PREFIX: &str = "/topic/";

/// Meta channel carrying subscribe requests.
pub const META_SUBSCRIBE: &str = "/meta/subscribe";

/// Meta channel carrying server-initiated disconnects.
pub const META_DISCONNECT: &str = "/meta/disconnect";

/// Build the wire topic for a bare channel name.
pub fn topic_for(channel: &str) -> String {
    format!("{}{}", TOPIC_PREFIX, channel)
}

/// Strip the topic prefix, yielding the bare channel name.
///
/// Names without the prefix are returned as-is.
pub fn channel_from_topic(topic: &str) -> &str {
    topic.strip_prefix(TOPIC_PREFIX).unwrap_or(topic)
}

/// A Bayeux message as it passes through the extension pipeline.
///
/// Only `channel` is typed. Every other field stays in `extra` exactly as
/// received (including explicit `null`s) and is serialized back untouched;
/// the accessors below read and write the fields the replay layer uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub channel: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// A bare message on the given channel.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            extra: Map::new(),
        }
    }

    /// A `/meta/subscribe` request for a wire topic.
    pub fn subscribe(topic: impl Into<String>) -> Self {
        let mut message = Self::new(META_SUBSCRIBE);
        message
            .extra
            .insert("subscription".to_string(), Value::String(topic.into()));
        message
    }

    /// An event delivered on `topic` carrying the given replay id.
    pub fn event(topic: impl Into<String>, replay_id: i64) -> Self {
        let mut message = Self::new(topic);
        message.set_data(serde_json::json!({ "event": { "replayId": replay_id } }));
        message
    }

    /// Parse a message from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the message to JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether this is a `/meta/subscribe` request.
    pub fn is_subscribe(&self) -> bool {
        self.channel == META_SUBSCRIBE
    }

    /// Whether this is a `/meta/disconnect` notification.
    pub fn is_disconnect(&self) -> bool {
        self.channel == META_DISCONNECT
    }

    /// The `data` field, if present.
    pub fn data(&self) -> Option<&Value> {
        self.extra.get("data")
    }

    pub fn set_data(&mut self, data: Value) {
        self.extra.insert("data".to_string(), data);
    }

    /// Topics named by `subscription`.
    ///
    /// Bayeux allows either a single string or an array of strings;
    /// non-string array entries are skipped.
    pub fn subscriptions(&self) -> Vec<&str> {
        match self.extra.get("subscription") {
            Some(Value::String(topic)) => vec![topic.as_str()],
            Some(Value::Array(topics)) => topics.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Delivery position at `data.event.replayId`, if present and integral.
    pub fn replay_id(&self) -> Option<i64> {
        self.data()?.get("event")?.get("replayId")?.as_i64()
    }

    /// The `ext` object, if set.
    pub fn ext(&self) -> Option<&Map<String, Value>> {
        self.extra.get("ext")?.as_object()
    }

    /// The `ext.replay` map, if set.
    pub fn replay_ext(&self) -> Option<&Map<String, Value>> {
        self.ext()?.get("replay")?.as_object()
    }

    /// Set `ext.replay` to `{ topic: value }`, keeping other `ext` entries.
    pub fn set_replay(&mut self, topic: &str, value: Value) {
        let mut replay = Map::new();
        replay.insert(topic.to_string(), value);
        self.set_replay_map(replay);
    }

    /// Set `ext.replay` to `replay`, keeping other `ext` entries.
    ///
    /// A missing or non-object `ext` is replaced by a fresh object.
    pub fn set_replay_map(&mut self, replay: Map<String, Value>) {
        let ext = self
            .extra
            .entry("ext")
            .or_insert_with(|| Value::Object(Map::new()));
        if !ext.is_object() {
            *ext = Value::Object(Map::new());
        }
        if let Value::Object(ext) = ext {
            ext.insert("replay".to_string(), Value::Object(replay));
        }
    }
}
