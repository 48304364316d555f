//! Subscription options and channel arguments.

use crate::replay::ReplayCursor;

/// Options for a subscribe call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscribeOptions {
    /// Cursor registered for channels not yet known to the session.
    /// Default: replay all retained events.
    pub replay: ReplayCursor,
}

impl SubscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replay(mut self, replay: impl Into<ReplayCursor>) -> Self {
        self.replay = replay.into();
        self
    }
}

/// One channel name or an ordered list of them.
pub trait IntoChannels {
    fn into_channels(self) -> Vec<String>;
}

impl IntoChannels for &str {
    fn into_channels(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoChannels for String {
    fn into_channels(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoChannels for Vec<String> {
    fn into_channels(self) -> Vec<String> {
        self
    }
}

impl IntoChannels for Vec<&str> {
    fn into_channels(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoChannels for &[&str] {
    fn into_channels(self) -> Vec<String> {
        self.iter().map(|c| c.to_string()).collect()
    }
}

impl<const N: usize> IntoChannels for [&str; N] {
    fn into_channels(self) -> Vec<String> {
        self.iter().map(|c| c.to_string()).collect()
    }
}
