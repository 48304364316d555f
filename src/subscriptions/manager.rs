//! Subscription manager: the public entry point for topic subscriptions.

use crate::error::Result;
use crate::replay::ReplayCursor;
use crate::session::TransportSession;
use crate::transport::Connection;
use crate::types::{topic_for, Message};
use crossbeam_channel::{bounded, Receiver, TrySendError};
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{IntoChannels, SubscribeOptions};

/// Subscribes to topics over a [`TransportSession`] and tracks replay
/// cursors per channel.
pub struct SubscriptionManager<C: Connection> {
    session: TransportSession<C>,
}

impl<C: Connection> SubscriptionManager<C> {
    pub fn new(session: TransportSession<C>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &TransportSession<C> {
        &self.session
    }

    /// Subscribe to one or more channels.
    ///
    /// Channels not yet known get `options.replay` as their cursor; known
    /// channels keep the cursor they were first registered with. Returns the
    /// transport's subscription handle.
    pub fn subscribe<F>(
        &self,
        channels: impl IntoChannels,
        options: SubscribeOptions,
        on_message: F,
    ) -> Result<C::Subscription>
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        let channels = channels.into_channels();
        let registry = self.session.registry();

        for channel in &channels {
            if registry.register(channel, options.replay.clone()) {
                debug!(channel = %channel, cursor = ?options.replay, "registered replay cursor");
            }
        }

        let topics: Vec<String> = channels.iter().map(|c| topic_for(c)).collect();
        self.session
            .connection()
            .subscribe(&topics, Box::new(on_message))
    }

    /// Subscribe and receive messages on a bounded channel.
    ///
    /// Messages that arrive while the buffer is full, or after the receiver
    /// is dropped, are discarded.
    pub fn subscribe_stream(
        &self,
        channels: impl IntoChannels,
        options: SubscribeOptions,
        capacity: usize,
    ) -> Result<(C::Subscription, Receiver<Message>)> {
        let (sender, receiver) = bounded(capacity);
        let subscription = self.subscribe(channels, options, move |message: Message| {
            match sender.try_send(message) {
                Ok(()) => {}
                Err(TrySendError::Full(m)) => {
                    warn!(channel = %m.channel, "subscription buffer full, dropping message")
                }
                Err(TrySendError::Disconnected(m)) => {
                    debug!(channel = %m.channel, "subscription receiver dropped, discarding message")
                }
            }
        })?;
        Ok((subscription, receiver))
    }

    /// Register the callback fired on `/meta/disconnect`, replacing any
    /// previous one.
    pub fn on_disconnect<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.session.on_disconnect(Arc::new(callback));
    }

    /// Cursor currently registered for `channel`.
    pub fn replay_cursor(&self, channel: &str) -> Option<ReplayCursor> {
        self.session.registry().get(channel)
    }
}
