//! Collaborator traits for the underlying long-polling client.
//!
//! The handshake, connect loop and network retries belong to the transport.
//! This crate only needs the primitives below to wire itself in.

use crate::error::Result;
use crate::pipeline::Extension;
use crate::types::Message;
use std::fmt;
use std::sync::Arc;

/// Callback receiving messages for subscribed topics.
pub type MessageHandler = Box<dyn Fn(Message) + Send + Sync>;

/// Handler bound to a transport lifecycle event.
///
/// Errors are returned to the transport, which decides what to do with them.
pub type EventHandler = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// Transport-level connectivity events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportEvent {
    /// The transport regained connectivity.
    Up,
    /// The transport lost connectivity.
    Down,
}

impl TransportEvent {
    /// Event name as used by CometD clients.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportEvent::Up => "transport:up",
            TransportEvent::Down => "transport:down",
        }
    }
}

impl fmt::Display for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An established client connection.
///
/// All methods take `&self`; lifecycle handlers hold a weak reference to the
/// connection and call back into it.
pub trait Connection: Send + Sync {
    /// Whatever the transport hands back for a subscription.
    type Subscription;

    /// Subscribe to wire topics, delivering matching messages to `on_message`.
    fn subscribe(&self, topics: &[String], on_message: MessageHandler)
        -> Result<Self::Subscription>;

    /// Bind a handler to a lifecycle event.
    fn bind(&self, event: TransportEvent, handler: EventHandler);

    /// Set a header sent with every request.
    fn set_header(&self, name: &str, value: &str);

    /// Append an extension to the message pipeline.
    fn add_extension(&self, extension: Arc<dyn Extension>);
}

/// Factory for connections.
pub trait Transport {
    type Connection: Connection;

    fn connect(&self, url: &str) -> Result<Self::Connection>;
}

/// Source of fresh bearer tokens.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self) -> Result<String>;
}

impl<F> Authenticator for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn authenticate(&self) -> Result<String> {
        self()
    }
}
