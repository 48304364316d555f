//! Message pipeline extensions.
//!
//! An [`Extension`] sees every message on its way in (server to application)
//! and on its way out (application to server). Each hook receives the
//! message and a `next` continuation that hands it to the following stage,
//! and returns whatever that continuation returns. A stage that returns
//! `None` without calling `next` drops the message.
//!
//! [`Pipeline`] composes extensions in registration order for both
//! directions. Transports that do not have their own extension mechanism can
//! run their traffic through one.

use crate::types::Message;
use std::sync::Arc;

/// Continuation handing a message to the next pipeline stage.
pub type Next<'a> = &'a mut dyn FnMut(Message) -> Option<Message>;

/// A message-pipeline hook pair.
pub trait Extension: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Inspect a message arriving from the server.
    fn incoming(&self, message: Message, next: Next<'_>) -> Option<Message> {
        next(message)
    }

    /// Inspect a message about to be sent to the server.
    fn outgoing(&self, message: Message, next: Next<'_>) -> Option<Message> {
        next(message)
    }
}

/// Ordered chain of extensions.
#[derive(Clone, Default)]
pub struct Pipeline {
    extensions: Vec<Arc<dyn Extension>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extension to the end of the chain.
    pub fn push(&mut self, extension: Arc<dyn Extension>) {
        self.extensions.push(extension);
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Extension names in order.
    pub fn names(&self) -> Vec<String> {
        self.extensions.iter().map(|e| e.name().to_string()).collect()
    }

    /// Run an inbound message through every extension.
    pub fn incoming(&self, message: Message) -> Option<Message> {
        run_incoming(&self.extensions, message)
    }

    /// Run an outbound message through every extension.
    pub fn outgoing(&self, message: Message) -> Option<Message> {
        run_outgoing(&self.extensions, message)
    }
}

fn run_incoming(extensions: &[Arc<dyn Extension>], message: Message) -> Option<Message> {
    match extensions.split_first() {
        None => Some(message),
        Some((first, rest)) => first.incoming(message, &mut |m| run_incoming(rest, m)),
    }
}

fn run_outgoing(extensions: &[Arc<dyn Extension>], message: Message) -> Option<Message> {
    match extensions.split_first() {
        None => Some(message),
        Some((first, rest)) => first.outgoing(message, &mut |m| run_outgoing(rest, m)),
    }
}
