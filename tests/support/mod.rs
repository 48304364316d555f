//! In-memory transport used by the integration tests.

#![allow(dead_code)]

use bayeux_replay::{
    Authenticator, Connection, EventHandler, Extension, Message, MessageHandler, Pipeline,
    ReplayError, Result, SessionConfig, Transport, TransportEvent, AUTHORIZATION_HEADER,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

type SharedHandler = Arc<dyn Fn() -> Result<()> + Send + Sync>;
type SharedMessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

/// Route crate logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> SessionConfig {
    SessionConfig {
        instance_url: Some("https://test.example.com".to_string()),
        api_version: "41.0".to_string(),
        oauth_token: "initial-token".to_string(),
    }
}

/// Transport that hands out [`FakeConnection`]s and remembers the URLs.
#[derive(Default)]
pub struct FakeTransport {
    pub connects: Mutex<Vec<String>>,
}

impl Transport for FakeTransport {
    type Connection = FakeConnection;

    fn connect(&self, url: &str) -> Result<FakeConnection> {
        self.connects.lock().push(url.to_string());
        Ok(FakeConnection::new(url))
    }
}

/// Handle returned by [`FakeConnection::subscribe`].
#[derive(Debug, Clone, PartialEq)]
pub struct FakeSubscription {
    pub id: u64,
    pub topics: Vec<String>,
}

/// Connection that runs traffic through a [`Pipeline`] synchronously.
pub struct FakeConnection {
    pub url: String,
    headers: Mutex<HashMap<String, String>>,
    handlers: Mutex<HashMap<TransportEvent, Vec<SharedHandler>>>,
    pipeline: Mutex<Pipeline>,
    subscriptions: Mutex<Vec<(Vec<String>, SharedMessageHandler)>>,
    sent: Mutex<Vec<Message>>,
    next_id: AtomicU64,
}

impl FakeConnection {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: Mutex::new(HashMap::new()),
            handlers: Mutex::new(HashMap::new()),
            pipeline: Mutex::new(Pipeline::new()),
            subscriptions: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Send a message to the "server" through the outgoing pipeline.
    pub fn send(&self, message: Message) -> Option<Message> {
        let pipeline = self.pipeline.lock().clone();
        let sent = pipeline.outgoing(message)?;
        self.sent.lock().push(sent.clone());
        Some(sent)
    }

    /// Deliver a message from the "server" through the incoming pipeline,
    /// then to every subscriber of its channel.
    pub fn deliver(&self, message: Message) -> Option<Message> {
        let pipeline = self.pipeline.lock().clone();
        let delivered = pipeline.incoming(message)?;

        let targets: Vec<SharedMessageHandler> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|(topics, _)| topics.iter().any(|t| *t == delivered.channel))
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in targets {
            handler(delivered.clone());
        }

        Some(delivered)
    }

    /// Fire a lifecycle event, returning the first handler error.
    pub fn fire(&self, event: TransportEvent) -> Result<()> {
        let handlers = self.handlers.lock().get(&event).cloned().unwrap_or_default();
        for handler in handlers {
            handler()?;
        }
        Ok(())
    }

    /// Re-send a subscribe for every known topic, as a client does after
    /// re-handshaking.
    pub fn resubscribe_all(&self) -> Vec<Message> {
        let topics: Vec<String> = self
            .subscriptions
            .lock()
            .iter()
            .flat_map(|(topics, _)| topics.clone())
            .collect();
        topics
            .into_iter()
            .filter_map(|topic| self.send(Message::subscribe(topic)))
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.lock().get(name).cloned()
    }

    pub fn authorization(&self) -> Option<String> {
        self.header(AUTHORIZATION_HEADER)
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().clone()
    }

    /// Last subscribe request sent for `topic`.
    pub fn last_subscribe(&self, topic: &str) -> Option<Message> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|m| m.is_subscribe() && m.subscriptions().contains(&topic))
            .cloned()
    }

    pub fn extension_names(&self) -> Vec<String> {
        self.pipeline.lock().names()
    }

    pub fn handler_count(&self, event: TransportEvent) -> usize {
        self.handlers.lock().get(&event).map_or(0, Vec::len)
    }
}

impl Connection for FakeConnection {
    type Subscription = FakeSubscription;

    fn subscribe(&self, topics: &[String], on_message: MessageHandler) -> Result<FakeSubscription> {
        self.subscriptions
            .lock()
            .push((topics.to_vec(), Arc::from(on_message)));
        for topic in topics {
            self.send(Message::subscribe(topic.clone()));
        }
        Ok(FakeSubscription {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            topics: topics.to_vec(),
        })
    }

    fn bind(&self, event: TransportEvent, handler: EventHandler) {
        self.handlers
            .lock()
            .entry(event)
            .or_default()
            .push(Arc::from(handler));
    }

    fn set_header(&self, name: &str, value: &str) {
        self.headers
            .lock()
            .insert(name.to_string(), value.to_string());
    }

    fn add_extension(&self, extension: Arc<dyn Extension>) {
        self.pipeline.lock().push(extension);
    }
}

/// Authenticator issuing `token-1`, `token-2`, ... and counting calls.
#[derive(Default)]
pub struct CountingAuth {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingAuth {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Authenticator for CountingAuth {
    fn authenticate(&self) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(ReplayError::Authentication("invalid_grant".to_string()));
        }
        Ok(format!("token-{}", n))
    }
}
