//! Topic subscriptions with replay.
//!
//! # Example
//!
//! ```ignore
//! let session = TransportSession::connect(SessionConfig::from_env(), &transport, auth)?;
//! let manager = SubscriptionManager::new(session);
//!
//! manager.on_disconnect(|| println!("server disconnected us"));
//!
//! let store = Arc::new(MemoryReplayStore::new());
//! manager.subscribe(
//!     ["InvoiceStatementUpdates", "AccountUpdates"],
//!     SubscribeOptions::new().with_replay(store),
//!     |message| println!("{:?}", message.data()),
//! )?;
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{IntoChannels, SubscribeOptions};
