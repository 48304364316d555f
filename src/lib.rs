//! # Bayeux Replay
//!
//! Resumable topic subscriptions for Bayeux/CometD long-polling clients.
//!
//! The crate does not speak the wire protocol itself. It plugs into an
//! existing client through the [`Transport`] and [`Connection`] traits and
//! adds:
//!
//! - **Replay**: per-channel cursors sent with every `/meta/subscribe`, and
//!   advanced from `data.event.replayId` on inbound events, so a
//!   resubscribe after a reconnect picks up where delivery stopped.
//! - **Credential refresh**: on `transport:down` the session re-authenticates
//!   and replaces the `Authorization` header.
//! - **Disconnect hook**: a callback fired for each `/meta/disconnect`.
//!
//! ## Example
//!
//! ```ignore
//! use bayeux_replay::{SessionConfig, SubscribeOptions, SubscriptionManager, TransportSession};
//!
//! let session = TransportSession::connect(
//!     SessionConfig::from_env(),
//!     &my_transport,
//!     Arc::new(|| refresh_token()),
//! )?;
//! let manager = SubscriptionManager::new(session);
//!
//! manager.subscribe("AccountUpdates", SubscribeOptions::default(), |message| {
//!     println!("{:?}", message.data());
//! })?;
//! ```

pub mod disconnect;
pub mod error;
pub mod pipeline;
pub mod replay;
pub mod session;
pub mod subscriptions;
pub mod transport;
pub mod types;

// Re-exports
pub use disconnect::{DisconnectCallback, DisconnectNotifier, DisconnectSlot};
pub use error::{ReplayError, Result};
pub use pipeline::{Extension, Next, Pipeline};
pub use replay::{
    MemoryReplayStore, ReplayCursor, ReplayExtension, ReplayRegistry, ReplayStore, REPLAY_ALL,
    REPLAY_NEW,
};
pub use session::{authorization_value, SessionConfig, TransportSession, AUTHORIZATION_HEADER};
pub use subscriptions::{IntoChannels, SubscribeOptions, SubscriptionManager};
pub use transport::{
    Authenticator, Connection, EventHandler, MessageHandler, Transport, TransportEvent,
};
pub use types::*;
