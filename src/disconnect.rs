//! Disconnect notification hook.

use crate::pipeline::{Extension, Next};
use crate::types::Message;
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info};

/// Callback fired on `/meta/disconnect`.
pub type DisconnectCallback = Arc<dyn Fn() + Send + Sync>;

/// Single-slot holder for the disconnect callback.
///
/// Setting a new callback replaces the previous one.
#[derive(Default)]
pub struct DisconnectSlot {
    callback: RwLock<Option<DisconnectCallback>>,
}

impl DisconnectSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, callback: DisconnectCallback) {
        *self.callback.write() = Some(callback);
    }

    pub fn is_set(&self) -> bool {
        self.callback.read().is_some()
    }

    /// Invoke the callback if one is set. Returns whether it ran to completion.
    ///
    /// A panicking callback is caught and logged.
    pub fn notify(&self) -> bool {
        let Some(callback) = self.callback.read().clone() else {
            return false;
        };

        match catch_unwind(AssertUnwindSafe(|| callback())) {
            Ok(()) => true,
            Err(_) => {
                error!("disconnect callback panicked");
                false
            }
        }
    }
}

/// Fires the registered callback for every `/meta/disconnect` message.
///
/// With no callback registered it only forwards.
pub struct DisconnectNotifier {
    slot: Arc<DisconnectSlot>,
}

impl DisconnectNotifier {
    pub fn new(slot: Arc<DisconnectSlot>) -> Self {
        Self { slot }
    }
}

impl Extension for DisconnectNotifier {
    fn name(&self) -> &str {
        "disconnect"
    }

    fn incoming(&self, message: Message, next: Next<'_>) -> Option<Message> {
        let is_disconnect = message.is_disconnect();
        let forwarded = next(message);

        if is_disconnect {
            info!("received /meta/disconnect");
            self.slot.notify();
        }

        forwarded
    }
}
