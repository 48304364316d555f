//! Transport session: one connection with auth, lifecycle hooks and the
//! replay/disconnect extensions wired in.

use crate::disconnect::{DisconnectCallback, DisconnectNotifier, DisconnectSlot};
use crate::error::{ReplayError, Result};
use crate::replay::{ReplayExtension, ReplayRegistry};
use crate::transport::{Authenticator, Connection, Transport, TransportEvent};
use parking_lot::RwLock;
use std::env;
use std::sync::{Arc, Weak};
use tracing::{info, warn};

/// Header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "41.0";

/// Environment variable for [`SessionConfig::instance_url`].
pub const ENV_INSTANCE_URL: &str = "STREAMING_INSTANCE_URL";
/// Environment variable for [`SessionConfig::api_version`].
pub const ENV_API_VERSION: &str = "STREAMING_API_VERSION";
/// Environment variable for [`SessionConfig::oauth_token`].
pub const ENV_OAUTH_TOKEN: &str = "STREAMING_OAUTH_TOKEN";

/// Session configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Base URL of the instance, e.g. `https://example.my.salesforce.com`.
    pub instance_url: Option<String>,

    /// API version path segment.
    /// Default: "41.0"
    pub api_version: String,

    /// Current bearer token.
    pub oauth_token: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            instance_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            oauth_token: String::new(),
        }
    }
}

impl SessionConfig {
    /// Read configuration from `STREAMING_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var(ENV_INSTANCE_URL) {
            config.instance_url = Some(url);
        }
        if let Ok(version) = env::var(ENV_API_VERSION) {
            config.api_version = version;
        }
        if let Ok(token) = env::var(ENV_OAUTH_TOKEN) {
            config.oauth_token = token;
        }
        config
    }

    /// Streaming endpoint: `<instance_url>/cometd/<api_version>`.
    pub fn streaming_url(&self) -> Result<String> {
        let base = self
            .instance_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ReplayError::MissingInstanceUrl)?;
        Ok(format!(
            "{}/cometd/{}",
            base.trim_end_matches('/'),
            self.api_version
        ))
    }
}

/// `OAuth <token>` header value.
pub fn authorization_value(token: &str) -> String {
    format!("OAuth {}", token)
}

/// A connected transport with the replay layer installed.
///
/// Built once by [`TransportSession::connect`]; the registry and disconnect
/// slot live as long as the session.
pub struct TransportSession<C: Connection> {
    connection: Arc<C>,
    url: String,
    token: Arc<RwLock<String>>,
    registry: Arc<ReplayRegistry>,
    disconnect: Arc<DisconnectSlot>,
}

impl<C: Connection + 'static> TransportSession<C> {
    /// Connect and install auth, lifecycle hooks and both extensions.
    ///
    /// Fails with [`ReplayError::MissingInstanceUrl`] before connecting if no
    /// instance URL is configured.
    pub fn connect<T>(
        config: SessionConfig,
        transport: &T,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self>
    where
        T: Transport<Connection = C>,
    {
        let url = config.streaming_url()?;
        let connection = Arc::new(transport.connect(&url)?);
        let token = Arc::new(RwLock::new(config.oauth_token));
        let registry = Arc::new(ReplayRegistry::new());
        let disconnect = Arc::new(DisconnectSlot::new());

        connection.set_header(AUTHORIZATION_HEADER, &authorization_value(&token.read()));

        connection.bind(
            TransportEvent::Down,
            down_handler(Arc::downgrade(&connection), token.clone(), authenticator),
        );
        connection.bind(
            TransportEvent::Up,
            Box::new(|| {
                info!(event = %TransportEvent::Up, "transport up");
                Ok(())
            }),
        );

        connection.add_extension(Arc::new(ReplayExtension::new(registry.clone())));
        connection.add_extension(Arc::new(DisconnectNotifier::new(disconnect.clone())));

        info!(url = %url, "streaming session connected");

        Ok(Self {
            connection,
            url,
            token,
            registry,
            disconnect,
        })
    }
}

impl<C: Connection> TransportSession<C> {
    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current bearer token.
    pub fn token(&self) -> String {
        self.token.read().clone()
    }

    pub fn registry(&self) -> &Arc<ReplayRegistry> {
        &self.registry
    }

    /// Register the disconnect callback, replacing any previous one.
    pub fn on_disconnect(&self, callback: DisconnectCallback) {
        self.disconnect.set(callback);
    }

    pub fn has_disconnect_callback(&self) -> bool {
        self.disconnect.is_set()
    }
}

/// Re-authenticate and refresh the header when the transport goes down.
fn down_handler<C: Connection + 'static>(
    connection: Weak<C>,
    token: Arc<RwLock<String>>,
    authenticator: Arc<dyn Authenticator>,
) -> Box<dyn Fn() -> Result<()> + Send + Sync> {
    Box::new(move || {
        warn!(event = %TransportEvent::Down, "transport down, re-authenticating");

        let fresh = authenticator.authenticate()?;
        *token.write() = fresh.clone();

        if let Some(connection) = connection.upgrade() {
            connection.set_header(AUTHORIZATION_HEADER, &authorization_value(&fresh));
        }
        info!("authorization refreshed");
        Ok(())
    })
}
