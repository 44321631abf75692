//! Client construction.

use crate::config::Config;
use crate::defaults::DefaultTables;
use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// Client for the skiff daemon.
///
/// Holds only immutable per-process configuration: the transport (base
/// address, credential, timeout) and the default payload tables. Every
/// operation is an independent request; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) transport: Transport,
    pub(crate) defaults: DefaultTables,
}

impl Client {
    /// Creates a client without probing the daemon.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created (should not
    /// happen in practice).
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_defaults(config, DefaultTables::default())
    }

    /// Creates a client with substitute default tables.
    #[must_use]
    pub fn with_defaults(config: &Config, defaults: DefaultTables) -> Self {
        Self {
            transport: Transport::new(config),
            defaults,
        }
    }

    /// Creates a client and verifies the daemon is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] carrying the attempted base
    /// address if the health probe fails for any reason.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Self::new(config);
        if client.health().await.is_err() {
            return Err(ClientError::Connection {
                base_url: client.transport.base_url().to_string(),
            });
        }
        Ok(client)
    }

    /// Returns the daemon base address this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Returns the default tables in effect.
    #[must_use]
    pub fn defaults(&self) -> &DefaultTables {
        &self.defaults
    }
}
