//! Configured entry point
//!
//! A `Session` wires the HTTP transport and the persisted token store from
//! a [`Config`] and hands out the clients that share them.
//!
//! ## Usage
//!
//! ```ignore
//! let session = Session::open()?;
//!
//! let mut books = session.books();
//! books.list_all().await?;
//!
//! let user = session.account().load_profile().await;
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::account::AccountClient;
use crate::config::Config;
use crate::models::Book;
use crate::sync::{DeleteMode, ResourceSync};
use crate::token::{FileTokenStore, TokenStore};
use crate::transport::{HttpTransport, Transport};

/// Shared transport and token store for one configuration
pub struct Session {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    config: Config,
}

impl Session {
    /// Open a session with the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open a session with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.api_url, config.request_timeout())
            .context("Failed to create HTTP client")?;
        let tokens = FileTokenStore::new(config.token_store_path());
        Ok(Self::with_parts(Arc::new(transport), Arc::new(tokens), config))
    }

    /// Assemble a session from existing parts
    pub fn with_parts(
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        config: Config,
    ) -> Self {
        Self {
            transport,
            tokens,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the token store
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Sync client for the book collection (starts empty)
    pub fn books(&self) -> ResourceSync<Book> {
        ResourceSync::new(self.transport.clone(), self.tokens.clone())
            .with_delete_mode(DeleteMode::from_verify(self.config.verify_delete))
    }

    /// Client for the account endpoints
    pub fn account(&self) -> AccountClient {
        AccountClient::new(self.transport.clone(), self.tokens.clone())
    }
}
