//! Application state shared across handlers.

use std::sync::Arc;

use tracing::info;
use zoltar_config::RelayConfig;
use zoltar_oauth::{
    FileStateStore, FileTokenStore, OAuthConfig, SharedStateStore, SharedTokenStore,
    TokenExchangeClient,
};
use zoltar_webhook::{EventRelay, HttpKeySource, PublicKeyCache};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Token endpoint client (also carries the OAuth client registration).
    pub exchange: Arc<TokenExchangeClient>,

    /// Pending authorization between `/auth/start` and `/auth/callback`.
    pub state_store: SharedStateStore,

    /// Durable token set.
    pub token_store: SharedTokenStore,

    /// Webhook signing key.
    pub key_cache: Arc<PublicKeyCache>,

    /// Prediction and cue mailboxes.
    pub relay: Arc<EventRelay>,
}

impl AppState {
    /// Assemble state from explicit parts.
    pub fn new(
        config: ServerConfig,
        exchange: TokenExchangeClient,
        state_store: SharedStateStore,
        token_store: SharedTokenStore,
        key_cache: PublicKeyCache,
        relay: EventRelay,
    ) -> Self {
        Self {
            config: Arc::new(config),
            exchange: Arc::new(exchange),
            state_store,
            token_store,
            key_cache: Arc::new(key_cache),
            relay: Arc::new(relay),
        }
    }

    /// Build production state: file stores under the data directory and
    /// live provider endpoints.
    pub fn from_relay_config(relay_config: &RelayConfig) -> Result<Self> {
        let kick = &relay_config.kick;
        let oauth = OAuthConfig {
            client_id: kick.client_id.clone(),
            client_secret: kick.client_secret.clone(),
            authorize_url: kick.authorize_url.clone(),
            token_url: kick.token_url.clone(),
            redirect_uri: kick.redirect_uri.clone(),
            scope: kick.scope.clone(),
        };

        let exchange = TokenExchangeClient::new(oauth, relay_config.http_timeout)?;
        let key_source = HttpKeySource::new(&kick.public_key_url, relay_config.http_timeout)
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let data_dir = relay_config.data_dir.as_path();
        info!(data_dir = %data_dir.display(), "Using data directory");

        Ok(Self::new(
            ServerConfig::new(relay_config.port),
            exchange,
            Arc::new(FileStateStore::new(data_dir)),
            Arc::new(FileTokenStore::new(data_dir)),
            PublicKeyCache::new(Arc::new(key_source)),
            EventRelay::new(&relay_config.trigger),
        ))
    }
}
