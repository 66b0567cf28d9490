//! OAuth 2.1 Authorization Code + PKCE flow for Kick.
//!
//! # Components
//!
//! - [`pkce`] - state/verifier/challenge generation and the authorization URL
//! - [`state_store`] - the single pending authorization between redirect and callback
//! - [`exchange`] - form-encoded code-for-token exchange
//! - [`token_store`] - durable, atomically replaced token set

pub mod error;
pub mod exchange;
mod persist;
pub mod pkce;
pub mod state_store;
pub mod token_store;

pub use error::{OAuthError, Result};
pub use exchange::{TokenExchangeClient, TokenSet};
pub use pkce::{AuthorizationRequest, OAuthConfig, build_authorization_url};
pub use state_store::{
    AuthorizationStateStore, FileStateStore, InMemoryStateStore, SharedStateStore,
};
pub use token_store::{FileTokenStore, InMemoryTokenStore, SharedTokenStore, TokenStore};
