//! PKCE (RFC 7636) verifier/challenge generation and the authorization URL.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// OAuth client registration and provider endpoints.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// A pending authorization: the CSRF state plus the PKCE verifier/challenge pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub state: String,
    pub verifier: String,
    pub challenge: String,
}

impl AuthorizationRequest {
    /// Generate a fresh request from the thread-local CSPRNG.
    ///
    /// The verifier carries 256 bits of entropy and the state 128 bits,
    /// drawn independently.
    pub fn generate() -> Self {
        let mut verifier_bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut verifier_bytes);
        let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

        Self {
            state: generate_state(),
            challenge: challenge_for(&verifier),
            verifier,
        }
    }
}

/// Derive the S256 code challenge for `verifier`.
pub fn challenge_for(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generate a random hex state string for CSRF protection.
pub fn generate_state() -> String {
    let mut state_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut state_bytes);
    hex::encode(state_bytes)
}

/// Build the provider authorization URL for `request`.
pub fn build_authorization_url(config: &OAuthConfig, request: &AuthorizationRequest) -> String {
    let params = [
        ("response_type", "code"),
        ("client_id", config.client_id.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("scope", config.scope.as_str()),
        ("state", request.state.as_str()),
        ("code_challenge", request.challenge.as_str()),
        ("code_challenge_method", "S256"),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", config.authorize_url, query)
}
