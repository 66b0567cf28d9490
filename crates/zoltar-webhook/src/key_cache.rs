//! Process-lifetime cache of the provider's webhook-signing public key.
//!
//! The key is fetched lazily on first use. Concurrent first callers share a
//! single fetch, which runs on its own task so a cancelled caller does not
//! abandon it. A failed fetch falls back to the key pinned at build time.
//! There is no refresh, so a rotated key is only picked up on restart.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rsa::RsaPublicKey;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::error::{Result, WebhookError};
use crate::verifier::parse_public_key;

/// Kick's published webhook-signing key, used when the live fetch fails.
pub const FALLBACK_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAq/+l1WnlRrGSolDMA+A8
6rAhMbQGmQ2SapVcGM3zq8ANXjnhDWocMqfWcTd95btDydITa10kDvHzw9WQOqp2
MZI7ZyrfzJuz5nhTPCiJwTwnEtWft7nV14BYRDHvlfqPUaZ+1KR4OCaO/wWIk/rQ
L/TjY0M70gse8rlBkbo2a8rKhu69RQTRsoaf4DVhDPEeSeI5jVrRDGAMGL3cGuyY
6CLKGdjVEM78g3JfYOvDU/RvfqD7L89TZ3iN94jrmWdGz34JNlEI5hqK8dd7C5EF
BEbZ5jgB8s8ReQV8H+MkuffjdAj3ajDDX3DOJMIut1lBrUVD1AaSrGCKHooWoL2e
twIDAQAB
-----END PUBLIC KEY-----
";

/// PEM-encoded RSA public key, parsed once on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    pem: String,
    key: Option<RsaPublicKey>,
}

impl PublicKeyMaterial {
    /// Wrap `pem`. A PEM that does not parse is kept but never verifies.
    pub fn new(pem: impl Into<String>) -> Self {
        let pem = pem.into();
        let key = parse_public_key(&pem);
        Self { pem, key }
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    /// The parsed key, or `None` when the PEM is not an RSA public key.
    pub fn public_key(&self) -> Option<&RsaPublicKey> {
        self.key.as_ref()
    }

    /// The pinned Kick key.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_PUBLIC_KEY_PEM)
    }
}

// ============================================================================
// PublicKeySource
// ============================================================================

/// Where the signing key comes from.
#[async_trait]
pub trait PublicKeySource: Send + Sync {
    async fn fetch(&self) -> Result<PublicKeyMaterial>;
}

/// Fetches the key from the provider's public key endpoint.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct KeyEnvelope {
    #[serde(default)]
    data: Option<KeyBody>,
    #[serde(default)]
    public_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyBody {
    public_key: Option<String>,
}

impl HttpKeySource {
    /// Create a source whose request gives up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::KeyFetch(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl PublicKeySource for HttpKeySource {
    async fn fetch(&self) -> Result<PublicKeyMaterial> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::KeyFetch(format!(
                "Key endpoint returned {}",
                status
            )));
        }

        let body = response.text().await?;
        let pem = extract_pem(&body)
            .ok_or_else(|| WebhookError::KeyFetch("Response contains no public key".to_string()))?;

        let key = PublicKeyMaterial::new(pem);
        if key.public_key().is_none() {
            return Err(WebhookError::KeyFetch(
                "Response key is not a valid RSA public key".to_string(),
            ));
        }

        Ok(key)
    }
}

/// Pull a PEM out of `{"data":{"public_key":..}}`, `{"public_key":..}` or a raw PEM body.
fn extract_pem(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<KeyEnvelope>(body) {
        let pem = envelope
            .data
            .and_then(|d| d.public_key)
            .or(envelope.public_key)
            .filter(|k| !k.trim().is_empty());
        if pem.is_some() {
            return pem;
        }
    }

    let trimmed = body.trim();
    trimmed
        .starts_with("-----BEGIN")
        .then(|| trimmed.to_string())
}

// ============================================================================
// PublicKeyCache
// ============================================================================

/// Memoize-once holder for the signing key.
pub struct PublicKeyCache {
    source: Arc<dyn PublicKeySource>,
    key: Arc<OnceCell<PublicKeyMaterial>>,
}

impl std::fmt::Debug for PublicKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKeyCache")
            .field("initialized", &self.key.initialized())
            .finish()
    }
}

impl PublicKeyCache {
    pub fn new(source: Arc<dyn PublicKeySource>) -> Self {
        Self {
            source,
            key: Arc::new(OnceCell::new()),
        }
    }

    /// A cache that is already initialized with `key` and never fetches.
    pub fn preloaded(key: PublicKeyMaterial) -> Self {
        Self {
            source: Arc::new(StaticKeySource(key.clone())),
            key: Arc::new(OnceCell::new_with(Some(key))),
        }
    }

    /// Get the key, fetching it on first use.
    pub async fn get(&self) -> &PublicKeyMaterial {
        if let Some(key) = self.key.get() {
            return key;
        }

        let cell = self.key.clone();
        let source = self.source.clone();
        let init = tokio::spawn(async move {
            cell.get_or_init(|| fetch_or_fallback(source.as_ref()))
                .await;
        });
        if let Err(e) = init.await {
            tracing::error!(error = %e, "Public key fetch task failed");
        }

        self.key
            .get_or_init(|| async { PublicKeyMaterial::fallback() })
            .await
    }
}

async fn fetch_or_fallback(source: &dyn PublicKeySource) -> PublicKeyMaterial {
    match source.fetch().await {
        Ok(key) => {
            tracing::info!("Webhook public key fetched");
            key
        }
        Err(e) => {
            tracing::warn!(error = %e, "Using pinned fallback webhook public key");
            PublicKeyMaterial::fallback()
        }
    }
}

struct StaticKeySource(PublicKeyMaterial);

#[async_trait]
impl PublicKeySource for StaticKeySource {
    async fn fetch(&self) -> Result<PublicKeyMaterial> {
        Ok(self.0.clone())
    }
}
