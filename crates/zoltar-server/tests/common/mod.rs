//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::{Form, Router, http::StatusCode, routing::post};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::Sha256;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use zoltar_oauth::{FileStateStore, FileTokenStore, OAuthConfig, TokenExchangeClient};
use zoltar_server::{AppState, Server, ServerConfig};
use zoltar_webhook::{EventRelay, PublicKeyCache, PublicKeyMaterial};

pub const TRIGGER: &str = "!zoltar give me a prediction";
pub const TOKEN_RESPONSE: &str = r#"{"access_token":"access-abc","refresh_token":"refresh-def","token_type":"Bearer","expires_in":3600,"scope":"events:subscribe"}"#;

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/test_private_key.pem");
const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/test_public_key.pem");

/// Form bodies received by the fake token endpoint.
pub type CapturedForms = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// A fake Kick token endpoint.
pub struct FakeProvider {
    pub addr: SocketAddr,
    pub forms: CapturedForms,
    _handle: JoinHandle<()>,
}

impl FakeProvider {
    pub async fn start(status: StatusCode, body: &'static str) -> Result<Self> {
        let forms: CapturedForms = Arc::new(Mutex::new(Vec::new()));
        let sink = forms.clone();
        let router = Router::new().route(
            "/oauth/token",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(form);
                    (status, body)
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Ok(Self {
            addr,
            forms,
            _handle: handle,
        })
    }

    pub fn token_url(&self) -> String {
        format!("http://{}/oauth/token", self.addr)
    }
}

/// A relay server running in the background against a fake provider.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client that does not follow redirects.
    pub client: Client,
    /// Shared state, for inspecting stores directly.
    pub state: AppState,
    /// Fake token endpoint.
    pub provider: FakeProvider,
    /// Data directory holding `pkce.json` and `tokens.json`.
    pub temp_dir: TempDir,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose token endpoint succeeds.
    pub async fn start() -> Result<Self> {
        Self::start_with_provider(StatusCode::OK, TOKEN_RESPONSE).await
    }

    /// Start a server whose token endpoint answers with `status`/`body`.
    pub async fn start_with_provider(status: StatusCode, body: &'static str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let provider = FakeProvider::start(status, body).await?;

        let oauth = OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            authorize_url: "https://id.kick.com/oauth/authorize".to_string(),
            token_url: provider.token_url(),
            redirect_uri: "http://localhost:3030/auth/callback".to_string(),
            scope: "events:subscribe".to_string(),
        };

        let state = AppState::new(
            ServerConfig::default(),
            TokenExchangeClient::new(oauth, Duration::from_secs(5))?,
            Arc::new(FileStateStore::new(temp_dir.path())),
            Arc::new(FileTokenStore::new(temp_dir.path())),
            PublicKeyCache::preloaded(PublicKeyMaterial::new(PUBLIC_KEY_PEM)),
            EventRelay::new(TRIGGER),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = Server::new(state.clone());
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener, std::future::pending()).await;
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            addr,
            client,
            state,
            provider,
            temp_dir,
            _handle: handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url(), path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{}", self.base_url(), path))
    }

    /// POST a webhook with the given headers and body.
    pub async fn send_webhook(
        &self,
        delivery: &SignedDelivery,
    ) -> Result<reqwest::Response> {
        Ok(self
            .post("/webhook")
            .header("Content-Type", "application/json")
            .header("Kick-Event-Message-Id", &delivery.message_id)
            .header("Kick-Event-Message-Timestamp", &delivery.timestamp)
            .header("Kick-Event-Signature", &delivery.signature_b64)
            .header("Kick-Event-Type", &delivery.event_type)
            .body(delivery.body.clone())
            .send()
            .await?)
    }
}

/// A webhook delivery signed with the fixture private key.
#[derive(Debug, Clone)]
pub struct SignedDelivery {
    pub message_id: String,
    pub timestamp: String,
    pub event_type: String,
    pub body: Vec<u8>,
    pub signature_b64: String,
}

impl SignedDelivery {
    pub fn new(event_type: &str, body: &[u8]) -> Self {
        let message_id = "01HZX8Q3M4TEST".to_string();
        let timestamp = "2025-06-01T12:00:00Z".to_string();

        let mut signed = Vec::new();
        signed.extend_from_slice(message_id.as_bytes());
        signed.push(b'.');
        signed.extend_from_slice(timestamp.as_bytes());
        signed.push(b'.');
        signed.extend_from_slice(body);

        let key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY_PEM).expect("fixture key");
        let signature = SigningKey::<Sha256>::new(key).sign(&signed);

        Self {
            message_id,
            timestamp,
            event_type: event_type.to_string(),
            body: body.to_vec(),
            signature_b64: STANDARD.encode(signature.to_bytes()),
        }
    }

    /// Same delivery with one signature byte flipped.
    pub fn with_flipped_signature(mut self) -> Self {
        let mut raw = STANDARD.decode(&self.signature_b64).expect("valid base64");
        raw[0] ^= 0xff;
        self.signature_b64 = STANDARD.encode(raw);
        self
    }
}

/// Chat message body in Kick's `chat.message.sent` shape.
pub fn chat_body(content: &str, username: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "message_id": "m-1",
        "broadcaster": { "username": "scraplet" },
        "sender": { "username": username },
        "content": content,
    }))
    .expect("serializable")
}

/// Pull a query parameter out of a URL.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}
