//! Kick webhook verification and the Unreal-facing event relay.
//!
//! # Components
//!
//! - [`key_cache`] - fetch-once cache of the provider's signing key
//! - [`verifier`] - RSA PKCS#1 v1.5 / SHA-256 check over `id.timestamp.body`
//! - [`relay`] - dispatch of verified events into single-slot mailboxes
//! - [`mailbox`] - the slots themselves plus the append-only cue log

pub mod envelope;
pub mod error;
pub mod key_cache;
pub mod mailbox;
pub mod prediction;
pub mod relay;
pub mod verifier;

pub use envelope::WebhookEnvelope;
pub use error::{Result, WebhookError};
pub use key_cache::{HttpKeySource, PublicKeyCache, PublicKeyMaterial, PublicKeySource};
pub use mailbox::{AppendLog, Mailbox};
pub use relay::{CHAT_MESSAGE_SENT, Cue, Dispatch, EventRelay, Prediction};
pub use verifier::verify;
