//! The signed parts of one webhook delivery.

use bytes::Bytes;

pub const MESSAGE_ID_HEADER: &str = "Kick-Event-Message-Id";
pub const TIMESTAMP_HEADER: &str = "Kick-Event-Message-Timestamp";
pub const SIGNATURE_HEADER: &str = "Kick-Event-Signature";
pub const EVENT_TYPE_HEADER: &str = "Kick-Event-Type";

/// One inbound webhook, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct WebhookEnvelope {
    pub message_id: String,
    pub timestamp: String,
    pub signature_b64: String,
    pub event_type: String,
    /// Unparsed request body. Never re-serialized before verification.
    pub raw_body: Bytes,
}

impl WebhookEnvelope {
    /// Bytes covered by the signature: `message_id.timestamp.raw_body`.
    pub fn signed_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(
            self.message_id.len() + self.timestamp.len() + self.raw_body.len() + 2,
        );
        payload.extend_from_slice(self.message_id.as_bytes());
        payload.push(b'.');
        payload.extend_from_slice(self.timestamp.as_bytes());
        payload.push(b'.');
        payload.extend_from_slice(&self.raw_body);
        payload
    }
}
