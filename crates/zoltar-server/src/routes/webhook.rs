//! Kick webhook receiver.
//!
//! `RECEIVED -> KEY_READY -> VERIFIED | REJECTED`. A rejected delivery is
//! never parsed and never reaches the relay.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use bytes::Bytes;
use tracing::{debug, warn};
use zoltar_webhook::WebhookEnvelope;
use zoltar_webhook::envelope::{
    EVENT_TYPE_HEADER, MESSAGE_ID_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

use crate::error::{Result, ServerError};
use crate::state::AppState;

fn header_value(headers: &HeaderMap, name: &str) -> String {
    let Some(value) = headers.get(name) else {
        return String::new();
    };
    match value.to_str() {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!(header = name, "Webhook header is not visible ASCII, treating as empty");
            String::new()
        }
    }
}

/// Assemble the envelope. Missing headers become empty strings and fail verification.
pub fn envelope_from(headers: &HeaderMap, body: Bytes) -> WebhookEnvelope {
    WebhookEnvelope {
        message_id: header_value(headers, MESSAGE_ID_HEADER),
        timestamp: header_value(headers, TIMESTAMP_HEADER),
        signature_b64: header_value(headers, SIGNATURE_HEADER),
        event_type: header_value(headers, EVENT_TYPE_HEADER),
        raw_body: body,
    }
}

/// `POST /webhook`
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let envelope = envelope_from(&headers, body);
    let key = state.key_cache.get().await;

    if !zoltar_webhook::verify(&envelope, key) {
        warn!(
            message_id = %envelope.message_id,
            event_type = %envelope.event_type,
            "Webhook signature verification failed"
        );
        return Err(ServerError::SignatureInvalid);
    }

    let outcome = state
        .relay
        .dispatch(&envelope.event_type, &envelope.raw_body)
        .map_err(|e| ServerError::Processing(e.to_string()))?;
    debug!(message_id = %envelope.message_id, ?outcome, "Webhook handled");

    Ok(StatusCode::OK)
}
