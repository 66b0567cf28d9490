//! Routes verified events and operator cues into the polling mailboxes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WebhookError};
use crate::mailbox::{AppendLog, Mailbox};
use crate::prediction::generate_prediction;

/// Event type carrying a chat message.
pub const CHAT_MESSAGE_SENT: &str = "chat.message.sent";

/// A prophecy waiting for the Unreal client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub text: String,
}

/// A scene cue posted by an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub cue: String,
    #[serde(default)]
    pub data: Value,
    /// Epoch milliseconds at which the cue was received.
    pub timestamp: i64,
}

/// Text of a loosely typed chat field.
///
/// Missing, `null`, `false`, `0` and `""` read as absent. Other non-string
/// values use their JSON text.
fn loose_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// What a verified event caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A prediction was written for `user`.
    Prediction { user: String },
    /// A chat message without the trigger phrase.
    NoTrigger,
    /// An event type the relay does not act on.
    Ignored,
}

/// Owner of the prediction and cue mailboxes.
#[derive(Debug)]
pub struct EventRelay {
    trigger: String,
    predictions: Mailbox<Prediction>,
    cues: Mailbox<Cue>,
    cue_log: AppendLog<Cue>,
}

impl EventRelay {
    /// Create a relay reacting to `trigger` (matched case-insensitively).
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into().to_lowercase(),
            predictions: Mailbox::new(),
            cues: Mailbox::new(),
            cue_log: AppendLog::new(),
        }
    }

    /// Act on a verified event. Must never be called for unverified input.
    pub fn dispatch(&self, event_type: &str, raw_body: &[u8]) -> Result<Dispatch> {
        if event_type != CHAT_MESSAGE_SENT {
            tracing::debug!(event_type, "Ignoring unhandled event type");
            return Ok(Dispatch::Ignored);
        }

        let event: Value = serde_json::from_slice(raw_body)
            .map_err(|e| WebhookError::Payload(format!("{} body: {}", CHAT_MESSAGE_SENT, e)))?;

        let content = loose_text(event.get("content")).unwrap_or_default();
        if !content.to_lowercase().contains(&self.trigger) {
            return Ok(Dispatch::NoTrigger);
        }

        let user = loose_text(event.get("sender").and_then(|s| s.get("username")))
            .unwrap_or_else(|| "unknown".to_string());

        let text = generate_prediction(&user);
        tracing::info!(user = %user, prediction = %text, "Prediction issued");
        if let Some(stale) = self.predictions.put(Prediction { text }) {
            tracing::debug!(replaced = %stale.text, "Unread prediction overwritten");
        }

        Ok(Dispatch::Prediction { user })
    }

    /// Take the pending prediction, if any.
    pub fn take_prediction(&self) -> Option<Prediction> {
        self.predictions.take()
    }

    /// Record a cue in both the mailbox and the log.
    pub fn push_cue(&self, cue: impl Into<String>, data: Value) -> Cue {
        let cue = Cue {
            cue: cue.into(),
            data,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.cue_log.push(cue.clone());
        self.cues.put(cue.clone());
        tracing::info!(cue = %cue.cue, "Cue received");
        cue
    }

    /// Take the pending cue, if any.
    pub fn take_cue(&self) -> Option<Cue> {
        self.cues.take()
    }

    /// Every cue ever received, oldest first.
    pub fn cue_log(&self) -> Vec<Cue> {
        self.cue_log.snapshot()
    }
}
