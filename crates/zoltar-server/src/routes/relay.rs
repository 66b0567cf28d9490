//! Unreal-facing polling endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zoltar_webhook::Cue;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Body of `GET /zoltar`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
}

/// Body of `POST /cue`.
#[derive(Debug, Default, Deserialize)]
pub struct CueRequest {
    #[serde(default)]
    pub cue: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// `GET /zoltar` - take the pending prediction or answer 204.
pub async fn take_prediction_handler(State(state): State<AppState>) -> Response {
    match state.relay.take_prediction() {
        Some(prediction) => Json(PredictionResponse {
            prediction: prediction.text,
        })
        .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// `POST /cue` - record a cue.
///
/// The body is parsed leniently so any unusable body gets the same 400.
pub async fn post_cue_handler(State(state): State<AppState>, body: Bytes) -> Result<StatusCode> {
    let request: CueRequest = serde_json::from_slice(&body).unwrap_or_default();
    let cue = request
        .cue
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing cue".to_string()))?;

    let data = request
        .data
        .filter(|d| !d.is_null())
        .unwrap_or_else(|| Value::Object(Default::default()));
    state.relay.push_cue(cue, data);

    Ok(StatusCode::OK)
}

/// `GET /cue` - take the pending cue or answer 204.
pub async fn take_cue_handler(State(state): State<AppState>) -> Response {
    match state.relay.take_cue() {
        Some(cue) => Json(cue).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// `GET /cue-log` - every cue received so far.
pub async fn cue_log_handler(State(state): State<AppState>) -> Json<Vec<Cue>> {
    Json(state.relay.cue_log())
}
