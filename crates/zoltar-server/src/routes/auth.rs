//! OAuth redirect and callback endpoints.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;
use zoltar_oauth::{AuthorizationRequest, TokenSet, build_authorization_url};

use crate::error::Result;
use crate::state::AppState;

/// Query parameters the provider appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// `GET /auth/start` - store a fresh PKCE request and redirect to the provider.
pub async fn start_handler(State(state): State<AppState>) -> Result<Response> {
    let request = AuthorizationRequest::generate();
    state.state_store.put(&request).await?;

    let url = build_authorization_url(state.exchange.config(), &request);
    info!("Redirecting to provider authorization endpoint");

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// `GET /auth/callback` - consume the pending request, exchange, persist.
pub async fn callback_handler(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<TokenSet>> {
    let code = params.code.unwrap_or_default();
    let callback_state = params.state.unwrap_or_default();

    let verifier = state.state_store.consume(&callback_state, &code).await?;
    let tokens = state.exchange.exchange(&code, &verifier).await?;
    state.token_store.save(&tokens).await?;

    info!(scope = %tokens.scope, expires_in = tokens.expires_in, "Authorization complete");
    Ok(Json(tokens))
}
