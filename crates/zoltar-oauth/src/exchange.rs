//! Authorization-code-to-token exchange against the provider's token endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OAuthError, Result};
use crate::pkce::OAuthConfig;

/// Token set returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    code_verifier: &'a str,
    code: &'a str,
}

/// Client for the provider's token endpoint.
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl TokenExchangeClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(config: OAuthConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OAuthError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchange an authorization code and PKCE verifier for a token set.
    pub async fn exchange(&self, code: &str, verifier: &str) -> Result<TokenSet> {
        let form = TokenExchangeRequest {
            grant_type: "authorization_code",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            redirect_uri: &self.config.redirect_uri,
            code_verifier: verifier,
            code,
        };

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| OAuthError::Network(format!("Token exchange request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuthError::Network(format!("Failed to read token response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "Token exchange rejected");
            return Err(OAuthError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        parse_token_set(&body)
    }
}

/// Parse a 2xx token response, requiring a non-empty `access_token`.
pub fn parse_token_set(body: &str) -> Result<TokenSet> {
    let tokens: TokenSet = serde_json::from_str(body)
        .map_err(|e| OAuthError::MalformedResponse(format!("Failed to parse token response: {}", e)))?;

    if tokens.access_token.is_empty() {
        return Err(OAuthError::MalformedResponse(
            "access_token is empty".to_string(),
        ));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let tokens = parse_token_set(
            r#"{"access_token":"at","refresh_token":"rt","token_type":"Bearer","expires_in":3600,"scope":"events:subscribe"}"#,
        )
        .unwrap();
        assert_eq!(tokens.access_token, "at");
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt"));
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);
        assert_eq!(tokens.scope, "events:subscribe");
    }

    #[test]
    fn test_parse_minimal_response() {
        let tokens = parse_token_set(r#"{"access_token":"at"}"#).unwrap();
        assert_eq!(tokens.refresh_token, None);
        assert_eq!(tokens.expires_in, 0);
        assert!(tokens.scope.is_empty());
    }

    #[test]
    fn test_parse_missing_access_token() {
        assert!(matches!(
            parse_token_set(r#"{"token_type":"Bearer"}"#),
            Err(OAuthError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_token_set(r#"{"access_token":""}"#),
            Err(OAuthError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_token_set("<html>ok</html>"),
            Err(OAuthError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_form_encoding() {
        let form = TokenExchangeRequest {
            grant_type: "authorization_code",
            client_id: "id",
            client_secret: "s e",
            redirect_uri: "http://x/cb",
            code_verifier: "v",
            code: "c",
        };
        let encoded = encode_form(&form);
        assert!(encoded.contains("grant_type=authorization_code"));
        assert!(encoded.contains("client_secret=s+e"));
        assert!(encoded.contains("redirect_uri=http%3A%2F%2Fx%2Fcb"));
    }

    fn encode_form(form: &TokenExchangeRequest<'_>) -> String {
        let request = reqwest::Client::new()
            .post("http://localhost/")
            .form(form)
            .build()
            .unwrap();
        String::from_utf8(request.body().unwrap().as_bytes().unwrap().to_vec()).unwrap()
    }
}
