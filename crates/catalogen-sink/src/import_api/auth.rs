use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{SinkError, SinkResult};

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: Instant) -> Self {
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        Self {
            value: response.access_token,
            refresh_at: now + lifetime,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.refresh_at
    }
}

/// OAuth2 client-credentials flow against the catalog auth service.
pub struct ClientCredentials {
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        auth_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scopes: &[String],
    ) -> Self {
        Self {
            token_url: token_url(auth_url),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scopes.join(" "),
            cached: Mutex::new(None),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Return a valid access token, requesting a new one when the cached token is stale.
    pub async fn access_token(&self, http: &reqwest::Client) -> SinkResult<String> {
        let mut cached = self.cached.lock().await;
        let now = Instant::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        debug!(event = "token_requested", url = %self.token_url);
        let response = http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", self.scope.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Auth(format!("token request returned {status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        if token.access_token.is_empty() {
            return Err(SinkError::Auth("token response has no access token".to_string()));
        }

        let fresh = CachedToken::from_response(token, now);
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}

pub fn token_url(auth_url: &str) -> String {
    format!("{}/oauth/token", auth_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "token".to_string(),
            expires_in,
            token_type: Some("Bearer".to_string()),
            scope: None,
        }
    }

    #[test]
    fn token_url_strips_trailing_slash() {
        assert_eq!(
            token_url("https://auth.example.com/"),
            "https://auth.example.com/oauth/token"
        );
    }

    #[test]
    fn token_refreshes_before_expiry() {
        let now = Instant::now();
        let token = CachedToken::from_response(response(3600), now);
        assert!(token.is_fresh(now + Duration::from_secs(3500)));
        assert!(!token.is_fresh(now + Duration::from_secs(3571)));
    }

    #[test]
    fn short_lived_token_is_never_reused() {
        let now = Instant::now();
        let token = CachedToken::from_response(response(10), now);
        assert!(!token.is_fresh(now));
    }

    #[test]
    fn parses_token_payload() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc","token_type":"Bearer","expires_in":172800,"scope":"manage_project:demo"}"#,
        )
        .expect("parse token");
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.scope.as_deref(), Some("manage_project:demo"));
    }
}
