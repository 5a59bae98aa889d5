//! Discord implementation of the identity verifier.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ExchangeStage, IdentityError, IdentityVerifier};
use crate::config::DiscordSettings;

/// Upper bound for each request to Discord.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Exchanges OAuth2 authorization codes with the Discord API.
pub struct DiscordVerifier {
    client: reqwest::Client,
    settings: DiscordSettings,
}

impl DiscordVerifier {
    /// Creates a verifier for the given Discord application.
    ///
    /// # Arguments
    ///
    /// * `settings` - Client credentials, redirect URI and API base URL
    ///
    /// # Returns
    ///
    /// * `Ok(DiscordVerifier)` - Ready-to-use verifier
    /// * `Err(IdentityError)` - If the HTTP client cannot be built
    pub fn new(settings: DiscordSettings) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    async fn request_access_token(&self, code: &str) -> Result<String, IdentityError> {
        let form = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.expose()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("scope", "identify"),
        ];
        let response = self
            .client
            .post(format!("{}/oauth2/token", self.settings.api_base))
            .form(&form)
            .send()
            .await?;

        let body = read_json(response, ExchangeStage::Token).await?;
        body.get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(IdentityError::MissingAccessToken)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Value, IdentityError> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.settings.api_base))
            .bearer_auth(access_token)
            .send()
            .await?;

        read_json(response, ExchangeStage::Profile).await
    }
}

/// Reads a Discord response body, turning non-success statuses into `Rejected`.
async fn read_json(response: reqwest::Response, stage: ExchangeStage) -> Result<Value, IdentityError> {
    let status = response.status();
    let text = response.text().await?;
    let parsed = serde_json::from_str::<Value>(&text);

    if !status.is_success() {
        warn!(%stage, status = status.as_u16(), "Discord rejected the request");
        return Err(IdentityError::Rejected {
            stage,
            status: status.as_u16(),
            payload: parsed.unwrap_or_else(|_| Value::String(text)),
        });
    }

    parsed.map_err(|e| IdentityError::MalformedResponse(format!("{stage} response is not JSON: {e}")))
}

#[async_trait]
impl IdentityVerifier for DiscordVerifier {
    async fn exchange_code(&self, code: &str) -> Result<Value, IdentityError> {
        let access_token = self.request_access_token(code).await?;
        debug!("Discord access token obtained");
        self.fetch_profile(&access_token).await
    }
}
