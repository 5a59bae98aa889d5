//! Identity lookup through an external OAuth2 provider.
//!
//! The service never issues sessions of its own: the callback endpoint hands
//! the authorization code to an [`IdentityVerifier`] and returns whatever
//! profile the provider reports.

mod discord;

pub use discord::DiscordVerifier;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// The step of the code exchange that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStage {
    /// Trading the authorization code for an access token.
    Token,
    /// Fetching the user profile with the access token.
    Profile,
}

impl fmt::Display for ExchangeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeStage::Token => f.write_str("token"),
            ExchangeStage::Profile => f.write_str("profile"),
        }
    }
}

/// Errors raised while exchanging an authorization code for a user profile.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider is unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with a non-success status. `payload` is its
    /// response body, parsed as JSON when possible.
    #[error("Identity provider rejected the {stage} request with status {status}")]
    Rejected {
        stage: ExchangeStage,
        status: u16,
        payload: Value,
    },

    #[error("Identity provider returned no access token")]
    MissingAccessToken,

    #[error("Identity provider returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}

/// Turns an OAuth2 authorization code into the provider's user profile.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Exchanges `code` and returns the profile JSON exactly as the provider sent it.
    async fn exchange_code(&self, code: &str) -> Result<Value, IdentityError>;
}
