use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use classic_plus_shared::ValidationError;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::server::state::AppState;

/// Query of `GET /auth/discord/callback`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

/// Exchanges the OAuth2 authorization code and returns the user's profile.
pub async fn discord_callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    if query.code.trim().is_empty() {
        return Err(ValidationError::EmptyField("code").into());
    }

    let verifier = state.identity_verifier.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Identity provider is not configured".to_string())
    })?;

    match verifier.exchange_code(query.code.trim()).await {
        Ok(profile) => {
            info!("Identity exchange succeeded");
            Ok(Json(profile))
        }
        Err(e) => {
            warn!(error = %e, "Identity exchange failed");
            Err(e.into())
        }
    }
}
