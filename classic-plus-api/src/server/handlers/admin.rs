use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::errors::ApiError;
use crate::server::state::AppState;

/// Drops and recreates the whole store.
///
/// Answers 404 when no admin token is configured and 401 unless the request
/// carries it as a bearer token.
pub async fn reset_db(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let Some(expected) = state.admin_token.as_ref() else {
        return Err(ApiError::NotFound("Not found".to_string()));
    };

    let presented = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
    if !tokens_match(presented, expected.expose()) {
        warn!("Rejected admin request with a wrong token");
        return Err(ApiError::Unauthorized("Invalid admin token".to_string()));
    }

    warn!("Resetting the store on admin request");
    state.schema.reset().await?;
    Ok(Json(json!({ "status": "database reset complete" })))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Compares fixed-length digests so the running time does not depend on
/// where the tokens first differ.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
