//! Derivation of the voter identity from a request.

use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use classic_plus_shared::{ValidationError, types::VoterKey};
use tracing::error;

use crate::errors::ApiError;
use crate::server::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Network origin of the request that casts or queries votes.
///
/// The TCP peer address, or the first `X-Forwarded-For` hop when the service
/// is configured to trust that header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoterOrigin(pub IpAddr);

#[async_trait]
impl FromRequestParts<AppState> for VoterOrigin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if state.trust_forwarded_for {
            if let Some(origin) = first_forwarded_hop(&parts.headers) {
                return Ok(VoterOrigin(origin));
            }
        }

        match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(peer)) => Ok(VoterOrigin(peer.ip())),
            None => {
                error!("Peer address missing, router not served with connect info");
                Err(ApiError::Internal)
            }
        }
    }
}

fn first_forwarded_hop(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Builds the voter key for a client-supplied session token.
pub fn voter_key(session_token: &str, origin: VoterOrigin) -> Result<VoterKey, ValidationError> {
    if session_token.trim().is_empty() {
        return Err(ValidationError::EmptyField("session_token"));
    }
    Ok(VoterKey::derive(session_token, origin.0))
}
