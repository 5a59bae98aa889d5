use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
};
use classic_plus_shared::types::{PinId, UserVote, VoteDirection, VoteReceipt};
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::server::state::AppState;
use crate::server::voter::{VoterOrigin, voter_key};

/// Body of `POST /pins/vote`.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub pin_id: PinId,
    pub session_token: String,
    #[serde(alias = "vote_type")]
    pub direction: String,
}

/// Query of `GET /pins/votes`.
#[derive(Debug, Deserialize)]
pub struct VotesQuery {
    pub session_token: String,
}

/// Applies one vote request and returns the refreshed counters.
///
/// Repeating the current vote retracts it; voting the other way switches it.
pub async fn cast_vote(
    State(state): State<AppState>,
    origin: VoterOrigin,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteReceipt>, ApiError> {
    let Json(request) = payload?;
    let direction: VoteDirection = request.direction.parse()?;
    let voter_key = voter_key(&request.session_token, origin)?;

    let receipt = state.pins.apply_vote(request.pin_id, &voter_key, direction).await?;
    info!(
        pin_id = receipt.pin_id,
        upvotes = receipt.upvotes,
        downvotes = receipt.downvotes,
        "Vote recorded"
    );
    Ok(Json(receipt))
}

/// Lists the caller's current votes, so a client can highlight them.
pub async fn list_votes(
    State(state): State<AppState>,
    origin: VoterOrigin,
    query: Result<Query<VotesQuery>, QueryRejection>,
) -> Result<Json<Vec<UserVote>>, ApiError> {
    let Query(query) = query?;
    let voter_key = voter_key(&query.session_token, origin)?;
    Ok(Json(state.pins.list_votes_for_voter(&voter_key).await?))
}
