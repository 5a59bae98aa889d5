use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
};
use classic_plus_shared::{
    ValidationError,
    types::{SurveyDefinition, SurveyEntry, SurveyResponses, SurveyResults},
};
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::server::state::AppState;

/// Body of `POST /survey/`.
#[derive(Debug, Deserialize)]
pub struct SubmitSurveyRequest {
    pub discord_username: String,
    pub responses: SurveyResponses,
}

/// Returns the survey definition so the client can render the form.
pub async fn get_definition(State(state): State<AppState>) -> Json<SurveyDefinition> {
    Json(state.survey_definition.as_ref().clone())
}

/// Stores the caller's answers, replacing any earlier submission.
pub async fn submit_survey(
    State(state): State<AppState>,
    payload: Result<Json<SubmitSurveyRequest>, JsonRejection>,
) -> Result<Json<SurveyEntry>, ApiError> {
    let Json(request) = payload?;
    let identity = request.discord_username.trim();
    if identity.is_empty() {
        return Err(ValidationError::EmptyField("discord_username").into());
    }

    let entry = state.surveys.upsert_entry(identity, &request.responses).await?;
    info!(entry_id = entry.id, answers = entry.responses.len(), "Survey entry saved");
    Ok(Json(entry))
}

pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<SurveyEntry>>, ApiError> {
    Ok(Json(state.surveys.list_entries().await?))
}

pub async fn get_entry(
    State(state): State<AppState>,
    identity: Result<Path<String>, PathRejection>,
) -> Result<Json<SurveyEntry>, ApiError> {
    let Path(identity) = identity?;
    state
        .surveys
        .get_entry(identity.trim())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Survey not found for this user".to_string()))
}

/// Aggregates every stored submission into per-question answer counts.
pub async fn get_results(State(state): State<AppState>) -> Result<Json<SurveyResults>, ApiError> {
    let entries = state.surveys.list_entries().await?;
    Ok(Json(SurveyResults::aggregate(
        entries.iter().map(|entry| &entry.responses),
    )))
}
