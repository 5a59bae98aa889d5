use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
};
use classic_plus_shared::types::{NewPin, Pin, PinId};
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::server::state::AppState;

/// Body of `POST /pins/`.
///
/// Any `id`, `upvotes` or `downvotes` sent by the client are ignored.
#[derive(Debug, Deserialize)]
pub struct CreatePinRequest {
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub description: String,
    pub category: String,
}

pub async fn create_pin(
    State(state): State<AppState>,
    payload: Result<Json<CreatePinRequest>, JsonRejection>,
) -> Result<Json<Pin>, ApiError> {
    let Json(request) = payload?;
    let new_pin = NewPin {
        x: request.x,
        y: request.y,
        name: request.name,
        description: request.description,
        category: request.category.parse()?,
    }
    .validated()?;

    let pin = state.pins.create_pin(&new_pin).await?;
    info!(pin_id = pin.id, category = %pin.category, "Pin created");
    Ok(Json(pin))
}

pub async fn list_pins(State(state): State<AppState>) -> Result<Json<Vec<Pin>>, ApiError> {
    Ok(Json(state.pins.list_pins().await?))
}

pub async fn get_pin(
    State(state): State<AppState>,
    pin_id: Result<Path<PinId>, PathRejection>,
) -> Result<Json<Pin>, ApiError> {
    let Path(pin_id) = pin_id?;
    state
        .pins
        .get_pin(pin_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Pin not found: {pin_id}")))
}
