use axum::{extract::State, Json};
use tracing::instrument;

use crate::{
    data::{RollRequest, RollResponse},
    dice::{self, Pool},
    error::AppError,
    state::SharedState,
};

// ==============================================================================
// === REST API Handlers
// =============================================================================

#[instrument]
pub async fn pool_handler(Json(payload): Json<RollRequest>) -> Result<Json<Pool>, AppError> {
    let pool = dice::parse(&payload.notation)?;
    Ok(Json(pool))
}

#[instrument(skip(state))]
pub async fn roll_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RollRequest>,
) -> Result<Json<RollResponse>, AppError> {
    let pool = dice::parse(&payload.notation)?;
    let results = state.roller.roll(pool.clone());
    let response = RollResponse::new(pool, results);

    tracing::info!(
        notation = %payload.notation,
        skill_successes = response.skill_successes,
        luck_successes = response.luck_successes,
        "Rolled pool"
    );
    Ok(Json(response))
}
