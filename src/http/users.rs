//! Per-account reads and coin/BBC conversion.

use axum::extract::State;
use axum::Router;
use serde::Deserialize;

use super::{ApiError, ApiJson, ApiPath, AppState, get, post};
use crate::auth::AuthUser;
use crate::model::{Balances, ConvertDirection, Deposit, GameResult, Id, MiningStats, Profile, Withdrawal};
use crate::money::Bbc;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(profile))
        .route("/:id/convert", post(convert))
        .route("/:id/game-history", get(game_history))
        .route("/:id/deposits", get(deposits))
        .route("/:id/withdrawals", get(withdrawals))
        .route("/:id/mining-stats", get(mining_stats))
}

async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Profile>, ApiError> {
    auth.ensure_can_access(id)?;
    Ok(ApiJson(state.store.user(id)?.profile()))
}

#[derive(Deserialize)]
struct ConvertRequest {
    #[serde(rename = "type")]
    direction: ConvertDirection,
    /// Always a BBC amount, whichever way it converts.
    amount: Bbc,
}

async fn convert(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(req): ApiJson<ConvertRequest>,
) -> Result<ApiJson<Balances>, ApiError> {
    auth.ensure_can_access(id)?;
    Ok(ApiJson(state.store.convert(id, req.direction, req.amount)?))
}

async fn game_history(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Vec<GameResult>>, ApiError> {
    auth.ensure_can_access(id)?;
    Ok(ApiJson(state.store.game_history(id)))
}

async fn deposits(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Vec<Deposit>>, ApiError> {
    auth.ensure_can_access(id)?;
    Ok(ApiJson(state.store.user_deposits(id)))
}

async fn withdrawals(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Vec<Withdrawal>>, ApiError> {
    auth.ensure_can_access(id)?;
    Ok(ApiJson(state.store.user_withdrawals(id)))
}

async fn mining_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<MiningStats>, ApiError> {
    auth.ensure_can_access(id)?;
    Ok(ApiJson(state.store.mining_stats(id)))
}
