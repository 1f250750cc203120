use axum::extract::State;
use axum::Router;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiJson, AppState, post};
use crate::auth::AuthUser;
use crate::model::{Id, MiningActivity};
use crate::money::Bbc;

/// Each mining request pays between 0.00000001 and 0.00001000 BBC.
pub const MAX_MINED_UNITS: i64 = 1_000;

pub fn routes() -> Router<AppState> {
    Router::new().route("/mine", post(mine))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MineRequest {
    user_id: Option<Id>,
    clicks: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Mined {
    bbc_mined: Bbc,
    activity: MiningActivity,
}

async fn mine(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<MineRequest>,
) -> Result<ApiJson<Mined>, ApiError> {
    let user_id = auth.target(req.user_id)?;
    let mined = Bbc::from_units(rand::thread_rng().gen_range(1..=MAX_MINED_UNITS));
    let activity = state.store.record_mining(user_id, req.clicks.unwrap_or(1), mined)?;
    Ok(ApiJson(Mined { bbc_mined: mined, activity }))
}
