//! Game endpoints: server-rolled rounds and the legacy client-reported one.

use axum::extract::State;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiJson, AppState, get, post};
use crate::auth::AuthUser;
use crate::games::{flip, Detail, GameKind, Play};
use crate::model::{Balances, GameResult, Id};
use crate::money::{Bbc, Coins, Multiplier};
use crate::store::RECENT_WINS_LIMIT;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/play", post(report))
        .route("/recent-wins", get(recent_wins))
        .route("/luck-and-roll", post(luck_and_roll))
        .route("/paldo", post(paldo))
        .route("/flip-jonathan", post(flip_jonathan))
        .route("/ipis-sipi", post(ipis_sipi))
        .route("/blow-joy-balloon", post(blow_joy_balloon))
}

/// A round the browser rolled itself.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reported {
    user_id: Option<Id>,
    game_type: GameKind,
    bet_amount: Coins,
    #[serde(default)]
    win_amount: Coins,
    #[serde(default)]
    bbc_won: Bbc,
    #[serde(default)]
    result: String,
}

async fn report(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<Reported>,
) -> Result<ApiJson<GameResult>, ApiError> {
    let user_id = auth.target(req.user_id)?;
    req.game_type.check_reported(req.bet_amount, req.win_amount, req.bbc_won)?;
    let text = match req.result.trim() {
        "" if req.win_amount.is_positive() => format!("Won {} coins", req.win_amount),
        "" => "No win".to_owned(),
        text => text.to_owned(),
    };
    let (result, _) =
        state.store.settle_game(user_id, req.game_type, req.bet_amount, req.win_amount, req.bbc_won, text)?;
    Ok(ApiJson(result))
}

async fn recent_wins(State(state): State<AppState>) -> ApiJson<Vec<GameResult>> {
    ApiJson(state.store.recent_wins(RECENT_WINS_LIMIT))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Rolled {
    result: GameResult,
    outcome: Detail,
    #[serde(flatten)]
    balances: Balances,
}

/// Roll on the server, then settle against the caller's balance.
fn roll(state: &AppState, auth: &AuthUser, play: Play, bet: Coins) -> Result<ApiJson<Rolled>, ApiError> {
    let outcome = play.roll(bet, &mut rand::thread_rng())?;
    let (result, balances) =
        state.store.settle_game(auth.user.id, play.kind(), bet, outcome.win, outcome.bbc, outcome.message)?;
    Ok(ApiJson(Rolled { result, outcome: outcome.detail, balances }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Bet {
    bet_amount: Coins,
}

async fn luck_and_roll(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<Bet>,
) -> Result<ApiJson<Rolled>, ApiError> {
    roll(&state, &auth, Play::LuckAndRoll, req.bet_amount)
}

async fn paldo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<Bet>,
) -> Result<ApiJson<Rolled>, ApiError> {
    roll(&state, &auth, Play::Paldo, req.bet_amount)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlipRequest {
    bet_amount: Coins,
    calls: Vec<flip::Side>,
}

async fn flip_jonathan(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<FlipRequest>,
) -> Result<ApiJson<Rolled>, ApiError> {
    roll(&state, &auth, Play::FlipJonathan { calls: req.calls }, req.bet_amount)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpisRequest {
    bet_amount: Coins,
    steps: u32,
}

async fn ipis_sipi(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<IpisRequest>,
) -> Result<ApiJson<Rolled>, ApiError> {
    roll(&state, &auth, Play::IpisSipi { steps: req.steps }, req.bet_amount)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalloonRequest {
    bet_amount: Coins,
    cash_out_at: Multiplier,
}

async fn blow_joy_balloon(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<BalloonRequest>,
) -> Result<ApiJson<Rolled>, ApiError> {
    roll(&state, &auth, Play::BlowJoyBalloon { cash_out_at: req.cash_out_at }, req.bet_amount)
}
