//! Deposit and withdrawal requests.

use axum::extract::State;
use axum::Router;
use serde::Deserialize;

use super::{ApiError, ApiJson, AppState, post};
use crate::auth::AuthUser;
use crate::model::{Deposit, Id, PaymentMethod, Withdrawal};
use crate::money::Coins;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deposits", post(deposit))
        .route("/withdrawals", post(withdraw))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositRequest {
    user_id: Option<Id>,
    amount: Coins,
    payment_method: PaymentMethod,
    receipt_url: Option<String>,
}

async fn deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<DepositRequest>,
) -> Result<ApiJson<Deposit>, ApiError> {
    let user_id = auth.target(req.user_id)?;
    let deposit = state.store.create_deposit(user_id, req.amount, req.payment_method, req.receipt_url)?;
    Ok(ApiJson(deposit))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawalRequest {
    user_id: Option<Id>,
    amount: Coins,
    withdrawal_method: PaymentMethod,
    account_details: String,
}

async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<WithdrawalRequest>,
) -> Result<ApiJson<Withdrawal>, ApiError> {
    let user_id = auth.target(req.user_id)?;
    let withdrawal =
        state.store.create_withdrawal(user_id, req.amount, req.withdrawal_method, &req.account_details)?;
    Ok(ApiJson(withdrawal))
}
