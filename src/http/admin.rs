//! Back-office endpoints. Every handler requires an admin caller.

use axum::extract::State;
use axum::Router;
use time::OffsetDateTime;
use tracing::info;

use super::{ApiError, ApiJson, ApiPath, AppState, Message, get, post};
use crate::auth::AdminUser;
use crate::model::{AdminUserView, Deposit, Id, SystemStats, Withdrawal};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users))
        .route("/stats", get(stats))
        .route("/pending-deposits", get(pending_deposits))
        .route("/deposits/:id/approve", post(approve_deposit))
        .route("/deposits/:id/reject", post(reject_deposit))
        .route("/pending-withdrawals", get(pending_withdrawals))
        .route("/withdrawals/:id/approve", post(approve_withdrawal))
        .route("/withdrawals/:id/reject", post(reject_withdrawal))
        .route("/users/:id/ban", post(ban))
        .route("/users/:id/unban", post(unban))
}

async fn users(State(state): State<AppState>, _: AdminUser) -> ApiJson<Vec<AdminUserView>> {
    ApiJson(state.store.non_admin_users().iter().map(|u| u.admin_view()).collect())
}

async fn stats(State(state): State<AppState>, _: AdminUser) -> ApiJson<SystemStats> {
    ApiJson(state.store.system_stats(OffsetDateTime::now_utc()))
}

async fn pending_deposits(State(state): State<AppState>, _: AdminUser) -> ApiJson<Vec<Deposit>> {
    ApiJson(state.store.pending_deposits())
}

async fn pending_withdrawals(State(state): State<AppState>, _: AdminUser) -> ApiJson<Vec<Withdrawal>> {
    ApiJson(state.store.pending_withdrawals())
}

async fn approve_deposit(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Message>, ApiError> {
    state.store.decide_deposit(id, true)?;
    info!(admin_id = admin.id, deposit_id = id, "deposit approved");
    Ok(ApiJson(Message { message: "Deposit approved" }))
}

async fn reject_deposit(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Message>, ApiError> {
    state.store.decide_deposit(id, false)?;
    info!(admin_id = admin.id, deposit_id = id, "deposit rejected");
    Ok(ApiJson(Message { message: "Deposit rejected" }))
}

async fn approve_withdrawal(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Message>, ApiError> {
    state.store.decide_withdrawal(id, true)?;
    info!(admin_id = admin.id, withdrawal_id = id, "withdrawal approved");
    Ok(ApiJson(Message { message: "Withdrawal approved" }))
}

async fn reject_withdrawal(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Message>, ApiError> {
    state.store.decide_withdrawal(id, false)?;
    info!(admin_id = admin.id, withdrawal_id = id, "withdrawal rejected");
    Ok(ApiJson(Message { message: "Withdrawal rejected" }))
}

async fn ban(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Message>, ApiError> {
    state.store.set_banned(id, true)?;
    let revoked = state.sessions.revoke_user(id);
    info!(admin_id = admin.id, user_id = id, revoked, "user banned");
    Ok(ApiJson(Message { message: "User banned" }))
}

async fn unban(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<ApiJson<Message>, ApiError> {
    state.store.set_banned(id, false)?;
    info!(admin_id = admin.id, user_id = id, "user unbanned");
    Ok(ApiJson(Message { message: "User unbanned" }))
}
