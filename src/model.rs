//! Records kept by the store and the views handed to clients.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::games::GameKind;
use crate::money::{Bbc, Coins};

pub type Id = u64;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub password_hash: String,
    pub coin_balance: Coins,
    pub bbc_balance: Bbc,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            coin_balance: self.coin_balance,
            bbc_balance: self.bbc_balance,
            is_admin: self.is_admin,
        }
    }

    pub fn balances(&self) -> Balances {
        Balances { coin_balance: self.coin_balance, bbc_balance: self.bbc_balance }
    }

    pub fn admin_view(&self) -> AdminUserView {
        AdminUserView { profile: self.profile(), is_banned: self.is_banned, created_at: self.created_at }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Id,
    pub username: String,
    pub coin_balance: Coins,
    pub bbc_balance: Bbc,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub coin_balance: Coins,
    pub bbc_balance: Bbc,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    #[serde(flatten)]
    pub profile: Profile,
    pub is_banned: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: Id,
    pub user_id: Id,
    pub username: String,
    pub game_type: GameKind,
    pub bet_amount: Coins,
    pub win_amount: Coins,
    pub bbc_won: Bbc,
    pub result: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Pending until an admin decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    GCash,
    PayMaya,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: Id,
    pub user_id: Id,
    pub username: String,
    pub amount: Coins,
    pub payment_method: PaymentMethod,
    pub receipt_url: Option<String>,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: Id,
    pub user_id: Id,
    pub username: String,
    pub amount: Coins,
    pub withdrawal_method: PaymentMethod,
    pub account_details: String,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningActivity {
    pub id: Id,
    pub user_id: Id,
    pub bbc_mined: Bbc,
    pub clicks: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningStats {
    pub total_mined: Bbc,
    pub total_clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_users: usize,
    pub total_deposits: Coins,
    pub total_bbc_in_circulation: Bbc,
    pub active_games: usize,
}

/// Direction of a coin/BBC conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvertDirection {
    #[serde(rename = "toBBC")]
    ToBbc,
    #[serde(rename = "toCoins")]
    ToCoins,
}
