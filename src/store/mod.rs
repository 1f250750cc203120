//! In-memory relational store: one concurrent map per table.
//!
//! Balance changes run under the owning user's entry lock, so a bet, a
//! conversion and a deposit approval racing on the same account all see
//! each other's effects. Lock order is record table first, then `users`;
//! user guards are released before a new record is inserted.

use dashmap::DashMap;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::password::{self, PasswordError};
use crate::model::{Deposit, GameResult, Id, MiningActivity, User, Withdrawal};
use crate::money::{Bbc, Coins};
use crate::util::id::Serial;

mod ledger;
mod mining;
mod payments;
mod stats;
mod users;

pub use ledger::RECENT_WINS_LIMIT;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found")]
    UserNotFound,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Account banned")]
    Banned,
    #[error("Admin accounts cannot play games")]
    AdminCannotPlay,
    #[error("Admin accounts cannot be banned")]
    AdminProtected,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Insufficient coins")]
    InsufficientCoins,
    #[error("Insufficient BBC tokens")]
    InsufficientBbc,
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("Deposit not found")]
    DepositNotFound,
    #[error("Withdrawal not found")]
    WithdrawalNotFound,
    #[error("Request has already been decided")]
    AlreadyDecided,
    #[error("Balance out of range")]
    Overflow,
}

#[derive(Debug, Default)]
struct Sequences {
    users: Serial,
    game_results: Serial,
    deposits: Serial,
    withdrawals: Serial,
    mining: Serial,
}

#[derive(Debug, Default)]
pub struct Store {
    users: DashMap<Id, User>,
    usernames: DashMap<String, Id>,
    game_results: DashMap<Id, GameResult>,
    deposits: DashMap<Id, Deposit>,
    withdrawals: DashMap<Id, Withdrawal>,
    mining: DashMap<Id, MiningActivity>,
    ids: Sequences,
}

/// Demo accounts: (username, password, admin, coins, bbc).
const DEMO_ACCOUNTS: [(&str, &str, bool, Coins, Bbc); 2] = [
    ("admin", "admin1234", true, Coins::whole(999_999), Bbc::whole(999)),
    ("player1", "password123", false, Coins::from_units(1_245_075), Bbc::from_units(235_000_000)),
];

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the demo admin and player unless they already exist.
    pub fn seed_demo_accounts(&self) -> Result<(), PasswordError> {
        for (username, pw, is_admin, coins, bbc) in DEMO_ACCOUNTS {
            if self.usernames.contains_key(username) {
                continue;
            }
            let hash = password::hash(pw)?;
            let Ok(id) = self.create_user(username, hash).map(|u| u.id) else { continue };
            if let Some(mut user) = self.users.get_mut(&id) {
                user.is_admin = is_admin;
                user.coin_balance = coins;
                user.bbc_balance = bbc;
            }
            info!(user_id = id, username, is_admin, "seeded demo account");
        }
        Ok(())
    }
}

fn newest_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> (OffsetDateTime, Id)) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}
