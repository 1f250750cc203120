use time::{Duration, OffsetDateTime};

use super::Store;
use crate::model::{Status, SystemStats};
use crate::money::{Bbc, Coins};

/// A game counts as active for this long after it was played.
const ACTIVE_WINDOW: Duration = Duration::HOUR;

impl Store {
    /// Dashboard numbers. Admin accounts are left out of the player and
    /// circulation figures.
    pub fn system_stats(&self, now: OffsetDateTime) -> SystemStats {
        let (total_users, total_bbc_in_circulation) = self
            .users
            .iter()
            .filter(|u| !u.is_admin)
            .fold((0, Bbc::ZERO), |(n, bbc), u| (n + 1, bbc.checked_add(u.bbc_balance).unwrap_or(bbc)));

        let total_deposits: Coins = self
            .deposits
            .iter()
            .filter(|d| d.status == Status::Approved)
            .map(|d| d.amount)
            .sum();

        let since = now - ACTIVE_WINDOW;
        let active_games = self.game_results.iter().filter(|r| r.created_at > since).count();

        SystemStats { total_users, total_deposits, total_bbc_in_circulation, active_games }
    }
}
