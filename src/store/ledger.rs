use time::OffsetDateTime;
use tracing::info;

use super::{newest_first, Store, StoreError};
use crate::games::GameKind;
use crate::model::{Balances, ConvertDirection, GameResult, Id};
use crate::money::{bbc_to_coins, coins_for_bbc, Bbc, Coins};

pub const RECENT_WINS_LIMIT: usize = 10;

impl Store {
    /// Debit the bet, credit the winnings and record the round in one step.
    pub fn settle_game(
        &self,
        user_id: Id,
        game: GameKind,
        bet: Coins,
        win: Coins,
        bbc: Bbc,
        result: String,
    ) -> Result<(GameResult, Balances), StoreError> {
        if !bet.is_positive() || win.is_negative() || bbc.is_negative() {
            return Err(StoreError::NonPositiveAmount);
        }

        let mut user = self.users.get_mut(&user_id).ok_or(StoreError::UserNotFound)?;
        if user.is_banned {
            return Err(StoreError::Banned);
        }
        if user.is_admin {
            return Err(StoreError::AdminCannotPlay);
        }
        if user.coin_balance < bet {
            return Err(StoreError::InsufficientBalance);
        }
        let coins = user
            .coin_balance
            .checked_sub(bet)
            .and_then(|c| c.checked_add(win))
            .ok_or(StoreError::Overflow)?;
        let bbc_balance = user.bbc_balance.checked_add(bbc).ok_or(StoreError::Overflow)?;
        user.coin_balance = coins;
        user.bbc_balance = bbc_balance;

        let record = GameResult {
            id: self.ids.game_results.next(),
            user_id,
            username: user.username.clone(),
            game_type: game,
            bet_amount: bet,
            win_amount: win,
            bbc_won: bbc,
            result,
            created_at: OffsetDateTime::now_utc(),
        };
        let balances = user.balances();
        drop(user);

        self.game_results.insert(record.id, record.clone());
        info!(user_id, game = %game, bet = %bet, win = %win, bbc = %bbc, "game settled");
        Ok((record, balances))
    }

    pub fn convert(
        &self,
        user_id: Id,
        direction: ConvertDirection,
        amount: Bbc,
    ) -> Result<Balances, StoreError> {
        if !amount.is_positive() {
            return Err(StoreError::NonPositiveAmount);
        }
        let mut user = self.users.get_mut(&user_id).ok_or(StoreError::UserNotFound)?;
        match direction {
            ConvertDirection::ToBbc => {
                let cost = coins_for_bbc(amount);
                if user.coin_balance < cost {
                    return Err(StoreError::InsufficientCoins);
                }
                let bbc = user.bbc_balance.checked_add(amount).ok_or(StoreError::Overflow)?;
                user.coin_balance = user.coin_balance.checked_sub(cost).ok_or(StoreError::Overflow)?;
                user.bbc_balance = bbc;
                info!(user_id, bbc = %amount, coins = %cost, "converted coins to BBC");
            }
            ConvertDirection::ToCoins => {
                if user.bbc_balance < amount {
                    return Err(StoreError::InsufficientBbc);
                }
                let proceeds = bbc_to_coins(amount);
                let coins = user.coin_balance.checked_add(proceeds).ok_or(StoreError::Overflow)?;
                user.bbc_balance = user.bbc_balance.checked_sub(amount).ok_or(StoreError::Overflow)?;
                user.coin_balance = coins;
                info!(user_id, bbc = %amount, coins = %proceeds, "converted BBC to coins");
            }
        }
        Ok(user.balances())
    }

    /// Winning rounds across all players, newest first.
    pub fn recent_wins(&self, limit: usize) -> Vec<GameResult> {
        let rows = self
            .game_results
            .iter()
            .filter(|r| r.win_amount.is_positive())
            .map(|r| r.clone())
            .collect();
        let mut rows = newest_first(rows, |r: &GameResult| (r.created_at, r.id));
        rows.truncate(limit);
        rows
    }

    pub fn game_history(&self, user_id: Id) -> Vec<GameResult> {
        let rows = self
            .game_results
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect();
        newest_first(rows, |r: &GameResult| (r.created_at, r.id))
    }
}
