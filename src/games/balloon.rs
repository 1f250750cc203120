//! Blow Joy Balloon: cash out before the balloon pops.

use rand::Rng;
use serde::Serialize;

use super::{Detail, GameError, Outcome, payout};
use crate::money::{self, Bbc, Coins, Multiplier};

pub const MIN_CASH_OUT: Multiplier = Multiplier::from_units(101);
pub const MAX_CASH_OUT: Multiplier = Multiplier::whole(50);
/// One balloon in twenty is a bonus balloon.
pub const BONUS_CHANCE_PERCENT: u32 = 5;
pub const BBC_PERCENT: u32 = 8;
/// Cash-outs at or above this multiplier earn BBC even on a normal balloon.
pub const BBC_THRESHOLD: Multiplier = Multiplier::whole(4);

const NORMAL_POP: (i64, i64) = (150, 500);
const BONUS_POP: (i64, i64) = (200, 1000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub cash_out_at: Multiplier,
    pub pop_point: Multiplier,
    pub bonus: bool,
    pub popped: bool,
}

pub fn play<R: Rng + ?Sized>(bet: Coins, cash_out_at: Multiplier, rng: &mut R) -> Result<Outcome, GameError> {
    if cash_out_at < MIN_CASH_OUT || cash_out_at > MAX_CASH_OUT {
        return Err(GameError::CashOut);
    }
    let bonus = rng.gen_ratio(BONUS_CHANCE_PERCENT, 100);
    let (low, high) = if bonus { BONUS_POP } else { NORMAL_POP };
    let pop_point = Multiplier::from_units(rng.gen_range(low..=high));
    settle(bet, cash_out_at, pop_point, bonus)
}

pub(crate) fn settle(
    bet: Coins,
    cash_out_at: Multiplier,
    pop_point: Multiplier,
    bonus: bool,
) -> Result<Outcome, GameError> {
    // The inflation loop checks the cash-out before the pop, so a tie is a win.
    let popped = cash_out_at > pop_point;
    let run = Run { cash_out_at, pop_point, bonus, popped };
    if popped {
        let message = format!("BALLOON POPPED at {pop_point}x! Better luck next time!");
        return Ok(Outcome::new(Coins::ZERO, Bbc::ZERO, message, Detail::BlowJoyBalloon(run)));
    }
    let win = payout(bet, cash_out_at)?;
    let bbc = if bonus || cash_out_at >= BBC_THRESHOLD {
        money::percent_of_coins(bet, BBC_PERCENT)
    } else {
        Bbc::ZERO
    };
    let message = format!("Cashed out at {cash_out_at}x for {win} coins!");
    Ok(Outcome::new(win, bbc, message, Detail::BlowJoyBalloon(run)))
}
