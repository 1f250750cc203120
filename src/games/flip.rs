//! Flip it Jonathan!: call coin flips in a row and cash out on the streak.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Detail, GameError, Outcome, payout};
use crate::money::{Bbc, Coins, Multiplier};

const fn m(hundredths: i64) -> Multiplier {
    Multiplier::from_units(hundredths)
}

/// Cash-out multiplier after 1, 2, ... correct calls.
pub const STREAK_MULTIPLIERS: [Multiplier; 10] =
    [m(150), m(200), m(300), m(450), m(600), m(900), m(1350), m(2000), m(3000), m(4500)];
pub const MAX_CALLS: usize = STREAK_MULTIPLIERS.len();
pub const MAX_MULTIPLIER: Multiplier = STREAK_MULTIPLIERS[MAX_CALLS - 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Heads,
    Tails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub calls: Vec<Side>,
    pub flips: Vec<Side>,
    pub streak: usize,
}

pub fn play<R: Rng + ?Sized>(bet: Coins, calls: &[Side], rng: &mut R) -> Result<Outcome, GameError> {
    if calls.is_empty() || calls.len() > MAX_CALLS {
        return Err(GameError::Calls);
    }
    let mut flips = Vec::with_capacity(calls.len());
    for call in calls {
        let flip = if rng.gen_bool(0.5) { Side::Heads } else { Side::Tails };
        flips.push(flip);
        if flip != *call {
            break;
        }
    }
    settle(bet, calls, flips)
}

pub(crate) fn settle(bet: Coins, calls: &[Side], flips: Vec<Side>) -> Result<Outcome, GameError> {
    let streak = calls.iter().zip(&flips).take_while(|(c, f)| c == f).count();
    let run = Run { calls: calls.to_vec(), flips, streak };
    if streak == calls.len() {
        let by = STREAK_MULTIPLIERS[streak - 1];
        let win = payout(bet, by)?;
        let message = format!("Cashed out at {by}x for {win} coins!");
        Ok(Outcome::new(win, Bbc::ZERO, message, Detail::FlipJonathan(run)))
    } else {
        let message = format!("Wrong call after a streak of {streak}. Lost {bet} coins.");
        Ok(Outcome::new(Coins::ZERO, Bbc::ZERO, message, Detail::FlipJonathan(run)))
    }
}
