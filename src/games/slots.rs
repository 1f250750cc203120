//! Paldo!: a five-reel, three-row video slot.

use rand::Rng;
use serde::Serialize;

use super::{Detail, GameError, Outcome, payout};
use crate::money::{self, Bbc, Coins, Multiplier};

pub const REELS: usize = 5;
pub const ROWS: usize = 3;
pub const BONUS_SCATTERS: usize = 3;
pub const BONUS_BBC_PERCENT: u32 = 10;
/// Five diamonds on the center line.
pub const MAX_MULTIPLIER: Multiplier = Multiplier::whole(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Cherry,
    Lemon,
    Grape,
    Star,
    Diamond,
    Bell,
    MoneyBag,
    Scatter,
}

pub const SYMBOLS: [Symbol; 8] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Grape,
    Symbol::Star,
    Symbol::Diamond,
    Symbol::Bell,
    Symbol::MoneyBag,
    Symbol::Scatter,
];

impl Symbol {
    /// Line pay per matching symbol, as a multiple of the bet.
    fn line_pay(self) -> i64 {
        match self {
            Symbol::Diamond => 10,
            Symbol::MoneyBag => 8,
            Symbol::Star => 5,
            _ => 2,
        }
    }
}

pub type Reels = [[Symbol; ROWS]; REELS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spin {
    pub reels: Reels,
    pub scatters: usize,
    pub bonus: bool,
}

pub fn spin<R: Rng + ?Sized>(bet: Coins, rng: &mut R) -> Result<Outcome, GameError> {
    let mut reels = [[Symbol::Cherry; ROWS]; REELS];
    for reel in reels.iter_mut() {
        for cell in reel.iter_mut() {
            *cell = SYMBOLS[rng.gen_range(0..SYMBOLS.len())];
        }
    }
    settle(bet, reels)
}

pub(crate) fn settle(bet: Coins, reels: Reels) -> Result<Outcome, GameError> {
    let mut win = Coins::ZERO;
    for symbol in SYMBOLS {
        let count = reels.iter().filter(|reel| reel[1] == symbol).count() as i64;
        if count >= 3 {
            let line = payout(bet, Multiplier::whole(symbol.line_pay() * count))?;
            win = win.checked_add(line).ok_or(GameError::BetSize)?;
        }
    }

    let scatters = reels.iter().flatten().filter(|s| **s == Symbol::Scatter).count();
    let bonus = scatters >= BONUS_SCATTERS;
    let bbc = if bonus { money::percent_of_coins(bet, BONUS_BBC_PERCENT) } else { Bbc::ZERO };

    let message = if bonus {
        format!("BONUS ROUND! Free spins activated + {bbc} $BBC!")
    } else if win.is_positive() {
        format!("You won {win} coins!")
    } else {
        "No win this time. Try again!".to_string()
    };
    Ok(Outcome::new(win, bbc, message, Detail::Paldo(Spin { reels, scatters, bonus })))
}
