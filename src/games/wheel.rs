//! Luck and Roll: a sixteen-slice prize wheel.

use rand::Rng;
use serde::Serialize;

use super::{Detail, GameError, Outcome, payout};
use crate::money::{self, Bbc, Coins, Multiplier};

pub const JACKPOT_BBC_PERCENT: u32 = 5;
pub const MAX_MULTIPLIER: Multiplier = Multiplier::whole(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Bankrupt,
    Multiplier(Multiplier),
    Jackpot,
}

const fn m(hundredths: i64) -> Segment {
    Segment::Multiplier(Multiplier::from_units(hundredths))
}

/// Six bankrupts, nine multipliers and one jackpot, in wheel order.
pub const WHEEL: [Segment; 16] = [
    Segment::Bankrupt,
    m(110),
    Segment::Bankrupt,
    m(130),
    Segment::Bankrupt,
    m(150),
    Segment::Jackpot,
    m(180),
    Segment::Bankrupt,
    m(200),
    Segment::Bankrupt,
    m(400),
    Segment::Bankrupt,
    m(500),
    m(800),
    m(1000),
];

/// Every coin multiplier on the wheel.
pub fn multipliers() -> impl Iterator<Item = Multiplier> {
    WHEEL.into_iter().filter_map(|segment| match segment {
        Segment::Multiplier(by) => Some(by),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spin {
    pub slice: usize,
    pub segment: Segment,
}

pub fn spin<R: Rng + ?Sized>(bet: Coins, rng: &mut R) -> Result<Outcome, GameError> {
    let slice = rng.gen_range(0..WHEEL.len());
    settle(bet, slice)
}

pub(crate) fn settle(bet: Coins, slice: usize) -> Result<Outcome, GameError> {
    let segment = WHEEL[slice % WHEEL.len()];
    let detail = Detail::LuckAndRoll(Spin { slice, segment });
    let outcome = match segment {
        Segment::Bankrupt => {
            Outcome::new(Coins::ZERO, Bbc::ZERO, "Bankrupt! Better luck next time!".into(), detail)
        }
        Segment::Multiplier(by) => {
            let win = payout(bet, by)?;
            Outcome::new(win, Bbc::ZERO, format!("You won {win} coins! ({by}x)"), detail)
        }
        Segment::Jackpot => {
            let bbc = money::percent_of_coins(bet, JACKPOT_BBC_PERCENT);
            Outcome::new(Coins::ZERO, bbc, format!("JACKPOT! You won {bbc} $BBC tokens!"), detail)
        }
    };
    Ok(outcome)
}
