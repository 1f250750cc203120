//! The five casino games.
//!
//! Each game is a pure function of the bet, the player's choices and an
//! injected RNG. The server can roll a play itself (`Play::roll`) or check
//! a result the client rolled against the game's payout table
//! (`GameKind::check_reported`).

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::money::{self, Bbc, Coins, Multiplier};

pub mod balloon;
pub mod flip;
pub mod ipis;
pub mod slots;
pub mod wheel;

/// Bet sizes offered on every table.
pub const BET_SIZES: [Coins; 11] = [
    Coins::from_units(25),
    Coins::from_units(50),
    Coins::from_units(100),
    Coins::from_units(150),
    Coins::from_units(200),
    Coins::from_units(500),
    Coins::from_units(1_000),
    Coins::from_units(5_000),
    Coins::from_units(10_000),
    Coins::from_units(50_000),
    Coins::from_units(100_000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "Luck and Roll")]
    LuckAndRoll,
    #[serde(rename = "Paldo!")]
    Paldo,
    #[serde(rename = "Flip it Jonathan!")]
    FlipJonathan,
    #[serde(rename = "Ipis Sipi")]
    IpisSipi,
    #[serde(rename = "Blow Joy Balloon")]
    BlowJoyBalloon,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::LuckAndRoll,
        GameKind::Paldo,
        GameKind::FlipJonathan,
        GameKind::IpisSipi,
        GameKind::BlowJoyBalloon,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::LuckAndRoll => "Luck and Roll",
            GameKind::Paldo => "Paldo!",
            GameKind::FlipJonathan => "Flip it Jonathan!",
            GameKind::IpisSipi => "Ipis Sipi",
            GameKind::BlowJoyBalloon => "Blow Joy Balloon",
        }
    }

    /// Highest coin payout the game can produce, as a multiple of the bet.
    pub fn max_multiplier(self) -> Multiplier {
        match self {
            GameKind::LuckAndRoll => wheel::MAX_MULTIPLIER,
            GameKind::Paldo => slots::MAX_MULTIPLIER,
            GameKind::FlipJonathan => flip::MAX_MULTIPLIER,
            GameKind::IpisSipi => ipis::MAX_MULTIPLIER,
            GameKind::BlowJoyBalloon => balloon::MAX_CASH_OUT,
        }
    }

    /// Highest BBC reward, as a percentage of the coin bet.
    pub fn max_bbc_percent(self) -> u32 {
        match self {
            GameKind::LuckAndRoll => wheel::JACKPOT_BBC_PERCENT,
            GameKind::Paldo => slots::BONUS_BBC_PERCENT,
            GameKind::FlipJonathan => 0,
            GameKind::IpisSipi => ipis::BBC_PERCENT,
            GameKind::BlowJoyBalloon => balloon::BBC_PERCENT,
        }
    }

    /// Reject a client-rolled result the game could never have produced.
    ///
    /// BBC is all-or-nothing per game, and games with a fixed paytable
    /// must pay exactly one of its multipliers.
    pub fn check_reported(self, bet: Coins, win: Coins, bbc: Bbc) -> Result<(), GameError> {
        check_bet(bet)?;
        if win.is_negative() || bbc.is_negative() || win > payout(bet, self.max_multiplier())? {
            return Err(GameError::Implausible);
        }

        if bbc.is_positive() {
            if bbc != money::percent_of_coins(bet, self.max_bbc_percent()) {
                return Err(GameError::Implausible);
            }
            let consistent = match self {
                // The jackpot slice pays BBC instead of coins.
                GameKind::LuckAndRoll => !win.is_positive(),
                GameKind::IpisSipi => win >= payout(bet, ipis::STEP_MULTIPLIERS[ipis::BBC_STEPS as usize - 1])?,
                GameKind::BlowJoyBalloon => win.is_positive(),
                GameKind::Paldo | GameKind::FlipJonathan => true,
            };
            if !consistent {
                return Err(GameError::Implausible);
            }
        }

        if win.is_positive() {
            let table: Vec<Multiplier> = match self {
                GameKind::LuckAndRoll => wheel::multipliers().collect(),
                GameKind::FlipJonathan => flip::STREAK_MULTIPLIERS.to_vec(),
                GameKind::IpisSipi => ipis::STEP_MULTIPLIERS.to_vec(),
                GameKind::Paldo | GameKind::BlowJoyBalloon => Vec::new(),
            };
            if !table.is_empty() && !table.into_iter().any(|by| payout(bet, by) == Ok(win)) {
                return Err(GameError::Implausible);
            }
        }
        Ok(())
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid bet amount")]
    BetSize,
    #[error("Make between 1 and {max} calls", max = flip::MAX_CALLS)]
    Calls,
    #[error("Choose between 1 and {max} steps", max = ipis::STEPS)]
    Steps,
    #[error("Cash-out must be between {min}x and {max}x", min = balloon::MIN_CASH_OUT, max = balloon::MAX_CASH_OUT)]
    CashOut,
    #[error("Implausible game result")]
    Implausible,
}

pub fn check_bet(bet: Coins) -> Result<(), GameError> {
    if BET_SIZES.contains(&bet) { Ok(()) } else { Err(GameError::BetSize) }
}

pub(crate) fn payout(bet: Coins, by: Multiplier) -> Result<Coins, GameError> {
    bet.scale(by).ok_or(GameError::BetSize)
}

/// What one settled play paid out.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub win: Coins,
    pub bbc: Bbc,
    pub message: String,
    pub detail: Detail,
}

impl Outcome {
    fn new(win: Coins, bbc: Bbc, message: String, detail: Detail) -> Self {
        let message = if bbc.is_positive() && !message.contains("$BBC") {
            format!("{message} + {bbc} $BBC!")
        } else {
            message
        };
        Self { win, bbc, message, detail }
    }
}

/// Game-specific record of how the outcome was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum Detail {
    LuckAndRoll(wheel::Spin),
    Paldo(slots::Spin),
    FlipJonathan(flip::Run),
    IpisSipi(ipis::Run),
    BlowJoyBalloon(balloon::Run),
}

/// A server-rolled play request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Play {
    LuckAndRoll,
    Paldo,
    FlipJonathan { calls: Vec<flip::Side> },
    IpisSipi { steps: u32 },
    BlowJoyBalloon { cash_out_at: Multiplier },
}

impl Play {
    pub fn kind(&self) -> GameKind {
        match self {
            Play::LuckAndRoll => GameKind::LuckAndRoll,
            Play::Paldo => GameKind::Paldo,
            Play::FlipJonathan { .. } => GameKind::FlipJonathan,
            Play::IpisSipi { .. } => GameKind::IpisSipi,
            Play::BlowJoyBalloon { .. } => GameKind::BlowJoyBalloon,
        }
    }

    pub fn roll<R: Rng + ?Sized>(&self, bet: Coins, rng: &mut R) -> Result<Outcome, GameError> {
        check_bet(bet)?;
        match self {
            Play::LuckAndRoll => wheel::spin(bet, rng),
            Play::Paldo => slots::spin(bet, rng),
            Play::FlipJonathan { calls } => flip::play(bet, calls, rng),
            Play::IpisSipi { steps } => ipis::play(bet, *steps, rng),
            Play::BlowJoyBalloon { cash_out_at } => balloon::play(bet, *cash_out_at, rng),
        }
    }
}
