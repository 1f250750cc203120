//! Ipis Sipi: sneak a cockroach across nine increasingly risky steps.

use rand::Rng;
use serde::Serialize;

use super::{Detail, GameError, Outcome, payout};
use crate::money::{self, Bbc, Coins, Multiplier};

const fn m(hundredths: i64) -> Multiplier {
    Multiplier::from_units(hundredths)
}

pub const STEPS: u32 = 9;
pub const STEP_MULTIPLIERS: [Multiplier; STEPS as usize] =
    [m(120), m(150), m(200), m(280), m(400), m(600), m(900), m(1400), m(2100)];
/// Chance, in percent, of being caught on each step.
pub const STEP_RISKS: [u32; STEPS as usize] = [10, 15, 20, 25, 30, 35, 40, 45, 50];
pub const MAX_MULTIPLIER: Multiplier = STEP_MULTIPLIERS[STEPS as usize - 1];
pub const BBC_STEPS: u32 = 7;
pub const BBC_PERCENT: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub steps: u32,
    pub survived: u32,
    pub caught: bool,
}

pub fn play<R: Rng + ?Sized>(bet: Coins, steps: u32, rng: &mut R) -> Result<Outcome, GameError> {
    if !(1..=STEPS).contains(&steps) {
        return Err(GameError::Steps);
    }
    let mut survived = 0;
    for risk in STEP_RISKS.iter().take(steps as usize) {
        if rng.gen_ratio(*risk, 100) {
            break;
        }
        survived += 1;
    }
    settle(bet, Run { steps, survived, caught: survived < steps })
}

pub(crate) fn settle(bet: Coins, run: Run) -> Result<Outcome, GameError> {
    if run.caught {
        let message = format!("CAUGHT on step {}! The cockroach was spotted.", run.survived + 1);
        return Ok(Outcome::new(Coins::ZERO, Bbc::ZERO, message, Detail::IpisSipi(run)));
    }
    let by = STEP_MULTIPLIERS[run.steps as usize - 1];
    let win = payout(bet, by)?;
    let bbc = if run.steps >= BBC_STEPS { money::percent_of_coins(bet, BBC_PERCENT) } else { Bbc::ZERO };
    let message = if run.steps == STEPS {
        format!("ESCAPED! The cockroach made it through all {STEPS} steps!")
    } else {
        format!("Cashed out at step {} with {by}x multiplier!", run.steps)
    };
    Ok(Outcome::new(win, bbc, message, Detail::IpisSipi(run)))
}
