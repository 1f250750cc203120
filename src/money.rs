//! Fixed-point money amounts.
//!
//! Coin balances carry two decimals and BBC balances carry eight, so both
//! are stored as integer counts of their smallest unit and rendered as
//! decimal strings on the wire (`"12450.75"`, `"2.35000000"`).

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An amount counted in units of `10^-SCALE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed<const SCALE: u32>(i64);

/// Coin balance, in cents.
pub type Coins = Fixed<2>;

/// BBC token balance, in units of 0.00000001.
pub type Bbc = Fixed<8>;

/// Payout multiplier in hundredths (`150` is 1.5x).
pub type Multiplier = Fixed<2>;

/// Coins paid for one whole BBC.
pub const COINS_PER_BBC: i64 = 5000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid character {0:?} in amount")]
    InvalidChar(char),
    #[error("amount out of range")]
    Overflow,
}

impl<const SCALE: u32> Fixed<SCALE> {
    pub const ZERO: Self = Self(0);
    const FACTOR: i64 = 10i64.pow(SCALE);

    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    pub const fn units(self) -> i64 {
        self.0
    }

    pub const fn whole(n: i64) -> Self {
        Self(n * Self::FACTOR)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Multiply by `by`, rounding half away from zero.
    pub fn scale(self, by: Multiplier) -> Option<Self> {
        let scaled = i128::from(self.0) * i128::from(by.units());
        i64::try_from(div_round(scaled, i128::from(Multiplier::FACTOR))).ok().map(Self)
    }
}

/// BBC reward worth `percent` percent of a coin bet (`5` turns a 2.00
/// coin bet into 0.10000000 BBC).
pub fn percent_of_coins(bet: Coins, percent: u32) -> Bbc {
    // 1 cent is 10^6 BBC units; the percentage divides by 100.
    Bbc::from_units(bet.units().saturating_mul(10_000).saturating_mul(i64::from(percent)))
}

/// Coins needed to buy `amount` BBC. Partial cents round up.
pub fn coins_for_bbc(amount: Bbc) -> Coins {
    let (num, den) = bbc_cents_ratio(amount);
    let cents = if num >= 0 { (num + den - 1) / den } else { num / den };
    Coins::from_units(clamp_i64(cents))
}

/// Coins received for selling `amount` BBC. Partial cents round down.
pub fn bbc_to_coins(amount: Bbc) -> Coins {
    let (num, den) = bbc_cents_ratio(amount);
    Coins::from_units(clamp_i64(num / den))
}

fn bbc_cents_ratio(amount: Bbc) -> (i128, i128) {
    let num = i128::from(amount.units()) * i128::from(COINS_PER_BBC) * i128::from(Coins::FACTOR);
    (num, i128::from(Bbc::FACTOR))
}

fn clamp_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}

fn div_round(n: i128, d: i128) -> i128 {
    if n >= 0 { (n + d / 2) / d } else { (n - d / 2) / d }
}

impl<const SCALE: u32> FromStr for Fixed<SCALE> {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let limit = i128::from(i64::MAX);
        let push = |units: i128, c: char| -> Result<i128, ParseAmountError> {
            let d = c.to_digit(10).ok_or(ParseAmountError::InvalidChar(c))?;
            let next = units * 10 + i128::from(d);
            if next > limit { Err(ParseAmountError::Overflow) } else { Ok(next) }
        };

        let mut units: i128 = 0;
        for c in int_part.chars() {
            units = push(units, c)?;
        }
        let mut frac = frac_part.chars();
        for _ in 0..SCALE {
            units = push(units, frac.next().unwrap_or('0'))?;
        }
        // Half-up on the first dropped digit; anything after it only has to be a digit.
        if let Some(c) = frac.next() {
            let d = c.to_digit(10).ok_or(ParseAmountError::InvalidChar(c))?;
            if d >= 5 {
                units += 1;
            }
        }
        if let Some(c) = frac.find(|c| !c.is_ascii_digit()) {
            return Err(ParseAmountError::InvalidChar(c));
        }

        let units = i64::try_from(units).map_err(|_| ParseAmountError::Overflow)?;
        Ok(Self(if negative { -units } else { units }))
    }
}

impl<const SCALE: u32> fmt::Display for Fixed<SCALE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        if SCALE == 0 {
            return write!(f, "{sign}{abs}");
        }
        let factor = Self::FACTOR.unsigned_abs();
        write!(f, "{sign}{}.{:0width$}", abs / factor, abs % factor, width = SCALE as usize)
    }
}

impl<const SCALE: u32> Sum for Fixed<SCALE> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| Self(acc.0.saturating_add(x.0)))
    }
}

impl<'a, const SCALE: u32> Sum<&'a Fixed<SCALE>> for Fixed<SCALE> {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl<const SCALE: u32> Serialize for Fixed<SCALE> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const SCALE: u32> Deserialize<'de> for Fixed<SCALE> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FixedVisitor::<SCALE>)
    }
}

struct FixedVisitor<const SCALE: u32>;

impl<'de, const SCALE: u32> Visitor<'de> for FixedVisitor<SCALE> {
    type Value = Fixed<SCALE>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a decimal amount with at most {SCALE} places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let whole = i64::try_from(v).map_err(|_| E::custom(ParseAmountError::Overflow))?;
        whole
            .checked_mul(Fixed::<SCALE>::FACTOR)
            .map(Fixed)
            .ok_or_else(|| E::custom(ParseAmountError::Overflow))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(Fixed::<SCALE>::FACTOR)
            .map(Fixed)
            .ok_or_else(|| E::custom(ParseAmountError::Overflow))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(ParseAmountError::Overflow));
        }
        // f64's Display never uses exponent notation.
        self.visit_str(&v.to_string())
    }
}
