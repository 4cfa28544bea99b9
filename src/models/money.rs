//! Fixed-point money type
//!
//! Amounts are stored as integer minor units (cents) so that carry-over
//! accumulated across many months never drifts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in minor units (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create an amount from minor units
    ///
    /// # Examples
    /// ```
    /// use envelope_ledger::models::Money;
    /// let amount = Money::from_cents(35050); // 350.50
    /// assert_eq!(amount.to_string(), "350.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Minor part (0-99), always non-negative
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamp negative amounts to zero
    pub fn floor_zero(self) -> Self {
        self.max(Self::zero())
    }

    /// Largest magnitude `parse` accepts, one trillion units
    pub const MAX_PARSED: Money = Money(1_000_000_000_000 * 100);

    /// Parse an amount such as "350", "350.5", "-12.75"
    ///
    /// Magnitudes beyond [`Money::MAX_PARSED`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(trimmed.to_string());
        let out_of_range = || MoneyParseError::OutOfRange(trimmed.to_string());

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        if body.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = whole.parse().map_err(|_| out_of_range())?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(out_of_range)?;
        if cents > Self::MAX_PARSED.0 {
            return Err(out_of_range());
        }

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format followed by a currency code, e.g. "350.00 DH"
    pub fn format_with_currency(&self, currency: &str) -> String {
        if currency.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, currency)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let text = format!("{}{}.{:02}", sign, self.units().abs(), self.cents_part());
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(35050).to_string(), "350.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-5000).to_string(), "-50.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:>8}", Money::from_units(3)), "    3.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("350").unwrap(), Money::from_units(350));
        assert_eq!(Money::parse("350.5").unwrap().cents(), 35050);
        assert_eq!(Money::parse(" 12.75 ").unwrap().cents(), 1275);
        assert_eq!(Money::parse("-0.05").unwrap().cents(), -5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("-").is_err());
        assert!(Money::parse("12.345").is_err());
        assert!(Money::parse("1e3").is_err());
        assert!(Money::parse(".50").is_err());
        assert!(Money::parse("abc").is_err());
    }

    #[test]
    fn test_parse_rejects_huge_amounts() {
        assert_eq!(Money::parse("1000000000000").unwrap(), Money::MAX_PARSED);
        assert_eq!(Money::parse("-1000000000000").unwrap(), -Money::MAX_PARSED);
        assert!(matches!(
            Money::parse("1000000000000.01"),
            Err(MoneyParseError::OutOfRange(_))
        ));
        assert!(matches!(
            Money::parse("92233720368547758"),
            Err(MoneyParseError::OutOfRange(_))
        ));
        assert!(matches!(
            Money::parse("99999999999999999999999"),
            Err(MoneyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_arithmetic_and_floor() {
        let a = Money::from_units(300);
        let b = Money::from_units(350);
        assert_eq!((a - b).cents(), -5000);
        assert_eq!((a - b).floor_zero(), Money::zero());
        assert_eq!((a - b).abs(), Money::from_units(50));
        assert_eq!(-(a), Money::from_units(-300));
    }

    #[test]
    fn test_sum_of_refs() {
        let amounts = [Money::from_cents(10), Money::from_cents(20)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 30);
    }

    #[test]
    fn test_format_with_currency() {
        assert_eq!(Money::from_units(150).format_with_currency("DH"), "150.00 DH");
        assert_eq!(Money::from_units(150).format_with_currency(""), "150.00");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        assert_eq!(json, "1050");
    }
}
