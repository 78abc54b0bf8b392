use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

const CENTS_PER_UNIT: i64 = 100;

/// Relative slack when deciding that a binary float is a whole number of cents.
const CENT_TOLERANCE: f64 = 1e-9;

/// Monetary amount held as integer cents.
///
/// The operator impls saturate at the `i64` bounds. Aggregation goes through
/// [`Money::checked_add`] and [`Money::checked_times`] so that an overflow is
/// reported instead of clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Money(units.saturating_mul(CENTS_PER_UNIT))
    }

    /// Converts a decimal unit price to cents without rounding.
    ///
    /// Returns `None` for negative or non-finite input and for amounts that
    /// are not a whole number of cents (`0.125`). Both backends parse prices
    /// through this function, so a sub-cent price is rejected by each of them
    /// rather than rounded.
    pub fn from_price(units: f64) -> Option<Self> {
        if !units.is_finite() || units < 0.0 {
            return None;
        }
        let scaled = units * CENTS_PER_UNIT as f64;
        let cents = scaled.round();
        if (scaled - cents).abs() > CENT_TOLERANCE * cents.max(1.0) {
            return None;
        }
        if cents >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_units(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    /// Line revenue for `quantity` units at this price, `None` on overflow.
    pub const fn checked_times(self, quantity: i64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    pub const fn checked_add(self, rhs: Money) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Average per order in currency units; zero orders yields `0.0`.
    pub fn per_order(self, orders: u64) -> f64 {
        if orders == 0 {
            return 0.0;
        }
        self.0 as f64 / orders as f64 / CENTS_PER_UNIT as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Renders `$1,234.56`, grouping the integer part by thousands.
    pub fn to_currency_string(self) -> String {
        format_currency(self.as_units())
    }
}

/// Formats a unit amount as `$1,234.56`.
pub fn format_currency(units: f64) -> String {
    let cents = (units * CENTS_PER_UNIT as f64).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / CENTS_PER_UNIT as u64).to_string();
    let frac = abs % CENTS_PER_UNIT as u64;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac:02}")
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_units())
    }
}
