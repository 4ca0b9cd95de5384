//! Monetary amounts as integer paise (minor currency unit).
//!
//! Every persisted amount in the system is a [`Paise`] value. The payment
//! gateway already speaks minor units, so the only conversion anywhere is
//! the rupee formatting helper for human-readable display. Keeping the
//! unit in the type prevents the major/minor-unit drift that plagues
//! duck-typed amounts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Paise per rupee (100).
pub const PAISE_PER_RUPEE: i64 = 100;

/// A non-negative amount of money in paise.
///
/// Serializes as a bare integer so API payloads and database rows carry
/// plain numbers; deserialization goes through [`Paise::new`] so negative
/// amounts are rejected at the boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Paise(i64);

impl Paise {
    /// Wrap a raw paise amount. Negative amounts are rejected.
    pub fn new(value: i64) -> Result<Self, CoreError> {
        if value < 0 {
            return Err(CoreError::Validation(format!(
                "amount must not be negative, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// The raw integer paise value.
    pub fn value(self) -> i64 {
        self.0
    }

    /// Multiply a per-day rate by a day count, rejecting overflow.
    pub fn checked_mul_days(self, days: i64) -> Result<Self, CoreError> {
        if days <= 0 {
            return Err(CoreError::Validation(format!(
                "day count must be positive, got {days}"
            )));
        }
        self.0
            .checked_mul(days)
            .map(Self)
            .ok_or_else(|| CoreError::Validation("total price overflows".to_string()))
    }

    /// Format as rupees for human-readable display, e.g. `₹1,234.50`
    /// without the thousands separator: `₹1234.50`.
    pub fn display_rupees(self) -> String {
        let rupees = self.0 / PAISE_PER_RUPEE;
        let paise = self.0 % PAISE_PER_RUPEE;
        format!("₹{rupees}.{paise:02}")
    }
}

impl TryFrom<i64> for Paise {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Paise> for i64 {
    fn from(amount: Paise) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Paise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rejects_negative_amounts() {
        assert_matches!(Paise::new(-1), Err(CoreError::Validation(_)));
        assert!(Paise::new(0).is_ok());
    }

    #[test]
    fn multiplies_rate_by_day_count() {
        let rate = Paise::new(100_000).unwrap(); // ₹1000/day
        let total = rate.checked_mul_days(3).unwrap();
        assert_eq!(total.value(), 300_000);
    }

    #[test]
    fn rejects_zero_and_negative_day_counts() {
        let rate = Paise::new(100).unwrap();
        assert_matches!(rate.checked_mul_days(0), Err(CoreError::Validation(_)));
        assert_matches!(rate.checked_mul_days(-2), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_overflowing_totals() {
        let rate = Paise::new(i64::MAX / 2).unwrap();
        assert_matches!(rate.checked_mul_days(3), Err(CoreError::Validation(_)));
    }

    #[test]
    fn formats_rupees_with_two_paise_digits() {
        assert_eq!(Paise::new(300_000).unwrap().display_rupees(), "₹3000.00");
        assert_eq!(Paise::new(150).unwrap().display_rupees(), "₹1.50");
        assert_eq!(Paise::new(5).unwrap().display_rupees(), "₹0.05");
    }

    #[test]
    fn serde_is_a_bare_integer() {
        let amount = Paise::new(250).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "250");
        let back: Paise = serde_json::from_str("250").unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Paise>("-1").is_err());
    }
}
