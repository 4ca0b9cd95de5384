//! Booking status state machine.
//!
//! The lifecycle is `pending -> awaiting_payment -> {paid | payment_failed}`.
//! A booking whose payment session could not even be created goes straight
//! from `pending` to `payment_failed`. Both terminal states admit no
//! further transitions; a renter whose payment failed creates a new
//! booking.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created and holding the slot, payment session not yet requested.
    Pending,
    /// Payment session issued, waiting for confirmation or failure.
    AwaitingPayment,
    /// Payment confirmed. Terminal.
    Paid,
    /// Payment session creation or collection failed. Terminal.
    PaymentFailed,
}

impl BookingStatus {
    /// Whether a booking in this status blocks the equipment's calendar.
    ///
    /// `payment_failed` bookings release their slot; everything else,
    /// including `paid`, holds it.
    pub fn holds_slot(self) -> bool {
        matches!(self, Self::Pending | Self::AwaitingPayment | Self::Paid)
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::PaymentFailed)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::AwaitingPayment)
                | (Self::Pending, Self::PaymentFailed)
                | (Self::AwaitingPayment, Self::Paid)
                | (Self::AwaitingPayment, Self::PaymentFailed)
        )
    }

    /// Validate a transition, returning [`CoreError::InvalidTransition`]
    /// when `self -> next` is not legal.
    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Database representation. Matches the `status` CHECK constraint on
    /// the `bookings` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AwaitingPayment => "awaiting_payment",
            Self::Paid => "paid",
            Self::PaymentFailed => "payment_failed",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "awaiting_payment" => Ok(Self::AwaitingPayment),
            "paid" => Ok(Self::Paid),
            "payment_failed" => Ok(Self::PaymentFailed),
            other => Err(CoreError::Validation(format!(
                "unknown booking status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use BookingStatus::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        assert!(Pending.can_transition_to(AwaitingPayment));
        assert!(AwaitingPayment.can_transition_to(Paid));
        assert!(AwaitingPayment.can_transition_to(PaymentFailed));
        assert!(Pending.can_transition_to(PaymentFailed));
    }

    #[test]
    fn terminal_states_admit_no_transitions() {
        for next in [Pending, AwaitingPayment, Paid, PaymentFailed] {
            assert!(!Paid.can_transition_to(next));
            assert!(!PaymentFailed.can_transition_to(next));
        }
        assert!(Paid.is_terminal());
        assert!(PaymentFailed.is_terminal());
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        assert_matches!(
            Pending.transition_to(Paid),
            Err(CoreError::InvalidTransition { .. })
        );
        assert_matches!(
            AwaitingPayment.transition_to(Pending),
            Err(CoreError::InvalidTransition { .. })
        );
    }

    #[test]
    fn failed_bookings_release_the_slot() {
        assert!(Pending.holds_slot());
        assert!(AwaitingPayment.holds_slot());
        assert!(Paid.holds_slot());
        assert!(!PaymentFailed.holds_slot());
    }

    #[test]
    fn round_trips_through_database_representation() {
        for status in [Pending, AwaitingPayment, Paid, PaymentFailed] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert_matches!(
            "confirmed".parse::<BookingStatus>(),
            Err(CoreError::Validation(_))
        );
    }
}
