//! Repository for the `bookings` table.
//!
//! Status transitions are conditional updates keyed on the current status
//! (`WHERE status = ...`), so an out-of-order or duplicate transition
//! affects zero rows instead of silently clobbering state. The lifecycle
//! layer decides what zero rows means in each case.

use sqlx::{PgPool, Postgres, Transaction};

use agrirent_core::dates::DateRange;
use agrirent_core::types::{DbId, Timestamp};

use crate::models::booking::{Booking, CreateBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, equipment_id, renter_id, start_date, end_date, total_paise, \
    status, gateway_order_id, gateway_payment_id, created_at, updated_at";

/// Statuses that hold the equipment's slot. Matches
/// `BookingStatus::holds_slot` in `agrirent-core`.
const SLOT_HOLDING: &str = "('pending', 'awaiting_payment', 'paid')";

/// Provides persistence operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in `pending` status, returning the created row.
    ///
    /// Runs inside the booking-creation transaction alongside the
    /// availability check and the equipment lock.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateBooking,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings
                (equipment_id, renter_id, start_date, end_date, total_paise, status)
             VALUES ($1, $2, $3, $4, $5, 'pending')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.equipment_id)
            .bind(input.renter_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.total_paise.value())
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a booking by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a booking by the gateway's order ID (webhook lookups).
    pub async fn find_by_order_id(
        pool: &PgPool,
        order_id: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE gateway_order_id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(order_id)
            .fetch_optional(pool)
            .await
    }

    /// List a renter's bookings, newest first.
    pub async fn list_by_renter(
        pool: &PgPool,
        renter_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE renter_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(renter_id)
            .fetch_all(pool)
            .await
    }

    /// Slot-holding bookings on `equipment_id` whose inclusive date range
    /// intersects `range`. Read-only; used by the availability endpoint.
    pub async fn find_conflicts(
        pool: &PgPool,
        equipment_id: DbId,
        range: &DateRange,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE equipment_id = $1
               AND status IN {SLOT_HOLDING}
               AND start_date <= $3
               AND end_date >= $2"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(equipment_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await
    }

    /// Transactional variant of [`find_conflicts`], used during booking
    /// creation so the check and the insert see the same snapshot.
    ///
    /// [`find_conflicts`]: BookingRepo::find_conflicts
    pub async fn find_conflicts_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: DbId,
        range: &DateRange,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE equipment_id = $1
               AND status IN {SLOT_HOLDING}
               AND start_date <= $3
               AND end_date >= $2"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(equipment_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&mut **tx)
            .await
    }

    /// Transition `pending -> awaiting_payment`, storing the gateway's
    /// order ID. Returns `None` if the booking is not `pending`.
    pub async fn mark_awaiting_payment(
        pool: &PgPool,
        id: DbId,
        order_id: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings
             SET status = 'awaiting_payment', gateway_order_id = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(order_id)
            .fetch_optional(pool)
            .await
    }

    /// Transition `awaiting_payment -> paid`, storing the gateway's
    /// payment ID. Returns `None` if the booking is not `awaiting_payment`
    /// (e.g. a concurrent confirm already won).
    pub async fn mark_paid(
        pool: &PgPool,
        id: DbId,
        payment_id: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings
             SET status = 'paid', gateway_payment_id = $2
             WHERE id = $1 AND status = 'awaiting_payment'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(payment_id)
            .fetch_optional(pool)
            .await
    }

    /// Transition a non-terminal booking to `payment_failed`.
    ///
    /// Returns `None` if the booking was already terminal, which makes
    /// repeated failure webhooks a no-op.
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings
             SET status = 'payment_failed'
             WHERE id = $1 AND status IN ('pending', 'awaiting_payment')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bookings stuck in a non-terminal status since before `cutoff`.
    /// Feed for the payment reconciliation task.
    pub async fn find_stale(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE status IN ('pending', 'awaiting_payment')
               AND updated_at < $1
             ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }
}
