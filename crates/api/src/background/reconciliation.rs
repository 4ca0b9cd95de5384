//! Periodic reconciliation of stale unpaid bookings.
//!
//! A booking whose payment session never resolves would otherwise hold
//! its equipment forever. This task sweeps bookings stuck in `pending`
//! or `awaiting_payment` past the timeout window, fails them through the
//! normal lifecycle path, and releases their equipment. Runs on a fixed
//! interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use agrirent_db::repositories::BookingRepo;

use crate::lifecycle;

/// Default window before an unpaid booking is considered abandoned.
const DEFAULT_PAYMENT_TIMEOUT_MINS: i64 = 30;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300); // 5 minutes

/// Run the payment reconciliation loop.
///
/// Fails bookings older than `PAYMENT_TIMEOUT_MINS` (defaults to 30).
/// Runs until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let timeout_mins: i64 = std::env::var("PAYMENT_TIMEOUT_MINS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PAYMENT_TIMEOUT_MINS);

    tracing::info!(
        timeout_mins,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Payment reconciliation job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Payment reconciliation job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::minutes(timeout_mins);
                match sweep(&pool, cutoff).await {
                    Ok(0) => {
                        tracing::debug!("Payment reconciliation: nothing to expire");
                    }
                    Ok(expired) => {
                        tracing::info!(expired, "Payment reconciliation: expired stale bookings");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Payment reconciliation sweep failed");
                    }
                }
            }
        }
    }
}

/// Expire all bookings stuck in a non-terminal status since before
/// `cutoff`. Returns how many were transitioned.
///
/// Uses the lifecycle's conditional failure transition, so a booking that
/// gets confirmed between the query and the sweep is left alone.
pub async fn sweep(
    pool: &PgPool,
    cutoff: chrono::DateTime<chrono::Utc>,
) -> Result<usize, sqlx::Error> {
    let stale = BookingRepo::find_stale(pool, cutoff).await?;
    let mut expired = 0;

    for booking in stale {
        match lifecycle::fail_payment(pool, &booking).await {
            Ok(true) => {
                expired += 1;
                tracing::info!(
                    booking_id = booking.id,
                    equipment_id = booking.equipment_id,
                    status = %booking.status,
                    "Expired stale booking"
                );
            }
            // Confirmed or failed between the query and the sweep.
            Ok(false) => {
                tracing::debug!(booking_id = booking.id, "Booking went terminal before sweep");
            }
            Err(e) => {
                tracing::error!(
                    booking_id = booking.id,
                    equipment_id = booking.equipment_id,
                    error = %e,
                    "Failed to expire stale booking"
                );
            }
        }
    }

    Ok(expired)
}
