//! Repository for the `receipts` table.

use sqlx::PgPool;

use agrirent_core::types::DbId;

use crate::models::receipt::{CreateReceipt, Receipt};

const COLUMNS: &str = "id, booking_id, renter_id, amount_paise, status, equipment_name, \
    start_date, end_date, payment_method, generated_at";

/// Provides persistence operations for receipts.
pub struct ReceiptRepo;

impl ReceiptRepo {
    /// Generate a receipt for a paid booking, idempotently.
    ///
    /// The `uq_receipts_booking_id` constraint plus `ON CONFLICT DO
    /// NOTHING` means a second call for the same booking returns the
    /// receipt created by the first call, with the same ID and amount.
    pub async fn create(pool: &PgPool, input: &CreateReceipt) -> Result<Receipt, sqlx::Error> {
        let insert = format!(
            "INSERT INTO receipts
                (booking_id, renter_id, amount_paise, status, equipment_name,
                 start_date, end_date, payment_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (booking_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Receipt>(&insert)
            .bind(input.booking_id)
            .bind(input.renter_id)
            .bind(input.amount_paise.value())
            .bind(&input.status)
            .bind(&input.equipment_name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.payment_method)
            .fetch_optional(pool)
            .await?;

        match created {
            Some(receipt) => Ok(receipt),
            // Conflict: a receipt for this booking already exists.
            None => {
                let query = format!("SELECT {COLUMNS} FROM receipts WHERE booking_id = $1");
                sqlx::query_as::<_, Receipt>(&query)
                    .bind(input.booking_id)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Find the receipt for a booking, if one has been generated.
    pub async fn find_by_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<Receipt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM receipts WHERE booking_id = $1");
        sqlx::query_as::<_, Receipt>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// List a renter's receipts, newest first.
    pub async fn list_by_renter(
        pool: &PgPool,
        renter_id: DbId,
    ) -> Result<Vec<Receipt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM receipts
             WHERE renter_id = $1
             ORDER BY generated_at DESC"
        );
        sqlx::query_as::<_, Receipt>(&query)
            .bind(renter_id)
            .fetch_all(pool)
            .await
    }
}
