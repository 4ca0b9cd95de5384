//! Receipt entity model and DTOs.
//!
//! A receipt is an immutable record of a completed payment. Its amount is
//! copied verbatim from the booking's total (both integer paise), so the
//! two can never drift apart through unit conversion.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use agrirent_core::money::Paise;
use agrirent_core::types::{DbId, RentalDate, Timestamp};

/// A row from the `receipts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Receipt {
    pub id: DbId,
    pub booking_id: DbId,
    pub renter_id: DbId,
    #[sqlx(try_from = "i64")]
    pub amount_paise: Paise,
    pub status: String,
    /// Equipment name at payment time; survives later listing edits.
    pub equipment_name: String,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    pub payment_method: String,
    pub generated_at: Timestamp,
}

/// DTO for generating a receipt from a paid booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceipt {
    pub booking_id: DbId,
    pub renter_id: DbId,
    pub amount_paise: Paise,
    pub status: String,
    pub equipment_name: String,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    pub payment_method: String,
}
