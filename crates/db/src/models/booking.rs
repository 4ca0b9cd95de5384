//! Booking entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use agrirent_core::booking::BookingStatus;
use agrirent_core::money::Paise;
use agrirent_core::types::{DbId, RentalDate, Timestamp};

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub equipment_id: DbId,
    pub renter_id: DbId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    #[sqlx(try_from = "i64")]
    pub total_paise: Paise,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new booking. Status always starts at `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub equipment_id: DbId,
    pub renter_id: DbId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    pub total_paise: Paise,
}
