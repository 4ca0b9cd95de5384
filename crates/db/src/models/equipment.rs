//! Equipment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use agrirent_core::money::Paise;
use agrirent_core::types::{DbId, Timestamp};

/// A row from the `equipment` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    #[sqlx(try_from = "i64")]
    pub daily_rate_paise: Paise,
    /// False while any booking for this equipment holds its slot.
    pub available: bool,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new equipment listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipment {
    pub owner_id: DbId,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub daily_rate_paise: Paise,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// DTO for updating a listing. Only non-`None` fields are applied.
///
/// The `available` flag is deliberately absent: it is owned by the
/// booking lifecycle and only changes through the atomic lock/release
/// operations on [`crate::repositories::EquipmentRepo`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateEquipment {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub daily_rate_paise: Option<Paise>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Query filter for listing equipment.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EquipmentFilter {
    pub category: Option<String>,
    /// When true, only listings with `available = true` are returned.
    #[serde(default)]
    pub only_available: bool,
}
