//! User entity model and DTOs.
//!
//! Authentication is handled outside this service, so users carry only
//! the contact fields the marketplace needs for owner/renter references.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use agrirent_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
