//! Repository for the `equipment` table.
//!
//! The `available` flag is the coarse mutual-exclusion lock contended by
//! concurrent booking attempts. It only ever changes through [`try_lock`]
//! and [`release`], both single atomic conditional updates, so two racing
//! creates can never both observe it as free.
//!
//! [`try_lock`]: EquipmentRepo::try_lock
//! [`release`]: EquipmentRepo::release

use sqlx::{PgPool, Postgres, Transaction};

use agrirent_core::types::DbId;

use crate::models::equipment::{CreateEquipment, Equipment, EquipmentFilter, UpdateEquipment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, category, description, daily_rate_paise, \
    available, location, latitude, longitude, created_at, updated_at";

/// Provides CRUD and lock/release operations for equipment listings.
pub struct EquipmentRepo;

impl EquipmentRepo {
    /// Insert a new listing, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEquipment) -> Result<Equipment, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment
                (owner_id, name, category, description, daily_rate_paise,
                 location, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.daily_rate_paise.value())
            .bind(&input.location)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a listing by ID inside a transaction, taking a row lock so the
    /// availability check and the flag update serialize against concurrent
    /// booking attempts.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List listings matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &EquipmentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Equipment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment
             WHERE ($1::TEXT IS NULL OR category = $1)
               AND (NOT $2 OR available)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(&filter.category)
            .bind(filter.only_available)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a listing. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEquipment,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                daily_rate_paise = COALESCE($5, daily_rate_paise),
                location = COALESCE($6, location),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.daily_rate_paise.map(|p| p.value()))
            .bind(&input.location)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(pool)
            .await
    }

    /// Delete a listing by ID. Bookings and receipts cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically flip `available` from true to false.
    ///
    /// Returns `false` when zero rows were affected, i.e. another booking
    /// already holds the lock (or the listing does not exist). Runs inside
    /// the booking-creation transaction so a rollback restores the flag.
    pub async fn try_lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE equipment SET available = FALSE WHERE id = $1 AND available")
                .bind(id)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore `available = true`. Returns `true` if a row changed.
    ///
    /// Used by the payment-failure rollback path and the reconciliation
    /// task; idempotent on already-released listings.
    pub async fn release(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE equipment SET available = TRUE WHERE id = $1 AND NOT available")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
