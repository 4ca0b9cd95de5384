//! Handlers for the `/equipment` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use agrirent_core::dates::DateRange;
use agrirent_core::error::CoreError;
use agrirent_core::money::Paise;
use agrirent_core::types::{DbId, RentalDate};
use agrirent_db::models::equipment::{
    CreateEquipment, Equipment, EquipmentFilter, UpdateEquipment,
};
use agrirent_db::repositories::{BookingRepo, EquipmentRepo};

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a listing.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEquipmentRequest {
    pub owner_id: DbId,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub category: String,
    pub description: Option<String>,
    /// Daily rate in paise; must be positive.
    #[validate(range(min = 1))]
    pub daily_rate_paise: i64,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Query parameters for listing equipment.
///
/// Kept flat (no `serde(flatten)`) because axum's `Query` extractor
/// deserializes numbers from strings, which flattened structs reject.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub category: Option<String>,
    #[serde(default)]
    pub only_available: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    fn filter(&self) -> EquipmentFilter {
        EquipmentFilter {
            category: self.category.clone(),
            only_available: self.only_available,
        }
    }

    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// POST /api/v1/equipment
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateEquipmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Equipment>>)> {
    input.validate()?;
    let equipment = EquipmentRepo::create(
        &state.pool,
        &CreateEquipment {
            owner_id: input.owner_id,
            name: input.name,
            category: input.category,
            description: input.description,
            daily_rate_paise: Paise::new(input.daily_rate_paise)?,
            location: input.location,
            latitude: input.latitude,
            longitude: input.longitude,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: equipment })))
}

/// GET /api/v1/equipment
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Equipment>>>> {
    let pagination = params.pagination();
    let items = EquipmentRepo::list(
        &state.pool,
        &params.filter(),
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/equipment/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Equipment>>> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;
    Ok(Json(DataResponse { data: equipment }))
}

/// PUT /api/v1/equipment/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEquipment>,
) -> AppResult<Json<DataResponse<Equipment>>> {
    if let Some(rate) = input.daily_rate_paise {
        if rate.value() == 0 {
            return Err(AppError::BadRequest(
                "daily_rate_paise must be positive".into(),
            ));
        }
    }
    let equipment = EquipmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;
    Ok(Json(DataResponse { data: equipment }))
}

/// DELETE /api/v1/equipment/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = EquipmentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Query parameters for the availability check. Omitted dates default to
/// today (a one-day range).
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub start_date: Option<RentalDate>,
    pub end_date: Option<RentalDate>,
}

/// Availability answer, echoing the resolved range that was checked.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
}

/// GET /api/v1/equipment/{id}/availability
///
/// Read-only: reports whether a booking for the range would be accepted,
/// i.e. the listing flag is up and no slot-holding booking overlaps.
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<DataResponse<AvailabilityResponse>>> {
    let today = Utc::now().date_naive();
    let start = params.start_date.unwrap_or(today);
    let end = params.end_date.unwrap_or(start);
    let range = DateRange::new(start, end)?;

    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;

    let conflicts = BookingRepo::find_conflicts(&state.pool, id, &range).await?;
    let available = equipment.available && conflicts.is_empty();

    Ok(Json(DataResponse {
        data: AvailabilityResponse {
            available,
            start_date: range.start,
            end_date: range.end,
        },
    }))
}
