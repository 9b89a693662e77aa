use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::layouts::{layout_rejection, GridResponse};
use crate::error::StoreError;
use crate::models::{PersistedLayout, Room, RoomConfig};
use crate::services::booking::{bookable_seats, Pricing};
use crate::services::reconcile;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room).put(update_room).delete(delete_room))
        .route("/rooms/{id}/layout", get(get_layout).put(save_layout))
        .route("/rooms/{id}/grid", get(get_grid))
        .route("/rooms/{id}/booking-seats", get(get_booking_seats))
}

/* ---------- helpers ---------- */

type ApiError = (StatusCode, String);

fn room_not_found(id: Uuid) -> ApiError {
    (StatusCode::NOT_FOUND, format!("Room {} not found", id))
}

fn storage_failure(context: &str, e: StoreError) -> ApiError {
    tracing::error!("{} storage error: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Room storage is unavailable".to_string())
}

fn validation_failure(e: validator::ValidationErrors) -> ApiError {
    (StatusCode::BAD_REQUEST, format!("Invalid room: {}", e))
}

/// Validate and normalize an incoming config so that stored couples always pair up.
fn prepare_config(mut config: RoomConfig) -> Result<RoomConfig, ApiError> {
    config.validate().map_err(validation_failure)?;
    config.seat_layout = reconcile::normalize(&config.seat_layout).map_err(layout_rejection)?;
    Ok(config)
}

async fn find_room(state: &AppState, id: Uuid) -> Result<Room, ApiError> {
    state
        .store
        .get(id)
        .await
        .map_err(|e| storage_failure("find_room", e))?
        .ok_or_else(|| room_not_found(id))
}

/// Layout from cache if possible, otherwise from the store (and then cached).
async fn load_layout(state: &AppState, id: Uuid) -> Result<(PersistedLayout, bool), ApiError> {
    if let Some(cache) = &state.cache {
        if let Some(layout) = cache.get_cached_layout(id).await {
            return Ok((layout, true));
        }
    }

    let room = find_room(state, id).await?;
    if let Some(cache) = &state.cache {
        cache.cache_layout(id, &room.seat_layout).await;
    }
    Ok((room.seat_layout, false))
}

async fn invalidate(state: &AppState, id: Uuid) {
    if let Some(cache) = &state.cache {
        cache.invalidate_layout(id).await;
    }
}

/* ---------- ROOMS ---------- */

// GET /api/rooms
#[derive(Debug, Deserialize)]
struct RoomsQuery {
    #[serde(rename = "cinemaId")]
    cinema_id: Option<String>,
}

async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RoomsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = state
        .store
        .list(params.cinema_id.as_deref())
        .await
        .map_err(|e| storage_failure("list_rooms", e))?;

    Ok((StatusCode::OK, Json(rooms)))
}

// POST /api/rooms
async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RoomConfig>,
) -> Result<impl IntoResponse, ApiError> {
    let config = prepare_config(req)?;
    let room = state
        .store
        .create(Room::from_config(config))
        .await
        .map_err(|e| storage_failure("create_room", e))?;

    tracing::info!(room_id = %room.id, cinema_id = %room.cinema_id, "room created");
    Ok((StatusCode::CREATED, Json(room)))
}

// GET /api/rooms/{id}
async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let room = find_room(&state, id).await?;
    Ok((StatusCode::OK, Json(room)))
}

// PUT /api/rooms/{id}
async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RoomConfig>,
) -> Result<impl IntoResponse, ApiError> {
    let config = prepare_config(req)?;
    let room = state
        .store
        .update(id, config)
        .await
        .map_err(|e| storage_failure("update_room", e))?
        .ok_or_else(|| room_not_found(id))?;

    invalidate(&state, id).await;
    Ok((StatusCode::OK, Json(room)))
}

// DELETE /api/rooms/{id}
async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|e| storage_failure("delete_room", e))?;

    if !deleted {
        return Err(room_not_found(id));
    }
    invalidate(&state, id).await;
    Ok(StatusCode::NO_CONTENT)
}

/* ---------- LAYOUT ---------- */

// GET /api/rooms/{id}/layout
async fn get_layout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (layout, hit) = load_layout(&state, id).await?;
    let cache_header = if hit { "HIT" } else { "MISS" };
    Ok((StatusCode::OK, [("X-Cache", cache_header)], Json(layout)))
}

// PUT /api/rooms/{id}/layout
async fn save_layout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<PersistedLayout>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(validation_failure)?;
    let layout = reconcile::normalize(&req).map_err(layout_rejection)?;

    let room = state
        .store
        .update_layout(id, layout)
        .await
        .map_err(|e| storage_failure("save_layout", e))?
        .ok_or_else(|| room_not_found(id))?;

    invalidate(&state, id).await;
    Ok((StatusCode::OK, Json(room)))
}

// GET /api/rooms/{id}/grid
async fn get_grid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (layout, _) = load_layout(&state, id).await?;
    let grid = reconcile::from_persisted(&layout).map_err(layout_rejection)?;
    Ok((StatusCode::OK, Json(GridResponse::from_layout(&grid))))
}

// GET /api/rooms/{id}/booking-seats?basePrice=
#[derive(Debug, Deserialize)]
struct BookingSeatsQuery {
    #[serde(rename = "basePrice", default)]
    base_price: f64,
}

async fn get_booking_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<BookingSeatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !(params.base_price >= 0.0) {
        return Err((StatusCode::BAD_REQUEST, "basePrice must be >= 0".to_string()));
    }

    let room = find_room(&state, id).await?;
    let grid = reconcile::from_persisted(&room.seat_layout).map_err(layout_rejection)?;
    let seats = bookable_seats(&grid, &Pricing::for_room(&room, params.base_price));
    Ok((StatusCode::OK, Json(seats)))
}
