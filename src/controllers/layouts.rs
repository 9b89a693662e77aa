//! layouts.rs
//!
//! Редактирование схемы без состояния на сервере: клиент присылает текущую
//! схему и одну правку, получает новую схему или отказ 422.

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::LayoutError;
use crate::models::layout::{SeatLayout, SeatStats};
use crate::models::{FlatSeat, PersistedLayout};
use crate::services::editor::{self, EditCommand};
use crate::services::reconcile;
use crate::services::transfer::{self, LayoutDocument};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/layouts/apply", post(apply_edit))
        .route("/layouts/reconstruct", post(reconstruct_layout))
        .route("/layouts/flatten", post(flatten_layout))
}

/// Схема в форме для отрисовки плюс статистика по местам.
#[derive(Debug, Serialize)]
pub struct GridResponse {
    #[serde(flatten)]
    pub layout: LayoutDocument,
    pub stats: SeatStats,
}

impl GridResponse {
    pub fn from_layout(layout: &SeatLayout) -> Self {
        Self {
            layout: transfer::export(layout),
            stats: layout.stats(),
        }
    }
}

pub(crate) fn layout_rejection(err: LayoutError) -> (StatusCode, String) {
    tracing::debug!("layout rejected: {}", err);
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

// POST /api/layouts/apply
#[derive(Debug, Deserialize)]
struct ApplyRequest {
    layout: LayoutDocument,
    command: EditCommand,
}

async fn apply_edit(Json(req): Json<ApplyRequest>) -> Result<impl IntoResponse, (StatusCode, String)> {
    let current = transfer::from_document(&req.layout).map_err(layout_rejection)?;
    let next = editor::apply(&current, &req.command).map_err(layout_rejection)?;
    Ok((StatusCode::OK, Json(GridResponse::from_layout(&next))))
}

// POST /api/layouts/reconstruct
#[derive(Debug, Deserialize)]
struct ReconstructRequest {
    rows: Option<usize>,
    cols: Option<usize>,
    seats: Vec<FlatSeat>,
}

async fn reconstruct_layout(
    Json(req): Json<ReconstructRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // без размеров схема подгоняется под самое дальнее место
    let layout = reconcile::reconstruct_sized(req.rows.unwrap_or(1), req.cols.unwrap_or(1), &req.seats)
        .map_err(layout_rejection)?;
    Ok((StatusCode::OK, Json(GridResponse::from_layout(&layout))))
}

// POST /api/layouts/flatten
async fn flatten_layout(
    Json(document): Json<LayoutDocument>,
) -> Result<Json<PersistedLayout>, (StatusCode, String)> {
    let layout = transfer::from_document(&document).map_err(layout_rejection)?;
    Ok(Json(reconcile::to_persisted(&layout)))
}
