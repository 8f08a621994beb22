use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::{Block, Booking, BookingStatus, Settings};
use crate::services::booking::parse_date_field;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> AppResult<()> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn parse_status(raw: &str) -> AppResult<BookingStatus> {
    BookingStatus::parse(raw.trim())
        .ok_or_else(|| AppError::validation("status", format!("unknown status: {raw}")))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    check_auth(&headers, &state.config.admin_token)?;

    let status_filter = query.status.as_deref().map(parse_status).transpose()?;

    let mut bookings = state.gateway.list_bookings().await?;
    if let Some(status) = status_filter {
        bookings.retain(|b| b.status == status);
    }
    Ok(Json(bookings))
}

// POST /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> AppResult<Json<Booking>> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = parse_status(&body.status)?;
    let booking = state.gateway.update_booking_status(&id, status).await?;
    Ok(Json(booking))
}

// GET /api/admin/blocks
pub async fn get_blocks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<Block>>> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(state.gateway.list_blocks().await?))
}

// POST /api/admin/blocks
#[derive(Deserialize)]
pub struct BlockRequest {
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BlockRequest>,
) -> AppResult<Json<Block>> {
    check_auth(&headers, &state.config.admin_token)?;

    let date = parse_date_field(body.date.as_deref())?;
    let notes = body.notes.as_deref().unwrap_or("").trim();
    let block = state.gateway.create_block(date, notes).await?;
    Ok(Json(block))
}

// GET /api/admin/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Settings>> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(state.gateway.get_settings().await?))
}

// PUT /api/admin/settings
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(settings): Json<Settings>,
) -> AppResult<Json<Settings>> {
    check_auth(&headers, &state.config.admin_token)?;

    settings.validate()?;
    let saved = state.gateway.put_settings(&settings).await?;
    tracing::info!(
        deposit_percent = %saved.deposit_percent,
        deposit_min = %saved.deposit_min,
        hours_open = saved.hours_open,
        hours_close = saved.hours_close,
        "settings updated"
    );
    Ok(Json(saved))
}
