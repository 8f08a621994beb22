use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppResult;
use crate::models::Service;
use crate::services::booking::{parse_date_field, BookingForm, SubmittedBooking};
use crate::services::session::{BookingSession, SlotView};
use crate::state::AppState;

// GET /api/services
pub async fn list_services(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Service>>> {
    let services = state.gateway.list_services().await?;
    Ok(Json(services))
}

// GET /api/availability?date=YYYY-MM-DD&service_id=..
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub service_id: Option<String>,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<SlotView>>> {
    let date = parse_date_field(query.date.as_deref())?;
    let gateway = state.gateway.as_ref();

    let session = BookingSession::load(gateway).await?;
    let slots = session
        .slots_for(gateway, date, query.service_id.as_deref())
        .await?;
    Ok(Json(slots))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(form): Json<BookingForm>,
) -> AppResult<(StatusCode, Json<SubmittedBooking>)> {
    let gateway = state.gateway.as_ref();
    let session = BookingSession::load(gateway).await?;

    let submitted = session.submit(gateway, &form).await.map_err(|e| {
        tracing::info!(kind = e.kind(), error = %e, "booking rejected");
        e
    })?;

    Ok((StatusCode::CREATED, Json(submitted)))
}
