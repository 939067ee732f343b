use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tatra_core::{Booking, BookingStats};
use tatra_shared::Masked;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

impl BookingResponse {
    fn ok(booking: Booking) -> Json<Self> {
        Json(Self {
            success: true,
            booking,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/stats", get(booking_stats))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /bookings
async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    let Json(payload) = payload?;

    // 1. Shape checks on whatever fields the form sent
    let fields = state
        .validator
        .validate_new(payload, Utc::now().date_naive())?;

    // 2. Persist
    let booking = state
        .store
        .append(fields)
        .await
        .map_err(|e| AppError::store(e, "Failed to save booking"))?;

    info!(
        "Booking created: {} tour={} email={}",
        booking.id,
        booking.detail_str("tour").unwrap_or("-"),
        Masked(booking.detail_str("email").unwrap_or("-"))
    );

    Ok(BookingResponse::ok(booking))
}

/// GET /bookings
///
/// Never fails: an unreadable document lists as empty.
async fn list_bookings(State(state): State<AppState>) -> Json<Vec<Booking>> {
    Json(state.store.list_all().await)
}

/// GET /bookings/stats
async fn booking_stats(State(state): State<AppState>) -> Json<BookingStats> {
    let bookings = state.store.list_all().await;
    Json(BookingStats::collect(&bookings, Utc::now()))
}

/// GET /bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .store
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::store(e, "Failed to read booking"))?;

    Ok(BookingResponse::ok(booking))
}

/// PUT /bookings/{id}
async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    let Json(payload) = payload?;
    let patch = state.validator.validate_patch(payload)?;

    let booking = state
        .store
        .update_by_id(&id, patch)
        .await
        .map_err(|e| AppError::store(e, "Failed to update booking"))?;

    info!("Booking {} updated, status={}", booking.id, booking.status);

    Ok(BookingResponse::ok(booking))
}

/// DELETE /bookings/{id}
async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state
        .store
        .delete_by_id(&id)
        .await
        .map_err(|e| AppError::store(e, "Failed to delete booking"))?;

    info!("Booking {} deleted", id);

    Ok(Json(DeleteResponse { success: true }))
}
