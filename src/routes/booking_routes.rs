use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingFilters, BookingListResponse, BookingResponse, CreateBookingRequest,
    UpdateBookingRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
        .route("/:id", put(update_booking))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/pay-deposit", post(pay_deposit))
}

async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<BookingListResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list(user.user_id, filters).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(response))
}

async fn update_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.update_dates(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.cancel(id, user.user_id).await?;
    Ok(Json(response))
}

async fn pay_deposit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let (payment, booking) = controller.pay_deposit(id, user.user_id).await?;
    Ok(Json(json!({
        "payment": payment,
        "booking": booking,
    })))
}
