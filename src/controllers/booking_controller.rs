use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{
    BookingFilters, BookingListResponse, BookingResponse, CreateBookingRequest,
    UpdateBookingRequest,
};
use crate::dto::ApiResponse;
use crate::models::booking::{BookingRecord, BookingStatus};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::booking_validator;
use crate::services::deposit::{calculate_deposit, DAILY_RATE};
use crate::services::payments::{process_deposit_payment, PaymentResult};
use crate::utils::errors::{not_found_error, AppError};

pub struct BookingController {
    bookings: BookingRepository,
    vehicles: VehicleRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Flujo de creación: sanidad de fechas → solapamiento → depósito
    /// derivado → insert en pending.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        // Cualquier usuario puede reservar cualquier vehículo existente
        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle.to_string()))?;

        booking_validator::validate(
            &self.bookings,
            vehicle.id,
            request.start_date,
            request.end_date,
            None,
        )
        .await?;

        let deposit = calculate_deposit(request.start_date, request.end_date, DAILY_RATE);

        let booking = self
            .bookings
            .create(
                user_id,
                vehicle.id,
                request.start_date,
                request.end_date,
                deposit,
            )
            .await?;

        log::info!(
            "Booking {} created for vehicle {} ({} to {})",
            booking.id,
            vehicle.id,
            booking.start_date,
            booking.end_date
        );

        Ok(BookingResponse::from_parts(booking, &vehicle))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filters: BookingFilters,
    ) -> Result<BookingListResponse, AppError> {
        let records = self
            .bookings
            .list_for_user(user_id, filters.from, filters.to, filters.status)
            .await?;

        let results: Vec<BookingResponse> =
            records.into_iter().map(BookingResponse::from).collect();

        Ok(BookingListResponse {
            count: results.len(),
            results,
        })
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<BookingResponse, AppError> {
        let record = self.find_owned(id, user_id).await?;
        Ok(record.into())
    }

    /// Actualizar las fechas de una reserva propia. La propia reserva se
    /// excluye del escaneo de conflictos; el depósito no se recalcula.
    pub async fn update_dates(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let record = self.find_owned(id, user_id).await?;

        booking_validator::validate(
            &self.bookings,
            record.vehicle_id,
            request.start_date,
            request.end_date,
            Some(id),
        )
        .await?;

        let booking = self
            .bookings
            .update_dates(id, request.start_date, request.end_date)
            .await?;

        Ok(BookingResponse {
            start_date: booking.start_date,
            end_date: booking.end_date,
            updated_at: booking.updated_at,
            ..BookingResponse::from(record)
        })
    }

    /// Cancelar una reserva propia: libera su rango de fechas de forma
    /// permanente. Solo las reservas activas se pueden cancelar.
    pub async fn cancel(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let record = self.find_owned(id, user_id).await?;

        if !record.status.is_active() {
            return Err(AppError::BadRequest(
                "Only pending or confirmed bookings can be cancelled".to_string(),
            ));
        }

        let booking = self.bookings.set_status(id, BookingStatus::Cancelled).await?;

        log::info!("Booking {} cancelled", booking.id);

        let response = BookingResponse {
            status: booking.status,
            updated_at: booking.updated_at,
            ..BookingResponse::from(record)
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Booking cancelled successfully".to_string(),
        ))
    }

    /// Cobrar el depósito vía el procesador mock y marcarlo pagado
    pub async fn pay_deposit(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(PaymentResult, BookingResponse), AppError> {
        let record = self.find_owned(id, user_id).await?;

        if record.deposit_paid {
            return Err(AppError::BadRequest("Deposit already paid".to_string()));
        }

        let result = process_deposit_payment(
            record.id,
            record.user_id,
            record.vehicle_id,
            record.deposit_amount,
        );

        if !result.success {
            return Err(AppError::BadRequest(result.message));
        }

        let booking = self.bookings.mark_deposit_paid(id).await?;

        let response = BookingResponse {
            deposit_paid: booking.deposit_paid,
            updated_at: booking.updated_at,
            ..BookingResponse::from(record)
        };

        Ok((result, response))
    }

    /// Cargar una reserva del usuario. Las reservas ajenas responden 404.
    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<BookingRecord, AppError> {
        self.bookings
            .find_by_id_for_user(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))
    }
}
