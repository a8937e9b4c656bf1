use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingRecord, BookingStatus};
use crate::models::vehicle::Vehicle;
use crate::dto::vehicle_dto::VehicleSummary;

// Request para crear una reserva. El depósito y el estado nunca los
// aporta el cliente: siempre los deriva el servidor.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Request para actualizar las fechas de una reserva existente
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Filtros para el listado de reservas:
/// `from` acota start_date por abajo, `to` acota end_date por arriba.
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilters {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
}

// Response de reserva para la API, con el vehículo embebido
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle: VehicleSummary,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub deposit_amount: Decimal,
    pub deposit_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingResponse {
    /// Construir la response a partir de una reserva recién escrita y el
    /// vehículo que ya teníamos cargado en el controller.
    pub fn from_parts(booking: Booking, vehicle: &Vehicle) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            vehicle: VehicleSummary::from(vehicle),
            start_date: booking.start_date,
            end_date: booking.end_date,
            status: booking.status,
            deposit_amount: booking.deposit_amount,
            deposit_paid: booking.deposit_paid,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

impl From<BookingRecord> for BookingResponse {
    fn from(record: BookingRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            vehicle: VehicleSummary {
                id: record.vehicle_id,
                make: record.vehicle_make,
                model: record.vehicle_model,
                year: record.vehicle_year,
                plate: record.vehicle_plate,
            },
            start_date: record.start_date,
            end_date: record.end_date,
            status: record.status,
            deposit_amount: record.deposit_amount,
            deposit_paid: record.deposit_paid,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// Envelope del listado: {count, results}
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub count: usize,
    pub results: Vec<BookingResponse>,
}
