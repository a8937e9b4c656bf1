//! Validador de reservas
//!
//! Predicado de solo lectura sobre el booking store: comprueba la
//! sanidad de las fechas y después el solapamiento con reservas activas
//! del mismo vehículo. Corta en el primer fallo y nunca reintenta.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::repositories::booking_repository::BookingRepository;
use crate::utils::errors::AppError;

/// Motivos de rechazo de una reserva, distinguibles por código
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingRejection {
    #[error("End date must be after start date.")]
    EndBeforeStart,

    #[error("Start date cannot be in the past.")]
    StartDateInPast,

    #[error("This vehicle is already booked for the selected dates.")]
    AlreadyBooked,
}

impl BookingRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::EndBeforeStart => "END_BEFORE_START",
            BookingRejection::StartDateInPast => "START_DATE_IN_PAST",
            BookingRejection::AlreadyBooked => "VEHICLE_ALREADY_BOOKED",
        }
    }
}

/// Chequeos puros de fechas, en orden y con corte al primer fallo.
///
/// Solo start_date se compara contra hoy: una reserva que empieza hoy y
/// termina en el futuro es válida, y end_date ya queda acotada por la
/// primera comprobación.
pub fn validate_booking_dates(
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), BookingRejection> {
    if end_date < start_date {
        return Err(BookingRejection::EndBeforeStart);
    }

    if start_date < today {
        return Err(BookingRejection::StartDateInPast);
    }

    Ok(())
}

/// Test de intersección de intervalos cerrados: compartir un extremo
/// también cuenta como solapamiento. Misma forma que el predicado SQL.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Validación completa de una reserva propuesta contra el store.
///
/// `exclude_booking_id` deja fuera una reserva concreta del chequeo de
/// conflictos: se usa al editar una reserva existente in situ.
pub async fn validate(
    repository: &BookingRepository,
    vehicle_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Result<(), AppError> {
    let today = Utc::now().date_naive();
    validate_booking_dates(start_date, end_date, today)?;

    if repository
        .has_active_overlap(vehicle_id, start_date, end_date, exclude_booking_id)
        .await?
    {
        return Err(BookingRejection::AlreadyBooked.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const TODAY: (i32, u32, u32) = (2026, 8, 25);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn end_before_start_is_rejected_first() {
        // Ambas fechas en el pasado: gana el orden de los chequeos
        let result = validate_booking_dates(date(2026, 8, 10), date(2026, 8, 5), today());
        assert_eq!(result, Err(BookingRejection::EndBeforeStart));
    }

    #[test]
    fn past_start_date_is_rejected() {
        let result = validate_booking_dates(date(2026, 8, 24), date(2026, 8, 30), today());
        assert_eq!(result, Err(BookingRejection::StartDateInPast));
    }

    #[test]
    fn booking_starting_today_is_accepted() {
        assert!(validate_booking_dates(today(), date(2026, 8, 30), today()).is_ok());
    }

    #[test]
    fn single_day_booking_is_accepted() {
        assert!(validate_booking_dates(today(), today(), today()).is_ok());
    }

    #[test]
    fn future_range_is_accepted() {
        assert!(validate_booking_dates(date(2026, 9, 1), date(2026, 9, 10), today()).is_ok());
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(
            date(2026, 9, 1),
            date(2026, 9, 5),
            date(2026, 9, 6),
            date(2026, 9, 10),
        ));
    }

    #[test]
    fn touching_endpoints_count_as_overlap() {
        // Una reserva que termina el día D y otra que empieza el día D
        assert!(ranges_overlap(
            date(2026, 9, 1),
            date(2026, 9, 5),
            date(2026, 9, 5),
            date(2026, 9, 10),
        ));
        assert!(ranges_overlap(
            date(2026, 9, 5),
            date(2026, 9, 10),
            date(2026, 9, 1),
            date(2026, 9, 5),
        ));
    }

    #[test]
    fn contained_range_overlaps() {
        assert!(ranges_overlap(
            date(2026, 9, 1),
            date(2026, 9, 30),
            date(2026, 9, 10),
            date(2026, 9, 12),
        ));
    }

    #[test]
    fn rejection_codes_are_distinct() {
        let codes = [
            BookingRejection::EndBeforeStart.code(),
            BookingRejection::StartDateInPast.code(),
            BookingRejection::AlreadyBooked.code(),
        ];
        assert_eq!(codes.len(), 3);
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }
}
