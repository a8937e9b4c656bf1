use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingRecord, BookingStatus};
use crate::services::booking_validator::BookingRejection;
use crate::utils::errors::AppError;

// SQLSTATE de violación de exclusion constraint (bookings_no_active_overlap)
const EXCLUSION_VIOLATION: &str = "23P01";

const BOOKING_WITH_VEHICLE: &str = r#"
    SELECT b.id, b.user_id, b.vehicle_id, b.start_date, b.end_date,
           b.status, b.deposit_amount, b.deposit_paid, b.created_at, b.updated_at,
           v.make AS vehicle_make, v.model AS vehicle_model,
           v.year AS vehicle_year, v.plate AS vehicle_plate
    FROM bookings b
    JOIN vehicles v ON v.id = b.vehicle_id
"#;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar una reserva en estado pending con el depósito ya derivado.
    ///
    /// Si dos requests concurrentes pasan la validación a la vez, la
    /// exclusion constraint para al segundo; se responde con el mismo
    /// rechazo "already booked" que daría el validador.
    pub async fn create(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        deposit_amount: Decimal,
    ) -> Result<Booking, AppError> {
        let now = Utc::now();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, vehicle_id, start_date, end_date,
                                  status, deposit_amount, deposit_paid, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, FALSE, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .bind(deposit_amount)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_overlap_violation)?;

        Ok(booking)
    }

    /// ¿Existe alguna reserva activa del vehículo que interseque el
    /// rango [start_date, end_date]? Intervalos cerrados: tocar en un
    /// extremo cuenta. `exclude_booking_id` se omite del escaneo.
    pub async fn has_active_overlap(
        &self,
        vehicle_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE vehicle_id = $1
                  AND status IN ('pending', 'confirmed')
                  AND start_date <= $3
                  AND end_date >= $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .bind(exclude_booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn find_by_id_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BookingRecord>, AppError> {
        let sql = format!("{} WHERE b.id = $1 AND b.user_id = $2", BOOKING_WITH_VEHICLE);

        let record = sqlx::query_as::<_, BookingRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Listar las reservas del usuario, más recientes primero.
    /// `from` acota start_date por abajo y `to` acota end_date por arriba.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingRecord>, AppError> {
        let sql = format!(
            r#"{}
            WHERE b.user_id = $1
              AND ($2::date IS NULL OR b.start_date >= $2)
              AND ($3::date IS NULL OR b.end_date <= $3)
              AND ($4::booking_status IS NULL OR b.status = $4)
            ORDER BY b.created_at DESC
            "#,
            BOOKING_WITH_VEHICLE
        );

        let records = sqlx::query_as::<_, BookingRecord>(&sql)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Actualizar las fechas de una reserva. El depósito no se recalcula:
    /// queda fijado en la creación.
    pub async fn update_dates(
        &self,
        id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET start_date = $2, end_date = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(start_date)
        .bind(end_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_overlap_violation)?;

        Ok(booking)
    }

    pub async fn set_status(&self, id: Uuid, status: BookingStatus) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn mark_deposit_paid(&self, id: Uuid) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET deposit_paid = TRUE, updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }
}

/// Traducir la violación de la exclusion constraint al mismo rechazo que
/// produce el validador; el resto de errores siguen siendo de base de datos.
fn map_overlap_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &e {
        if db_error.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return BookingRejection::AlreadyBooked.into();
        }
    }

    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::user::User;
    use crate::repositories::user_repository::UserRepository;
    use crate::repositories::vehicle_repository::VehicleRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deposit() -> Decimal {
        Decimal::new(6000, 2) // 60.00
    }

    async fn seed_vehicle(pool: &PgPool) -> (Uuid, Uuid) {
        let user = UserRepository::new(pool.clone())
            .create(&User::new(
                "renter".to_string(),
                "renter@example.com".to_string(),
                "not-a-real-hash".to_string(),
            ))
            .await
            .unwrap();

        let vehicle = VehicleRepository::new(pool.clone())
            .create(
                user.id,
                "Honda".to_string(),
                "Civic".to_string(),
                2021,
                "KHI-456".to_string(),
            )
            .await
            .unwrap();

        (user.id, vehicle.id)
    }

    #[sqlx::test]
    async fn active_booking_blocks_overlapping_range(pool: PgPool) {
        let (user_id, vehicle_id) = seed_vehicle(&pool).await;
        let repository = BookingRepository::new(pool);

        repository
            .create(user_id, vehicle_id, date(2030, 1, 10), date(2030, 1, 15), deposit())
            .await
            .unwrap();

        // Compartir un extremo cuenta como solapamiento
        assert!(repository
            .has_active_overlap(vehicle_id, date(2030, 1, 15), date(2030, 1, 20), None)
            .await
            .unwrap());

        // Un rango disjunto no
        assert!(!repository
            .has_active_overlap(vehicle_id, date(2030, 1, 16), date(2030, 1, 20), None)
            .await
            .unwrap());
    }

    #[sqlx::test]
    async fn constraint_rejects_concurrent_overlap_as_already_booked(pool: PgPool) {
        let (user_id, vehicle_id) = seed_vehicle(&pool).await;
        let repository = BookingRepository::new(pool);

        repository
            .create(user_id, vehicle_id, date(2030, 2, 1), date(2030, 2, 5), deposit())
            .await
            .unwrap();

        // Insert directo, saltándose el chequeo del validador: simula dos
        // requests que pasaron la validación a la vez. La constraint para
        // al segundo y el error sale como el mismo rechazo del validador.
        let err = repository
            .create(user_id, vehicle_id, date(2030, 2, 3), date(2030, 2, 8), deposit())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::BookingRejected(BookingRejection::AlreadyBooked)
        ));
    }

    #[sqlx::test]
    async fn cancelled_booking_frees_its_range(pool: PgPool) {
        let (user_id, vehicle_id) = seed_vehicle(&pool).await;
        let repository = BookingRepository::new(pool);

        let booking = repository
            .create(user_id, vehicle_id, date(2030, 3, 1), date(2030, 3, 10), deposit())
            .await
            .unwrap();

        // Mismas fechas contra la reserva activa: rechazadas
        assert!(repository
            .has_active_overlap(vehicle_id, date(2030, 3, 1), date(2030, 3, 10), None)
            .await
            .unwrap());

        let cancelled = repository
            .set_status(booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // La cancelación libera el rango de forma permanente
        assert!(!repository
            .has_active_overlap(vehicle_id, date(2030, 3, 1), date(2030, 3, 10), None)
            .await
            .unwrap());

        // Y una reserva nueva con las mismas fechas entra sin conflicto
        let rebooked = repository
            .create(user_id, vehicle_id, date(2030, 3, 1), date(2030, 3, 10), deposit())
            .await
            .unwrap();
        assert_eq!(rebooked.status, BookingStatus::Pending);
    }

    #[sqlx::test]
    async fn own_booking_is_excluded_when_editing(pool: PgPool) {
        let (user_id, vehicle_id) = seed_vehicle(&pool).await;
        let repository = BookingRepository::new(pool);

        let booking = repository
            .create(user_id, vehicle_id, date(2030, 4, 1), date(2030, 4, 5), deposit())
            .await
            .unwrap();

        // Sin exclusión la reserva choca consigo misma; con ella no
        assert!(repository
            .has_active_overlap(vehicle_id, date(2030, 4, 2), date(2030, 4, 6), None)
            .await
            .unwrap());
        assert!(!repository
            .has_active_overlap(vehicle_id, date(2030, 4, 2), date(2030, 4, 6), Some(booking.id))
            .await
            .unwrap());

        // El UPDATE reemplaza la fila: mover las fechas dentro del propio
        // rango no dispara la constraint
        let updated = repository
            .update_dates(booking.id, date(2030, 4, 2), date(2030, 4, 6))
            .await
            .unwrap();
        assert_eq!(updated.start_date, date(2030, 4, 2));
        assert_eq!(updated.end_date, date(2030, 4, 6));
    }
}
