//! Cálculo del depósito
//!
//! El depósito es el 20% del coste estimado del alquiler: días
//! (contando ambos extremos) por tarifa diaria. Función pura, sin I/O.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Tarifa diaria fija, en unidades de moneda por día
pub const DAILY_RATE: i64 = 50;

/// Calcular el depósito para un rango de fechas.
///
/// `days = (end - start) + 1`: una reserva de un solo día cuenta 1 día.
/// El resultado se redondea a 2 decimales con half-up.
pub fn calculate_deposit(start_date: NaiveDate, end_date: NaiveDate, daily_rate: i64) -> Decimal {
    let days = (end_date - start_date).num_days() + 1;
    let total = Decimal::from(days) * Decimal::from(daily_rate);
    let deposit = total * Decimal::new(20, 2); // 0.20

    deposit.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_booking_counts_one_day() {
        let d = date(2026, 9, 1);
        assert_eq!(calculate_deposit(d, d, DAILY_RATE), Decimal::new(1000, 2)); // 10.00
    }

    #[test]
    fn five_inclusive_days() {
        let start = date(2026, 9, 1);
        let end = date(2026, 9, 5);
        assert_eq!(
            calculate_deposit(start, end, DAILY_RATE),
            Decimal::new(5000, 2) // 50.00
        );
    }

    #[test]
    fn crosses_month_boundary() {
        let start = date(2026, 9, 29);
        let end = date(2026, 10, 2);
        // 4 días inclusivos * 50 * 0.20 = 40.00
        assert_eq!(calculate_deposit(start, end, DAILY_RATE), Decimal::new(4000, 2));
    }

    #[test]
    fn deposit_is_monotonic_in_interval_length() {
        let start = date(2026, 9, 1);
        let mut previous = Decimal::ZERO;

        for offset in 0..30 {
            let end = start + chrono::Duration::days(offset);
            let deposit = calculate_deposit(start, end, DAILY_RATE);
            assert!(deposit >= previous);
            previous = deposit;
        }
    }

    #[test]
    fn rounds_half_up_to_two_decimals() {
        // 1 día * 3 * 0.20 = 0.60; con tarifa impar 7: 1.40
        let d = date(2026, 9, 1);
        assert_eq!(calculate_deposit(d, d, 7), Decimal::new(140, 2));
        // 3 días * 1 * 0.20 = 0.60
        let end = date(2026, 9, 3);
        assert_eq!(calculate_deposit(d, end, 1), Decimal::new(60, 2));
    }
}
