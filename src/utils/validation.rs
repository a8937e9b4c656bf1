//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! del dominio (matrículas, años de fabricación).

use chrono::{Datelike, Utc};
use validator::ValidationError;

/// Año mínimo aceptado para un vehículo
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Normalizar una matrícula: trim + mayúsculas.
/// La unicidad global se comprueba siempre sobre la forma normalizada.
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Validar una matrícula ya normalizada
pub fn validate_plate(plate: &str) -> Result<(), ValidationError> {
    if plate.is_empty() {
        let mut error = ValidationError::new("plate");
        error.message = Some("Plate cannot be empty".into());
        return Err(error);
    }

    if plate.chars().count() > 20 {
        let mut error = ValidationError::new("plate");
        error.message = Some("Plate cannot exceed 20 characters".into());
        return Err(error);
    }

    Ok(())
}

/// Validar que el año de fabricación sea plausible: 1900 hasta el año
/// actual + 1 (los modelos del año siguiente ya se venden).
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + 1;

    if year < MIN_VEHICLE_YEAR || year > max_year {
        let mut error = ValidationError::new("year");
        error.message = Some(
            format!("Year must be between {} and {}", MIN_VEHICLE_YEAR, max_year).into(),
        );
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_is_trimmed_and_uppercased() {
        assert_eq!(normalize_plate("  lhr-123 "), "LHR-123");
        assert_eq!(normalize_plate("LHR-123"), "LHR-123");
    }

    #[test]
    fn empty_plate_is_rejected() {
        assert!(validate_plate("").is_err());
        assert!(validate_plate(&normalize_plate("   ")).is_err());
    }

    #[test]
    fn oversized_plate_is_rejected() {
        let plate = "X".repeat(21);
        assert!(validate_plate(&plate).is_err());
        assert!(validate_plate(&"X".repeat(20)).is_ok());
    }

    #[test]
    fn year_range_is_enforced() {
        let next_year = Utc::now().year() + 1;

        assert!(validate_year(1899).is_err());
        assert!(validate_year(1900).is_ok());
        assert!(validate_year(next_year).is_ok());
        assert!(validate_year(next_year + 1).is_err());
    }
}
