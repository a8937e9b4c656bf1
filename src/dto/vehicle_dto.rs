use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::Vehicle;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    pub year: i32,

    #[validate(length(min = 1, max = 30))]
    pub plate: String,
}

// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    pub year: Option<i32>,

    #[validate(length(min = 1, max = 30))]
    pub plate: Option<String>,
}

// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            owner_id: vehicle.owner_id,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            plate: vehicle.plate,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

// Datos resumidos del vehículo, embebidos en las responses de reservas
#[derive(Debug, Serialize)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            plate: vehicle.plate.clone(),
        }
    }
}
