use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::models::vehicle::Vehicle;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::{normalize_plate, validate_plate, validate_year};

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let plate = normalize_plate(&request.plate);
        validate_plate(&plate).map_err(field_error("plate"))?;
        validate_year(request.year).map_err(field_error("year"))?;

        // Unicidad global de la matrícula, sobre la forma normalizada
        if self.repository.plate_exists(&plate, None).await? {
            return Err(conflict_error("Vehicle", "plate", &plate));
        }

        let vehicle = self
            .repository
            .create(owner_id, request.make, request.model, request.year, plate)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, owner_id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self.find_owned(id, owner_id).await?;
        Ok(vehicle.into())
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_by_owner(owner_id).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let current = self.find_owned(id, owner_id).await?;

        let plate = match request.plate {
            Some(raw) => {
                let plate = normalize_plate(&raw);
                validate_plate(&plate).map_err(field_error("plate"))?;

                // Al editar, el propio vehículo queda fuera del chequeo
                if plate != current.plate && self.repository.plate_exists(&plate, Some(id)).await? {
                    return Err(conflict_error("Vehicle", "plate", &plate));
                }
                plate
            }
            None => current.plate,
        };

        let year = request.year.unwrap_or(current.year);
        validate_year(year).map_err(field_error("year"))?;

        let vehicle = self
            .repository
            .update(
                id,
                request.make.unwrap_or(current.make),
                request.model.unwrap_or(current.model),
                year,
                plate,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        self.find_owned(id, owner_id).await?;
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Cargar un vehículo del propietario. Un vehículo ajeno responde
    /// 404, igual que uno inexistente: el caller no puede distinguirlos.
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Vehicle, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if vehicle.owner_id != owner_id {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        Ok(vehicle)
    }
}

fn field_error(field: &'static str) -> impl FnOnce(validator::ValidationError) -> AppError {
    move |error| {
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        AppError::Validation(errors)
    }
}
