//! DTOs de la API
//!
//! Requests y responses que cruzan la frontera HTTP. Los modelos de
//! base de datos nunca se serializan directamente hacia el cliente.

pub mod auth_dto;
pub mod booking_dto;
pub mod vehicle_dto;

use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
