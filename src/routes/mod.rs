//! Routers de la API

pub mod auth_routes;
pub mod booking_routes;
pub mod vehicle_routes;

use axum::Json;
use serde_json::{json, Value};

/// Endpoint raíz - muestra los endpoints disponibles
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "message": "Lahore Car Rental API",
        "version": "1.0",
        "endpoints": {
            "authentication": {
                "register": "/api/register",
                "login": "/api/login",
                "token_refresh": "/api/token/refresh",
            },
            "vehicles": {
                "list_create": "/api/vehicles/",
                "detail_update_delete": "/api/vehicles/{id}/",
            },
            "bookings": {
                "list_create": "/api/bookings/",
                "detail": "/api/bookings/{id}/",
                "cancel": "/api/bookings/{id}/cancel",
                "pay_deposit": "/api/bookings/{id}/pay-deposit",
                "filters": "?from=YYYY-MM-DD&to=YYYY-MM-DD&status=confirmed",
            },
        },
    }))
}
