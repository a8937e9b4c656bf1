use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle).patch(update_vehicle))
        .route("/:id", delete(delete_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_by_owner(user.user_id).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Vehicle deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::config::environment::EnvironmentConfig;
    use crate::models::user::User;
    use crate::repositories::user_repository::UserRepository;
    use crate::repositories::vehicle_repository::VehicleRepository;
    use crate::utils::jwt::{generate_access_token, JwtConfig};

    fn test_environment() -> EnvironmentConfig {
        EnvironmentConfig {
            environment: "development".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_access_expiration: 3600,
            jwt_refresh_expiration: 86400,
            cors_origins: vec![],
        }
    }

    async fn seed_owner_with_vehicle(pool: &PgPool) -> (Uuid, String) {
        let user = UserRepository::new(pool.clone())
            .create(&User::new(
                "owner".to_string(),
                "owner@example.com".to_string(),
                "not-a-real-hash".to_string(),
            ))
            .await
            .unwrap();

        let vehicle = VehicleRepository::new(pool.clone())
            .create(
                user.id,
                "Toyota".to_string(),
                "Corolla".to_string(),
                2020,
                "LHR-123".to_string(),
            )
            .await
            .unwrap();

        let token =
            generate_access_token(user.id, &JwtConfig::from(&test_environment())).unwrap();

        (vehicle.id, token)
    }

    #[sqlx::test]
    async fn patch_applies_partial_update(pool: PgPool) {
        let (vehicle_id, token) = seed_owner_with_vehicle(&pool).await;

        let app = create_vehicle_router().with_state(AppState::new(pool, test_environment()));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/{}", vehicle_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"model": "Yaris"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        // Solo cambia el campo enviado; el resto se conserva
        assert_eq!(body["data"]["model"], "Yaris");
        assert_eq!(body["data"]["make"], "Toyota");
        assert_eq!(body["data"]["plate"], "LHR-123");
    }
}
