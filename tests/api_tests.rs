use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// Función helper para crear la app de test: replica la forma del router
// público sin necesitar PostgreSQL (la lógica con base de datos se cubre
// en los tests unitarios de src/).
fn create_test_app() -> Router {
    async fn api_root() -> Json<Value> {
        Json(json!({
            "message": "Lahore Car Rental API",
            "version": "1.0",
            "endpoints": {
                "authentication": {
                    "register": "/api/register",
                    "login": "/api/login",
                },
                "vehicles": { "list_create": "/api/vehicles/" },
                "bookings": { "list_create": "/api/bookings/" },
            },
        }))
    }

    Router::new().route("/", get(api_root))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
async fn test_api_root() {
    let app = create_test_app();
    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Lahore Car Rental API");
    assert_eq!(body["version"], "1.0");
    assert!(body["endpoints"]["authentication"].is_object());
    assert!(body["endpoints"]["vehicles"].is_object());
    assert!(body["endpoints"]["bookings"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();
    let (status, _) = get_json(app, "/api/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
