//! Extractor de autenticación
//!
//! Valida el bearer token del header Authorization y entrega la
//! identidad del caller como parámetro explícito del handler, sin
//! estado ambiental de request.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token, JwtConfig, TokenType};

/// Identidad autenticada del request actual
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRef<AppState> for JwtConfig {
    fn from_ref(state: &AppState) -> Self {
        JwtConfig::from(&state.config)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = extract_token_from_header(auth_header)?;

        let config = JwtConfig::from_ref(state);
        let claims = verify_token(token, &config)?;

        // Los refresh tokens no sirven para acceder a recursos
        if claims.token_type != TokenType::Access {
            return Err(AppError::Jwt("Expected an access token".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Jwt("Invalid subject claim".to_string()))?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    use crate::utils::jwt::{generate_access_token, generate_refresh_token};

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_expiration: 3600,
            refresh_expiration: 86400,
        }
    }

    fn test_app() -> Router {
        async fn whoami(user: AuthUser) -> String {
            user.user_id.to_string()
        }

        Router::new()
            .route("/whoami", get(whoami))
            .with_state(test_config())
    }

    async fn get_with_auth(app: Router, auth: Option<String>) -> StatusCode {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = builder.body(Body::empty()).unwrap();

        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(
            get_with_auth(test_app(), None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        assert_eq!(
            get_with_auth(test_app(), Some("Bearer not-a-jwt".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn refresh_token_cannot_access_resources() {
        let token = generate_refresh_token(Uuid::new_v4(), &test_config()).unwrap();
        assert_eq!(
            get_with_auth(test_app(), Some(format!("Bearer {}", token))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn valid_access_token_is_accepted() {
        let token = generate_access_token(Uuid::new_v4(), &test_config()).unwrap();
        assert_eq!(
            get_with_auth(test_app(), Some(format!("Bearer {}", token))).await,
            StatusCode::OK
        );
    }
}
