//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para emitir y verificar los
//! tokens de acceso y de refresh que consume la API.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Tipo de token emitido
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,           // user_id
    pub token_type: TokenType, // access | refresh
    pub exp: usize,            // expiration timestamp
    pub iat: usize,            // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiration: u64,
    pub refresh_expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expiration: config.jwt_access_expiration,
            refresh_expiration: config.jwt_refresh_expiration,
        }
    }
}

fn generate_token(
    user_id: Uuid,
    token_type: TokenType,
    expiration: u64,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(expiration as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        token_type,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generating token: {}", e)))
}

/// Generar token de acceso para un usuario
pub fn generate_access_token(user_id: Uuid, config: &JwtConfig) -> Result<String, AppError> {
    generate_token(user_id, TokenType::Access, config.access_expiration, config)
}

/// Generar token de refresh para un usuario
pub fn generate_refresh_token(user_id: Uuid, config: &JwtConfig) -> Result<String, AppError> {
    generate_token(user_id, TokenType::Refresh, config.refresh_expiration, config)
}

/// Verificar y decodificar un JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Jwt(
            "Authorization header must start with 'Bearer '".to_string(),
        ));
    }

    let token = &auth_header[7..]; // Remover "Bearer "
    if token.is_empty() {
        return Err(AppError::Jwt("Token cannot be empty".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_expiration: 3600,
            refresh_expiration: 86400,
        }
    }

    #[test]
    fn access_token_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_carries_refresh_type() {
        let config = test_config();
        let token = generate_refresh_token(Uuid::new_v4(), &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let other = JwtConfig {
            secret: "other-secret".to_string(),
            ..test_config()
        };

        let token = generate_access_token(Uuid::new_v4(), &other).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn extract_token_requires_bearer_scheme() {
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
        assert_eq!(extract_token_from_header("Bearer abc").unwrap(), "abc");
    }
}
