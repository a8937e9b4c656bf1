use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshResponse, RegisterRequest,
};
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::jwt::{
    generate_access_token, generate_refresh_token, verify_token, JwtConfig, TokenType,
};

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt: JwtConfig::from(config),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        // Unicidad de username y email
        if self.repository.username_exists(&request.username).await? {
            return Err(validation_error("username", "Username is already taken"));
        }

        if self.repository.email_exists(&request.email).await? {
            return Err(validation_error("email", "Email is already registered"));
        }

        // Hash de la contraseña
        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = User::new(request.username, request.email, password_hash);
        let saved_user = self.repository.create(&user).await?;

        let access = generate_access_token(saved_user.id, &self.jwt)?;
        let refresh = generate_refresh_token(saved_user.id, &self.jwt)?;

        Ok(AuthResponse {
            user: saved_user.into(),
            access,
            refresh,
            message: "User registered successfully".to_string(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let access = generate_access_token(user.id, &self.jwt)?;
        let refresh = generate_refresh_token(user.id, &self.jwt)?;

        Ok(AuthResponse {
            user: user.into(),
            access,
            refresh,
            message: "Login successful".to_string(),
        })
    }

    pub async fn refresh(&self, request: RefreshTokenRequest) -> Result<RefreshResponse, AppError> {
        let claims = verify_token(&request.refresh, &self.jwt)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AppError::Jwt("Expected a refresh token".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Jwt("Invalid subject claim".to_string()))?;

        // El usuario tiene que seguir existiendo
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        let access = generate_access_token(user_id, &self.jwt)?;

        Ok(RefreshResponse { access })
    }
}
