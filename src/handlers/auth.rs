use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::UserResponse;
use crate::response::ApiResponse;
use crate::security::jwt::JwtKeys;
use crate::services::auth::{AuthService, TokenPair};
use crate::validators;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

/// POST /api/v1/auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if !validators::validate_username(&req.username) {
        return Err(AppError::Validation(
            "username must be 3-50 alphanumeric characters (plus _ and -)".to_string(),
        ));
    }
    if !validators::validate_password(&req.password) {
        return Err(AppError::Validation(
            "password must be at least 8 characters with a letter and a digit".to_string(),
        ));
    }

    let service = AuthService::new(pool.get_ref().clone(), keys.get_ref().clone());
    let user = service
        .register(&req.username, &req.email, &req.full_name, &req.password)
        .await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        UserResponse::from(user),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new(pool.get_ref().clone(), keys.get_ref().clone());
    let (user, tokens) = service.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(
        "Logged in successfully",
        LoginResponse {
            user: UserResponse::from(user),
            tokens,
        },
    ))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    if req.refresh_token.trim().is_empty() {
        return Err(AppError::Validation("refresh_token is required".to_string()));
    }

    let service = AuthService::new(pool.get_ref().clone(), keys.get_ref().clone());
    let tokens = service.refresh(&req.refresh_token).await?;

    Ok(ApiResponse::ok("Token refreshed successfully", tokens))
}

/// POST /api/v1/auth/logout (authenticated)
pub async fn logout(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = AuthService::new(pool.get_ref().clone(), keys.get_ref().clone());
    let revoked = service.logout(user_id.0).await?;

    Ok(ApiResponse::ok(
        "Logged out successfully",
        serde_json::json!({ "revoked_sessions": revoked }),
    ))
}
