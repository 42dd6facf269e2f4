use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::session::AdminSession;
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionData {
    pub token: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<AdminSession> for SessionData {
    fn from(session: AdminSession) -> Self {
        Self {
            token: session.token,
            username: session.username,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub data: SessionData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Token from an `Authorization: Bearer <uuid>` header.
fn bearer_token(req: &HttpRequest) -> Result<Uuid, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MissingToken)?;
    Uuid::parse_str(token.trim()).map_err(|_| AppError::MissingToken)
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorEnvelope),
    ),
    tag = "auth"
)]
pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = auth
        .login(&body.username, &body.password)
        .map_err(|e| AppError::with_context("Login failed", e))?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        success: true,
        message: "Logged in".to_string(),
        data: session.into(),
    }))
}

/// GET /api/auth/session
///
/// Returns the session behind the bearer token, if it is still live.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Live session", body = SessionResponse),
        (status = 401, description = "Missing, unknown or expired token", body = crate::errors::ErrorEnvelope),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn current_session(
    auth: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let session = auth
        .session(token)
        .map_err(|e| AppError::with_context("Session lookup failed", e))?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        success: true,
        message: "Session active".to_string(),
        data: session.into(),
    }))
}

/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = LogoutResponse),
        (status = 401, description = "Missing or malformed token", body = crate::errors::ErrorEnvelope),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    auth: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    auth.logout(token)
        .map_err(|e| AppError::with_context("Logout failed", e))?;

    Ok(HttpResponse::Ok().json(LogoutResponse {
        success: true,
        message: "Logged out".to_string(),
    }))
}
