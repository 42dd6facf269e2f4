use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing or malformed bearer token")]
    MissingToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(DomainError),

    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: DomainError,
    },
}

impl AppError {
    /// Wrap a domain failure with the message shown to the caller.
    pub fn with_context(context: &'static str, source: DomainError) -> Self {
        match source {
            DomainError::InvalidCredentials | DomainError::SessionNotFound => {
                AppError::Unauthorized(source)
            }
            source => AppError::Internal { context, source },
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self {
            AppError::MissingToken => ErrorEnvelope {
                success: false,
                message: "Unauthorized".to_string(),
                error: self.to_string(),
                stack: None,
                details: None,
            },
            AppError::Unauthorized(source) => ErrorEnvelope {
                success: false,
                message: "Unauthorized".to_string(),
                error: source.to_string(),
                stack: None,
                details: Some(ErrorDetails {
                    name: source.name().to_string(),
                    cause: None,
                }),
            },
            AppError::Internal { source, .. } => ErrorEnvelope {
                success: false,
                message: self.to_string(),
                error: source.to_string(),
                stack: None,
                details: Some(ErrorDetails {
                    name: source.name().to_string(),
                    cause: source.source_kind().map(|kind| kind.to_string()),
                }),
            },
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::with_context("Internal server error", e)
    }
}

/// Body of every failed response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetails {
    pub name: String,
    /// Upstream service that caused the failure, when there is one.
    pub cause: Option<String>,
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal { .. } = self {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}
