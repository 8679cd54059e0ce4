use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use payroll_core::{RepositoryError, ServiceError, ValidationError};
use thiserror::Error;
use tracing::error;

use crate::dto::MessageResponse;

/// Errors surfaced by handlers. Every variant renders as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    /// Store failures keep their detail in the log, not in the response.
    fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Service(err) => match err {
                ServiceError::Validation(_) | ServiceError::InvalidBracketTable(_) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::EmployeeNotFound(_)
                | ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        HttpResponse::build(status).json(MessageResponse::new(self.public_message()))
    }
}
