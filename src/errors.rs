use crate::calculator::parser::CalcError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Game {0} not found")]
    NotFound(String),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Game time cannot be zero")]
    ZeroDuration,

    #[error("Extension must be at least one minute")]
    InvalidExtension,

    #[error("Game {0} is already running")]
    AlreadyRunning(String),

    #[error("Game {0} is not running")]
    NotRunning(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ResponseError for GameError {
    fn status_code(&self) -> StatusCode {
        match self {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::InvalidAmount | GameError::ZeroDuration | GameError::InvalidExtension => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GameError::AlreadyRunning(_) | GameError::NotRunning(_) => StatusCode::CONFLICT,
            GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

impl ResponseError for CalcError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

fn error_body(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": message,
        "success": false,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub type Result<T> = std::result::Result<T, GameError>;
