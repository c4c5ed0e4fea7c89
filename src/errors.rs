use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActivityError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    #[error("duplicate activity id {0}")]
    DuplicateId(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("map is not initialized")]
    MapUnavailable,
    #[error("no location selected on the map")]
    NoPendingLocation,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<ActivityError> for AppError {
    fn from(err: ActivityError) -> Self {
        let status = match err {
            ActivityError::Validation(_) => StatusCode::BAD_REQUEST,
            ActivityError::MapUnavailable | ActivityError::NoPendingLocation => StatusCode::CONFLICT,
            ActivityError::CorruptRecord(_)
            | ActivityError::DuplicateId(_)
            | ActivityError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
