use diesel::r2d2;
use http::StatusCode;
use std::fmt;

/// Domain error for the escrow core. Services return these; the routing
/// layer renders them through the `(StatusCode, String)` conversion.
#[derive(Debug)]
pub enum ApiError {
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Validation(validator::ValidationErrors),
    InvalidArgument(String),
    NotFound(String),
    InsufficientFunds(String),
    VersionConflict(String),
    InvalidState(String),
    Conflict(String),
    AmountMismatch(String),
    AlreadySettled(String),
    Payment(String),
    Timeout(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::InsufficientFunds(e) => write!(f, "Insufficient funds: {}", e),
            ApiError::VersionConflict(e) => write!(f, "Version conflict: {}", e),
            ApiError::InvalidState(e) => write!(f, "Invalid state: {}", e),
            ApiError::Conflict(e) => write!(f, "Conflict: {}", e),
            ApiError::AmountMismatch(e) => write!(f, "Amount mismatch: {}", e),
            ApiError::AlreadySettled(e) => write!(f, "Already settled: {}", e),
            ApiError::Payment(e) => write!(f, "Payment provider error: {}", e),
            ApiError::Timeout(e) => write!(f, "Timeout: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound("Record not found".into()),
            other => ApiError::Database(other),
        }
    }
}

impl From<r2d2::PoolError> for ApiError {
    fn from(err: r2d2::PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout("Payment gateway timed out".into())
        } else {
            ApiError::Payment(err.to_string())
        }
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Database(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            ),
            ApiError::DatabaseConnection(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database connection error: {}", e),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                format!("Validation error: {}", errors),
            ),
            ApiError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InsufficientFunds(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::VersionConflict(msg) | ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, msg)
            }
            ApiError::InvalidState(msg) => (StatusCode::CONFLICT, msg),
            ApiError::AmountMismatch(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::AlreadySettled(msg) => (StatusCode::OK, msg),
            ApiError::Payment(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Payment provider error: {}", msg),
            ),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        }
    }
}
