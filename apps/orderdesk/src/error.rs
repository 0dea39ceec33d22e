//! # API Error Type
//!
//! Unified error type for every OrderDesk operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in OrderDesk                              │
//! │                                                                         │
//! │  ValidationError ───────────────────────────────► INVALID_INPUT        │
//! │  CoreError::ProductNotFound ────────────────────► NOT_FOUND            │
//! │  DbError::NotFound ─────────────────────────────► NOT_FOUND            │
//! │  DbError::InvalidState / UniqueViolation ───────► CONFLICT             │
//! │  anything else from storage ────────────────────► STORAGE_FAILURE      │
//! │                                                   (opaque message,      │
//! │                                                    detail only in logs) │
//! │                                                                         │
//! │  A discount above the ceiling never shows up here: it is the approval  │
//! │  branch of the workflow, not a failure.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "NOT_FOUND", "message": "Product not found: SKU-123" }
//! ```

use serde::Serialize;

use crate::config::ConfigError;
use orderdesk_core::{CoreError, ValidationError};
use orderdesk_db::{DbError, RegisterError};

/// Error returned by every OrderDesk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed input, bad decision value. No state changed.
    InvalidInput,

    /// Unknown SKU or approval request. No state changed.
    NotFound,

    /// Duplicate SKU, or an approval request that is no longer pending.
    Conflict,

    /// Transaction or connection failure. Every partial write was rolled back.
    StorageFailure,
}

impl ErrorCode {
    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::InvalidInput => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Conflict => 4,
            ErrorCode::StorageFailure => 5,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates a storage failure with the fixed caller-facing message.
    pub fn storage_failure() -> Self {
        ApiError::new(ErrorCode::StorageFailure, "Storage operation failed")
    }
}

/// Result type for OrderDesk operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InvalidState {
                entity,
                id,
                current,
                ..
            } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} {} is already {}", entity, id, current),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::storage_failure()
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage_failure()
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::storage_failure()
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::storage_failure()
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::storage_failure()
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::storage_failure()
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::storage_failure()
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(sku) => ApiError::not_found("Product", &sku),
            CoreError::AmountOverflow(what) => ApiError::invalid_input(format!(
                "Amounts too large: {} exceeds the supported range",
                what
            )),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Invalid(e) => e.into(),
            RegisterError::Db(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_input(format!("Malformed request body: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
