//! Error types for the Kitaplik engine

use thiserror::Error;

/// Stable error codes surfaced to the presentation shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NoSuchRecord = 3,
    BadValue = 4,
    MemberLimitReached = 5,
    BookUnavailable = 6,
    AlreadyReturned = 7,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// Policy failure: the member already holds `current` active loans.
    #[error("member holds {current} active loans, limit is {limit}")]
    MemberLimitExceeded { current: i64, limit: i64 },

    /// Policy failure: no copy of the book is left on the shelf.
    #[error("no copies of book {0} are available")]
    BookUnavailable(i64),

    /// Integrity failure: the loan was already closed (stale reference).
    #[error("loan {0} has already been returned")]
    AlreadyReturned(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Numeric code for callers that render errors without matching variants
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NoSuchRecord,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::MemberLimitExceeded { .. } => ErrorCode::MemberLimitReached,
            AppError::BookUnavailable(_) => ErrorCode::BookUnavailable,
            AppError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            AppError::Database(_) | AppError::Migrate(_) => ErrorCode::DbFailure,
            AppError::Io(_) | AppError::Config(_) => ErrorCode::Failure,
        }
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;
