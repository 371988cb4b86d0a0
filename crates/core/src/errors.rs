use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Tutor unavailable: {0}")]
    TutorUnavailable(String),

    #[error("Insufficient balance: {required} credits required, {available} available")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("Transaction failed: {0}")]
    Transaction(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type DomainResult<T> = Result<T, DomainError>;
