//! Service error type shared by every entity service

/// Error returned by service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before touching the database
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Database or other infrastructure failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
