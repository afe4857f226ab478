use thiserror::Error;

/// Application-level errors (HTTP layer and startup)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] bastion_service::error::ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] bastion_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] bastion_core::error::CoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
