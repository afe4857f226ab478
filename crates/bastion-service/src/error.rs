use thiserror::Error;

/// Service layer errors
///
/// Authorization outcomes are not errors: a denied request is an
/// [`AuthDecision::Deny`](crate::auth::AuthDecision::Deny), never an `Err`.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(#[from] bastion_core::error::CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Raised for unknown usernames and wrong passwords alike.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
