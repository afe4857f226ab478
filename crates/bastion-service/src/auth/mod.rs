//! Authentication and authorization flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: Turns presented credentials into a `Principal`
//! - `credentials`: Credentials and HTTP Basic header parsing
//! - `depot`: Helpers for passing the principal between Salvo handlers
//! - `password`: Password hashing and verification with Argon2
//! - `policy`: Ordered path rules and the allow/deny decision
//! - `principal`: The authenticated identity and its roles
//! - `store`: Credential records and their backends (memory, PostgreSQL)

pub mod authenticate;
pub mod credentials;
pub mod depot;
pub mod password;
pub mod policy;
pub mod principal;
pub mod store;

// Re-export commonly used types at module level
pub use authenticate::RequestAuthenticator;
pub use credentials::Credentials;
pub use depot::{DepotPrincipal, get_principal_from_depot, is_authenticated};
pub use password::{HashedValue, PasswordHasher};
pub use policy::{AuthDecision, AuthorizationPolicy, DenyReason, PolicyRule};
pub use principal::Principal;
pub use store::{
    CredentialBackend, CredentialRecord, CredentialStore, InMemoryBackend, PostgresBackend,
};
