//! Authentication and authorization services.

pub mod auth;
pub mod error;
