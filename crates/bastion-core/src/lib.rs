//! Shared building blocks for the Bastion workspace.
//!
//! Holds everything that has no database or HTTP dependency: configuration,
//! the role vocabulary, request path patterns and the core error type.

pub mod config;
pub mod constants;
pub mod error;
pub mod pattern;
pub mod types;
