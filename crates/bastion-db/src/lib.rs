//! PostgreSQL persistence for credential records.

pub mod db;
pub mod error;
pub mod model;
