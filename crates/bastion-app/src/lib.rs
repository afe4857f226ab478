pub mod app;
pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod store_handler;
