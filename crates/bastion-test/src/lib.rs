//! Bastion integration test support.
//!
//! Re-exports the workspace crates so integration tests can use
//! `bastion_test::` paths. Both library crates define an `error` module, so
//! the shared `component` namespace lists its modules by name and merges the
//! two error modules into one.

pub mod component {
    pub use bastion_core::{config, constants, pattern, types};
    pub use bastion_service::auth;

    pub mod error {
        pub use bastion_core::error::*;
        pub use bastion_service::error::*;
    }
}

pub mod app {
    pub use bastion_app::*;

    pub mod api {
        pub use bastion_app::app::api::*;
    }
}
