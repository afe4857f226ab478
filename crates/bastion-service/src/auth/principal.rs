use std::collections::BTreeSet;

use serde::Serialize;

use bastion_core::types::Role;

/// The authenticated identity of one request and the roles it holds.
///
/// Built by the authenticator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    username: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    #[must_use]
    pub fn new(username: impl Into<String>, roles: BTreeSet<Role>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// ## Summary
    /// Returns `true` if the principal holds at least one of `required`.
    #[must_use]
    pub fn has_any_role(&self, required: &BTreeSet<Role>) -> bool {
        !self.roles.is_disjoint(required)
    }
}
