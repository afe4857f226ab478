use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::ROLE_AUTHORITY_PREFIX;
use crate::error::CoreError;

/// Coarse-grained permission group attached to a principal.
///
/// The vocabulary is fixed: configuration naming any other role is rejected
/// when it is deserialized, never at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const ALL: [Self; 2] = [Self::User, Self::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// ## Summary
    /// Returns the authority string used for persistence (`ROLE_USER`, `ROLE_ADMIN`).
    #[must_use]
    pub fn authority(self) -> String {
        format!("{ROLE_AUTHORITY_PREFIX}{}", self.as_str())
    }

    /// ## Summary
    /// Parses a persisted authority string. Unlike [`FromStr`], the `ROLE_`
    /// prefix is mandatory here.
    ///
    /// ## Errors
    /// Returns `InvalidInput` if the prefix is missing or the role is unknown.
    pub fn from_authority(authority: &str) -> Result<Self, CoreError> {
        authority
            .strip_prefix(ROLE_AUTHORITY_PREFIX)
            .ok_or_else(|| CoreError::InvalidInput(format!("Not a role authority: {authority}")))?
            .parse()
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(ROLE_AUTHORITY_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::InvalidInput(format!("Unknown role: {s}")))
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
