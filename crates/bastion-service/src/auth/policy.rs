//! Path-based authorization.
//!
//! An [`AuthorizationPolicy`] is an ordered list of [`PolicyRule`]s. The first
//! rule whose pattern matches the request path decides; a path no rule
//! matches is open to any authenticated principal.

use std::collections::BTreeSet;

use bastion_core::config::PolicyConfig;
use bastion_core::pattern::PathPattern;
use bastion_core::types::Role;

use super::principal::Principal;
use crate::error::{ServiceError, ServiceResult};

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// A rule matched but the principal holds none of its roles.
    InsufficientRole,
    /// No principal was presented.
    Unauthenticated,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InsufficientRole => "insufficient role",
            Self::Unauthenticated => "unauthenticated",
        })
    }
}

/// Outcome of [`AuthorizationPolicy::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny(DenyReason),
}

impl AuthDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// A path pattern and the roles, any one of which grants access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    pattern: PathPattern,
    roles: BTreeSet<Role>,
}

impl PolicyRule {
    /// ## Errors
    /// Returns `InvalidConfiguration` if `roles` is empty.
    pub fn new(pattern: PathPattern, roles: BTreeSet<Role>) -> ServiceResult<Self> {
        if roles.is_empty() {
            return Err(ServiceError::InvalidConfiguration(format!(
                "Rule '{pattern}' must require at least one role"
            )));
        }
        Ok(Self { pattern, roles })
    }

    /// ## Summary
    /// Parses `pattern` and builds a rule from it.
    ///
    /// ## Errors
    /// Returns a `CoreError` for a malformed pattern, `InvalidConfiguration` for empty roles.
    pub fn parse(pattern: &str, roles: impl IntoIterator<Item = Role>) -> ServiceResult<Self> {
        Self::new(pattern.parse()?, roles.into_iter().collect())
    }

    #[must_use]
    pub const fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

/// Ordered, immutable rule list.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    rules: Vec<PolicyRule>,
}

impl AuthorizationPolicy {
    /// ## Summary
    /// Creates a policy; rules are evaluated in the given order.
    #[must_use]
    pub const fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    /// ## Summary
    /// Builds the policy from configuration, preserving rule order.
    ///
    /// ## Errors
    /// Returns an error for a malformed pattern or a rule without roles.
    pub fn from_config(config: &PolicyConfig) -> ServiceResult<Self> {
        let rules = config
            .rules
            .iter()
            .map(|rule| PolicyRule::parse(&rule.pattern, rule.roles.iter().copied()))
            .collect::<ServiceResult<Vec<_>>>()?;

        tracing::info!(rule_count = rules.len(), "Authorization policy loaded");
        for (index, rule) in rules.iter().enumerate() {
            tracing::debug!(index, pattern = %rule.pattern, roles = ?rule.roles, "Policy rule");
        }

        Ok(Self::new(rules))
    }

    #[must_use]
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// ## Summary
    /// Decides whether `principal` may access `path`.
    ///
    /// - no principal: `Deny(Unauthenticated)`, whatever the path;
    /// - first matching rule: `Allow` if the principal holds any of its roles,
    ///   otherwise `Deny(InsufficientRole)`;
    /// - no matching rule: `Allow`.
    #[must_use]
    pub fn evaluate(&self, path: &str, principal: Option<&Principal>) -> AuthDecision {
        let Some(principal) = principal else {
            tracing::trace!(path, "No principal presented");
            return AuthDecision::Deny(DenyReason::Unauthenticated);
        };

        let Some((index, rule)) = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.pattern.matches(path))
        else {
            tracing::trace!(path, "No rule matched, authenticated principal allowed");
            return AuthDecision::Allow;
        };

        if principal.has_any_role(&rule.roles) {
            tracing::trace!(path, index, pattern = %rule.pattern, "Rule allows");
            AuthDecision::Allow
        } else {
            tracing::debug!(
                path,
                index,
                pattern = %rule.pattern,
                username = principal.username(),
                "Rule denies: principal lacks required role"
            );
            AuthDecision::Deny(DenyReason::InsufficientRole)
        }
    }
}
