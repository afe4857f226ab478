//! Request path patterns for authorization rules.
//!
//! Patterns are matched segment by segment on `/`, case-sensitively:
//!
//! - a trailing `/**` matches the prefix itself and anything below it
//!   (`/admin/**` matches `/admin`, `/admin/` and `/admin/a/b`, but not `/administrator`);
//! - a `*` segment matches exactly one non-empty segment;
//! - every other segment must match exactly.

use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

impl Segment {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == candidate,
            Self::Wildcard => !candidate.is_empty(),
        }
    }
}

/// A parsed path pattern such as `/users`, `/users/*/profile` or `/admin/**`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    recursive: bool,
}

impl PathPattern {
    /// ## Summary
    /// Returns the pattern exactly as it was configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// ## Summary
    /// Returns `true` if `path` is matched by this pattern.
    ///
    /// Paths that do not start with `/` never match.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        let mut candidates = rest.split('/');

        for segment in &self.segments {
            match candidates.next() {
                Some(candidate) if segment.matches(candidate) => {}
                _ => return false,
            }
        }

        self.recursive || candidates.next().is_none()
    }
}

impl FromStr for PathPattern {
    type Err = CoreError;

    fn from_str(raw: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::ValidationError(format!("Invalid path pattern '{raw}': {reason}"));

        let rest = raw.strip_prefix('/').ok_or_else(|| invalid("must start with '/'"))?;

        let mut parts: Vec<&str> = rest.split('/').collect();
        let recursive = parts.last() == Some(&"**");
        if recursive {
            parts.pop();
        }

        let last_index = parts.len().saturating_sub(1);
        let mut segments = Vec::with_capacity(parts.len());
        for (index, part) in parts.into_iter().enumerate() {
            let segment = match part {
                "**" => return Err(invalid("'**' is only allowed as the last segment")),
                "*" => Segment::Wildcard,
                // Only "/" itself and a trailing slash may produce an empty segment.
                "" if index != last_index || recursive => {
                    return Err(invalid("empty path segment"));
                }
                literal if literal.contains('*') => {
                    return Err(invalid("wildcards must span a whole segment"));
                }
                literal => Segment::Literal(literal.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            recursive,
        })
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// ## Summary
/// Rejects request paths that could make a pattern see a different path than
/// the router: percent-encoding, backslashes, `.`/`..` segments and empty
/// interior segments.
///
/// ## Errors
/// Returns `InvalidInput` naming the offending construct.
pub fn validate_request_path(path: &str) -> CoreResult<()> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| CoreError::InvalidInput("Request path must start with '/'".to_string()))?;

    if path.contains('%') {
        return Err(CoreError::InvalidInput(
            "Percent-encoded request paths are not accepted".to_string(),
        ));
    }
    if path.contains('\\') {
        return Err(CoreError::InvalidInput(
            "Backslashes are not accepted in request paths".to_string(),
        ));
    }

    let segments: Vec<&str> = rest.split('/').collect();
    let last_index = segments.len() - 1;
    for (index, segment) in segments.into_iter().enumerate() {
        match segment {
            "." | ".." => {
                return Err(CoreError::InvalidInput(
                    "Relative segments are not accepted in request paths".to_string(),
                ));
            }
            "" if index != last_index => {
                return Err(CoreError::InvalidInput(
                    "Empty segments are not accepted in request paths".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

/// ## Summary
/// Validates `path` and returns the form the policy must evaluate: the path
/// without its trailing `/`, except for `/` itself.
///
/// The router serves `/users/` from the `/users` route, so the policy has to
/// see `/users` for both.
///
/// ## Errors
/// Returns `InvalidInput` for any path [`validate_request_path`] rejects.
pub fn canonical_request_path(path: &str) -> CoreResult<&str> {
    validate_request_path(path)?;

    Ok(match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    })
}
