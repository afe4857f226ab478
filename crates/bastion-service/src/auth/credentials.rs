//! Credentials presented by a request.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{ServiceError, ServiceResult};

const BASIC_SCHEME: &str = "Basic";

/// A username and plaintext password as presented by the client.
///
/// Lives only for the duration of one authentication attempt.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// ## Summary
    /// Parses an HTTP Basic `Authorization` header value
    /// (`Basic base64(username:password)`).
    ///
    /// The scheme is matched case-insensitively. The password may itself
    /// contain `:`; only the first one separates it from the username.
    ///
    /// ## Errors
    /// Returns `MalformedInput` for a different scheme, invalid base64,
    /// non-UTF-8 content, a missing `:` or an empty username.
    pub fn from_basic_header(value: &str) -> ServiceResult<Self> {
        let (scheme, token) = value
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| ServiceError::MalformedInput("Missing credentials token".to_string()))?;

        if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
            return Err(ServiceError::MalformedInput(format!(
                "Unsupported authorization scheme: {scheme}"
            )));
        }

        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|e| ServiceError::MalformedInput(format!("Invalid base64 token: {e}")))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| ServiceError::MalformedInput(format!("Token is not UTF-8: {e}")))?;

        let (username, password) = decoded.split_once(':').ok_or_else(|| {
            ServiceError::MalformedInput("Token has no username/password separator".to_string())
        })?;

        if username.is_empty() {
            return Err(ServiceError::MalformedInput("Empty username".to_string()));
        }

        Ok(Self::new(username, password))
    }

    /// ## Summary
    /// Encodes the credentials as an HTTP Basic `Authorization` header value.
    #[must_use]
    pub fn to_basic_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("{BASIC_SCHEME} {token}")
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
