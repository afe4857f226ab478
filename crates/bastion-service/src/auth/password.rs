use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};

use bastion_core::config::HasherConfig;

use crate::error::{ServiceError, ServiceResult};

/// Plaintext hashed once at startup so that unknown usernames cost as much as wrong passwords.
const DUMMY_PASSWORD: &str = "bastion-timing-equalizer";

/// A salted one-way password hash in PHC string format.
///
/// The string carries the algorithm tag, cost parameters, salt and digest,
/// e.g. `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedValue(String);

impl HashedValue {
    /// ## Summary
    /// Wraps a stored PHC string. The value is not validated here; a
    /// malformed hash simply never verifies.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ## Summary
    /// Returns the algorithm tag (e.g. `argon2id`), if the value has one.
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.0
            .strip_prefix('$')
            .and_then(|rest| rest.split('$').next())
            .filter(|tag| !tag.is_empty())
    }
}

impl std::fmt::Debug for HashedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HashedValue")
            .field(&self.algorithm().unwrap_or("<unknown>"))
            .finish()
    }
}

/// ## Summary
/// Argon2id password hasher with a configurable cost factor.
///
/// Hashing and verification are CPU-bound; async callers should run them
/// through `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy: HashedValue,
}

impl PasswordHasher {
    /// ## Summary
    /// Builds a hasher from the configured Argon2 cost parameters.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if the parameters are out of range.
    pub fn new(config: &HasherConfig) -> ServiceResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| ServiceError::InvalidConfiguration(format!("Invalid hasher cost: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy = hash_with(&argon2, DUMMY_PASSWORD)?;

        tracing::debug!(
            memory_kib = config.memory_kib,
            iterations = config.iterations,
            parallelism = config.parallelism,
            "Password hasher configured"
        );

        Ok(Self { argon2, dummy })
    }

    /// ## Summary
    /// Hashes a password with a fresh random salt.
    ///
    /// ## Errors
    /// Returns `StoreUnavailable` if the hash cannot be computed.
    pub fn hash(&self, plaintext: &str) -> ServiceResult<HashedValue> {
        hash_with(&self.argon2, plaintext)
    }

    /// ## Summary
    /// Verifies a password against a stored hash in constant time, using the
    /// salt and parameters embedded in the hash.
    ///
    /// Returns `false` for a malformed hash instead of failing.
    #[must_use]
    pub fn verify(&self, plaintext: &str, hashed: &HashedValue) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed.as_str()) else {
            tracing::warn!("Stored password hash is malformed");
            return false;
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .map_err(|err| tracing::trace!("Password verification failed: {}", err))
            .is_ok()
    }

    /// ## Summary
    /// Performs a verification whose outcome is discarded. Used on the
    /// unknown-user path so both failure paths take the same time.
    pub fn dummy_verify(&self, plaintext: &str) {
        let _matched = self.verify(plaintext, &self.dummy);
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> ServiceResult<HashedValue> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| ServiceError::StoreUnavailable(format!("Failed to hash password: {e}")))?;

    Ok(HashedValue(password_hash.to_string()))
}

/// Cheap hasher for tests; the default cost makes suites needlessly slow.
#[cfg(test)]
pub(crate) fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(&HasherConfig {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    })
    .expect("test cost parameters are valid")
}
