use std::collections::BTreeSet;

use anyhow::Result;
use config::{Config, ConfigBuilder, FileFormat, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    ADMIN_ROUTE_PATTERN, DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB,
    DEFAULT_HASH_PARALLELISM, MAX_USERNAME_LENGTH, USERS_ROUTE_PREFIX,
};
use crate::error::{CoreError, CoreResult};
use crate::pattern::PathPattern;
use crate::types::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub hasher: HasherConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default = "default_users")]
    pub users: Vec<SeedUserConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u8,
}

// The URL may embed database credentials.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HasherConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Ordered authorization rules. Order is significant: the first match wins.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    pub rules: Vec<RuleConfig>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleConfig {
                    pattern: USERS_ROUTE_PREFIX.to_string(),
                    roles: BTreeSet::from([Role::User]),
                },
                RuleConfig {
                    pattern: ADMIN_ROUTE_PATTERN.to_string(),
                    roles: BTreeSet::from([Role::Admin]),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub roles: BTreeSet<Role>,
}

/// A user provisioned into the credential store at startup.
///
/// Exactly one of `password` (plaintext, hashed at startup) or
/// `password_hash` (a PHC string, e.g. from the `hash_password` binary) is set.
#[derive(Clone, Deserialize)]
pub struct SeedUserConfig {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
    pub roles: BTreeSet<Role>,
}

impl std::fmt::Debug for SeedUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUserConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("roles", &self.roles)
            .finish()
    }
}

fn default_users() -> Vec<SeedUserConfig> {
    vec![
        SeedUserConfig {
            username: "in28minutes".to_string(),
            password: Some("dummy".to_string()),
            password_hash: None,
            roles: BTreeSet::from([Role::User]),
        },
        SeedUserConfig {
            username: "admin".to_string(),
            password: Some("dummy".to_string()),
            password_hash: None,
            roles: BTreeSet::from([Role::Admin, Role::User]),
        },
    ]
}

const fn default_max_connections() -> u8 {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("store.backend", "memory")?
            .set_default("logging.level", "debug")?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder.build()?.try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Loads configuration from environment variables and `config.toml` into a `Settings`.
    /// Environment variables take precedence over `config.toml` values.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load() -> Result<Self> {
        Self::finish(
            Self::builder()?
                // TOML file
                .add_source(config::File::with_name("config.toml").required(false))
                // Env, e.g. BASTION_STORE__BACKEND=postgres
                .add_source(
                    config::Environment::with_prefix("BASTION")
                        .prefix_separator("_")
                        .separator("__")
                        .ignore_empty(true)
                        .try_parsing(true),
                ),
        )
    }

    /// ## Summary
    /// Builds a `Settings` from defaults overlaid with a TOML document.
    ///
    /// ## Errors
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_toml(source: &str) -> Result<Self> {
        Self::finish(Self::builder()?.add_source(config::File::from_str(source, FileFormat::Toml)))
    }

    /// ## Summary
    /// Checks everything that would otherwise fail at request time: rule
    /// patterns, empty role sets, seed users and backend prerequisites.
    ///
    /// ## Errors
    /// Returns `ValidationError` or `ConfigError` describing the first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        for rule in &self.policy.rules {
            rule.pattern.parse::<PathPattern>()?;
            if rule.roles.is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "Rule '{}' must require at least one role",
                    rule.pattern
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err(CoreError::ValidationError(
                    "Seed users must have a username".to_string(),
                ));
            }
            if user.username.chars().count() > MAX_USERNAME_LENGTH {
                return Err(CoreError::ValidationError(format!(
                    "Seed user '{}' exceeds {MAX_USERNAME_LENGTH} characters",
                    user.username
                )));
            }
            if user.roles.is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "Seed user '{}' must have at least one role",
                    user.username
                )));
            }
            if user.password.is_some() == user.password_hash.is_some() {
                return Err(CoreError::ValidationError(format!(
                    "Seed user '{}' needs exactly one of password or password_hash",
                    user.username
                )));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(CoreError::ValidationError(format!(
                    "Seed user '{}' is declared more than once",
                    user.username
                )));
            }
        }

        if self.store.backend == StoreBackend::Postgres && self.store.url.is_none() {
            return Err(CoreError::ConfigError(
                "store.url is required for the postgres backend".to_string(),
            ));
        }

        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let settings = Settings::load()?;
    tracing::debug!(
        rules = settings.policy.rules.len(),
        seed_users = settings.users.len(),
        "Settings validated"
    );
    Ok(settings)
}
