/// Route component constants shared across crates
pub const USERS_ROUTE_COMPONENT: &str = "users";
pub const USERS_ROUTE_PREFIX: &str = const_str::concat!("/", USERS_ROUTE_COMPONENT);

pub const ADMIN_ROUTE_COMPONENT: &str = "admin";
pub const ADMIN_ROUTE_PREFIX: &str = const_str::concat!("/", ADMIN_ROUTE_COMPONENT);
pub const ADMIN_ROUTE_PATTERN: &str = const_str::concat!(ADMIN_ROUTE_PREFIX, "/**");

pub const WHOAMI_ROUTE_COMPONENT: &str = "whoami";
pub const HEALTHCHECK_ROUTE_COMPONENT: &str = "healthcheck";

/// Longest username accepted, counted in characters. Matches the
/// `users.username` column width.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Prefix used when a role is persisted or presented as an authority string.
pub const ROLE_AUTHORITY_PREFIX: &str = "ROLE_";

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const BASIC_AUTH_REALM: &str = "bastion";

/// Argon2 cost defaults, matching `argon2::Params::DEFAULT_*`.
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;

/// `X-Frame-Options` value sent on every response.
pub const FRAME_OPTIONS_POLICY: &str = "SAMEORIGIN";
