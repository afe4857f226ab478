//! Depot helpers for passing the authentication outcome to downstream handlers.

use super::principal::Principal;

pub mod depot_keys {
    pub const AUTHENTICATED_PRINCIPAL: &str = "__authenticated_principal";
}

/// What the authentication middleware established for the current request.
#[derive(Debug, Clone)]
pub enum DepotPrincipal {
    Authenticated(Principal),
    Anonymous,
}

impl DepotPrincipal {
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            Self::Anonymous => None,
        }
    }
}

/// Get the authenticated principal from the depot.
///
/// Returns `None` for anonymous requests and when the authentication
/// middleware did not run.
#[must_use]
pub fn get_principal_from_depot(depot: &salvo::Depot) -> Option<&Principal> {
    depot
        .get::<DepotPrincipal>(depot_keys::AUTHENTICATED_PRINCIPAL)
        .ok()
        .and_then(DepotPrincipal::principal)
}

/// Check if the request is from an authenticated principal.
#[must_use]
pub fn is_authenticated(depot: &salvo::Depot) -> bool {
    get_principal_from_depot(depot).is_some()
}
