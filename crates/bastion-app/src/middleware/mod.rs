//! The security chain, in the order it is attached to the router:
//! `frame_options` stamps every response, `authenticate` establishes who is
//! calling and `authorize` decides whether they may reach the path.
//! `require_role` guards individual handlers on top of the path rules.

pub mod authenticate;
pub mod authorize;
pub mod frame_options;
pub mod require_role;

use salvo::http::{StatusCode, header::WWW_AUTHENTICATE};

use bastion_core::constants::BASIC_AUTH_REALM;

/// ## Summary
/// Ends the request with `401 Unauthorized` and a Basic challenge.
pub(crate) fn challenge(res: &mut salvo::Response, ctrl: &mut salvo::FlowCtrl) {
    res.status_code(StatusCode::UNAUTHORIZED);
    if let Err(e) = res.add_header(
        WWW_AUTHENTICATE,
        format!("Basic realm=\"{BASIC_AUTH_REALM}\""),
        true,
    ) {
        tracing::error!(error = %e, "Failed to set WWW-Authenticate header");
    }
    ctrl.skip_rest();
}

/// ## Summary
/// Ends the request with the given status code.
pub(crate) fn reject(res: &mut salvo::Response, ctrl: &mut salvo::FlowCtrl, status: StatusCode) {
    res.status_code(status);
    ctrl.skip_rest();
}
