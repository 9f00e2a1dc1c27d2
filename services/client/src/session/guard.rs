//! services/client/src/session/guard.rs
//!
//! Decides what a protected view should do given the current session state.

use crate::session::store::SessionSnapshot;

/// The three possible renderings of a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The session store has not finished its initial check yet.
    Loading,
    /// Not signed in; send the user to the login view, remembering where
    /// they were headed so a successful login can return them there.
    RedirectToLogin { return_to: String },
    /// Signed in; render the requested view.
    Render,
}

/// A pure function of the session snapshot and the requested location.
///
/// The guard never consults token storage directly; an invalid persisted
/// token has already been resolved to an unauthenticated snapshot by the
/// store's own initialization.
pub fn guard_route(snapshot: &SessionSnapshot, requested_path: &str) -> RouteDecision {
    if !snapshot.initialized {
        return RouteDecision::Loading;
    }
    if !snapshot.authenticated {
        return RouteDecision::RedirectToLogin {
            return_to: requested_path.to_string(),
        };
    }
    RouteDecision::Render
}
