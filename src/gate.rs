use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    identity::IdentityState,
    models::SessionIdentity,
};

// --- Boundary Constants ---

/// Paths reachable without an authenticated session.
pub const PUBLIC_ROUTES: &[&str] = &["/", "/sign-in"];

/// Paths that bounce an already-authenticated user to their role landing page.
const AUTH_ENTRY_ROUTES: &[&str] = &["/sign-in", "/sign-up", "/"];

/// Fixed redirect targets.
pub const SIGN_IN_PATH: &str = "/sign-in";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const ERROR_PATH: &str = "/error";

/// File extensions treated as static assets and excluded from the gate.
const STATIC_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "json", "jpg", "jpeg", "png", "svg", "ico", "woff", "woff2",
];

/// Prefixes that are always gated, regardless of extension.
const GATED_PREFIXES: &[&str] = &["/api", "/trpc"];

// --- Route Matcher (Boundary Contract) ---

/// is_gated
///
/// Decides which paths this gate intercepts at all. Mirrors the host's route
/// matcher contract:
/// - API-prefixed paths (`/api`, `/trpc`) are **always** subject to the gate.
/// - Internal framework paths (a leading `_` segment) and requests for static
///   assets (by extension) bypass the gate entirely and pass through untouched.
/// - Everything else is gated.
pub fn is_gated(path: &str) -> bool {
    if GATED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }

    // Internal framework asset paths, e.g. /_internal/chunk.js
    if path.starts_with("/_") {
        return false;
    }

    // Static assets by file extension on the final path segment.
    if let Some((_, extension)) = path.rsplit_once('.') {
        if STATIC_EXTENSIONS.contains(&extension) {
            return false;
        }
    }

    true
}

// --- Session Resolution ---

/// SessionResolution
///
/// The explicit result of resolving the current request's identity against
/// the external provider, consumed by `evaluate` as a plain branch. This
/// replaces try/catch-around-a-remote-call control flow with a value: the
/// fetch failure is one variant among the normal cases, not an exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResolution {
    /// No session identity was resolvable from the request credentials.
    Anonymous,
    /// An identity was present but the provider's profile fetch failed.
    /// The failure has already been logged where it occurred.
    FetchFailed,
    /// An identity was present and its profile was fetched. `role` is `None`
    /// when the profile metadata carries no (or an empty) role.
    Authenticated {
        identity: SessionIdentity,
        role: Option<String>,
    },
}

/// CurrentSession
///
/// Request-extension payload inserted by the gate on an authenticated
/// pass-through, so downstream handlers (e.g. `/api/session`) can read the
/// resolved identity without a second provider round-trip.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub identity: SessionIdentity,
    pub role: Option<String>,
}

/// resolve_session
///
/// Runs the identity provider integration for one request: synchronous
/// identity extraction, then (if a session exists) the single profile fetch.
/// The only failure mode — the fetch — is caught here, logged with context,
/// and folded into the resolution value. No retries, nothing propagates.
pub async fn resolve_session(provider: &IdentityState, headers: &HeaderMap) -> SessionResolution {
    let Some(identity) = provider.session_identity(headers) else {
        return SessionResolution::Anonymous;
    };

    match provider.fetch_profile(&identity).await {
        Ok(profile) => SessionResolution::Authenticated {
            role: profile.role().map(str::to_string),
            identity,
        },
        Err(error) => {
            tracing::error!(
                identity = %identity,
                error = %error,
                "identity provider profile fetch failed"
            );
            SessionResolution::FetchFailed
        }
    }
}

// --- Decision Procedure ---

/// GateOutcome
///
/// Exactly one outcome per gated request: continue processing unmodified, or
/// redirect to one of the fixed destination paths (or a role landing page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Pass,
    Redirect(String),
}

/// is_valid_role_segment
///
/// Allowlist check applied before a role string is interpolated into a
/// redirect URL. Role values come from provider-managed metadata, which is
/// external input as far as URL construction is concerned; restricting them
/// to `[A-Za-z0-9_-]+` rules out open redirects ("//evil.example") and
/// malformed paths ("a/b?x=1").
pub fn is_valid_role_segment(role: &str) -> bool {
    !role.is_empty()
        && role
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// evaluate
///
/// The pure decision procedure, evaluated in order; first match governs.
///
/// 1. Anonymous + public path              -> Pass
/// 2. Anonymous + protected path           -> Redirect /sign-in
/// 3. Profile fetch failed                 -> Redirect /error
/// 4. Authenticated, no usable role        -> Redirect /unauthorized
/// 5. Authenticated on an auth entry page  -> Redirect /{role}
/// 6. Non-admin role under /admin          -> Redirect /{role}
/// 7. Otherwise                            -> Pass
///
/// Stateless: the same (resolution, path) pair always yields the same outcome.
pub fn evaluate(path: &str, resolution: &SessionResolution) -> GateOutcome {
    match resolution {
        SessionResolution::Anonymous => {
            if PUBLIC_ROUTES.contains(&path) {
                GateOutcome::Pass
            } else {
                GateOutcome::Redirect(SIGN_IN_PATH.to_string())
            }
        }

        SessionResolution::FetchFailed => GateOutcome::Redirect(ERROR_PATH.to_string()),

        SessionResolution::Authenticated { role, .. } => {
            // A role that fails the URL-segment allowlist is treated the same
            // as an absent role: the user has no usable classification.
            let role = match role.as_deref().filter(|r| is_valid_role_segment(r)) {
                Some(role) => role,
                None => return GateOutcome::Redirect(UNAUTHORIZED_PATH.to_string()),
            };

            // Signed-in users hitting the entry pages land on their dashboard.
            if AUTH_ENTRY_ROUTES.contains(&path) {
                return GateOutcome::Redirect(format!("/{role}"));
            }

            // Deny escalation: non-admins asking for the admin section are
            // sent to their own landing page instead.
            if path.starts_with("/admin") && role != "admin" {
                return GateOutcome::Redirect(format!("/{role}"));
            }

            GateOutcome::Pass
        }
    }
}

// --- Middleware Wiring ---

/// gate_middleware
///
/// The per-request authorization decision point, applied to the whole router
/// via `middleware::from_fn_with_state`. Stateless across requests: every
/// invocation works only from the request in hand and the shared (immutable)
/// provider handle, so concurrent requests need no coordination.
pub async fn gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Boundary contract: static/internal paths are not this gate's business.
    if !is_gated(&path) {
        return next.run(request).await;
    }

    let resolution = resolve_session(&state.identity, request.headers()).await;

    match evaluate(&path, &resolution) {
        GateOutcome::Pass => {
            // Expose the resolved session to downstream handlers.
            if let SessionResolution::Authenticated { identity, role } = resolution {
                request.extensions_mut().insert(CurrentSession { identity, role });
            }
            next.run(request).await
        }
        GateOutcome::Redirect(target) => {
            tracing::debug!(path = %path, target = %target, "gate redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}
