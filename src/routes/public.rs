use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Defines the page surface of the host application: the two public routes,
/// the auth entry pages, the fixed redirect destinations, and the dynamic
/// per-role landing page.
///
/// Note on ordering: axum resolves static routes before the `/{role}`
/// capture, so `/sign-in`, `/unauthorized` etc. are never swallowed by the
/// role landing route.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        // GET /_health
        // A simple endpoint used for monitoring and load balancer checks.
        // The leading underscore puts it on the internal side of the route
        // matcher, so probes are never bounced to /sign-in.
        .route("/_health", get(|| async { "ok" }))
        // GET /
        // Anonymous landing page; in the public-route set.
        .route("/", get(handlers::landing))
        // GET /sign-in
        // Auth entry page; in the public-route set. Signed-in users are
        // redirected to /{role} before this handler runs.
        .route("/sign-in", get(handlers::sign_in))
        // GET /sign-up
        // Auth entry page, but NOT public: anonymous requests are bounced to
        // /sign-in by the gate first.
        .route("/sign-up", get(handlers::sign_up))
        // GET /unauthorized
        // Destination for authenticated sessions without a usable role.
        .route("/unauthorized", get(handlers::unauthorized))
        // GET /error
        // Destination when the identity provider fetch failed.
        .route("/error", get(handlers::error_page))
        // GET /{role}
        // Per-role landing page (e.g. /admin, /editor). Role values reaching
        // a redirect have already passed the URL-segment allowlist.
        .route("/{role}", get(handlers::role_home))
}
