use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the routes under the `/admin` section.
///
/// Access Control:
/// No role check happens inside these handlers. The gate middleware wrapping
/// the whole router enforces that any authenticated session with
/// `role != "admin"` asking for a path under `/admin` is redirected to its
/// own landing page before dispatch reaches this module.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // The admin landing page. Static routes win over the `/{role}`
        // capture, so an admin's role landing target resolves here.
        .route("/", get(handlers::admin_home))
        // GET /admin/settings
        // Administrative configuration page; the representative protected
        // resource inside the admin section.
        .route("/settings", get(handlers::admin_settings))
}
