use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// API Router Module
///
/// Machine-facing endpoints under `/api`. The route matcher gates this prefix
/// unconditionally — an `/api` path never bypasses the gate via a static
/// asset extension — so every handler here runs only after the decision
/// procedure chose pass-through.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/session
        // Returns the identity and role the gate resolved for this request.
        .route("/session", get(handlers::session_info))
}
