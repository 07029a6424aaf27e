use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::Html,
};

use crate::{gate::CurrentSession, models::SessionInfo};

// --- Page Handlers ---
// Minimal destination pages for the gate's redirect targets. Route-to-file
// mapping and static asset serving are out of scope; these exist so every
// outcome of the decision procedure lands somewhere real.

/// landing
///
/// [Public Route] The anonymous landing page at `/`.
pub async fn landing() -> Html<&'static str> {
    Html("<h1>Welcome</h1><p><a href=\"/sign-in\">Sign in</a></p>")
}

/// sign_in
///
/// [Public Route] Entry point of the identity provider's hosted sign-in flow.
/// The actual credential exchange happens provider-side; this page only hosts
/// the embed.
pub async fn sign_in() -> Html<&'static str> {
    Html("<h1>Sign in</h1>")
}

/// sign_up
///
/// Registration counterpart of `sign_in`. Not in the public-route set: an
/// anonymous request for this page is bounced to `/sign-in` by the gate.
pub async fn sign_up() -> Html<&'static str> {
    Html("<h1>Sign up</h1>")
}

/// unauthorized
///
/// Destination for authenticated users whose profile carries no usable role.
pub async fn unauthorized() -> Html<&'static str> {
    Html("<h1>Unauthorized</h1><p>No role is assigned to your account.</p>")
}

/// error_page
///
/// Generic destination when the identity provider could not be reached.
/// The underlying failure is only in the server logs, never shown here.
pub async fn error_page() -> Html<&'static str> {
    Html("<h1>Something went wrong</h1><p>Please try again later.</p>")
}

/// role_home
///
/// The per-role landing page, e.g. `/admin` or `/editor`. The gate redirects
/// signed-in users here from the entry pages.
pub async fn role_home(Path(role): Path<String>) -> Html<String> {
    Html(format!("<h1>{role} dashboard</h1>"))
}

/// admin_home
///
/// [Admin Section] Landing page of the admin area. Admins redirected off the
/// entry pages arrive here via their `/{role}` target, which the router
/// resolves to this static route.
pub async fn admin_home() -> Html<&'static str> {
    Html("<h1>Admin dashboard</h1>")
}

/// admin_settings
///
/// [Admin Section] Only reachable with `role = "admin"`; the gate sends every
/// other role to its own landing page before this handler runs.
pub async fn admin_settings() -> Html<&'static str> {
    Html("<h1>Admin settings</h1>")
}

// --- API Handlers ---

/// session_info
///
/// [API Route] Returns the resolved session for the current request as JSON.
/// The gate inserts `CurrentSession` on every authenticated pass-through;
/// when the extension is absent (the route was reached without the gate, or
/// anonymously) this answers 401 rather than guessing.
pub async fn session_info(
    session: Option<Extension<CurrentSession>>,
) -> Result<Json<SessionInfo>, StatusCode> {
    let Extension(session) = session.ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Json(SessionInfo {
        identity: session.identity.as_str().to_string(),
        role: session.role.clone(),
    }))
}
