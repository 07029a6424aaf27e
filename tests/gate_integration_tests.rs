use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use role_gate::{
    AppConfig, AppState, MockIdentityProvider, create_router, identity::IdentityState,
    models::SessionInfo,
};
use std::sync::Arc;
use tower::util::ServiceExt;

// --- Test Scaffolding ---

/// Builds the full application router around a mock identity provider.
/// Everything below exercises the real router, real middleware stack, and
/// real handlers; only the provider boundary is substituted.
fn app(provider: MockIdentityProvider) -> Router {
    let state = AppState {
        identity: Arc::new(provider) as IdentityState,
        config: AppConfig::default(),
    };
    create_router(state)
}

/// Issues a GET for `path`, optionally carrying a session cookie.
async fn get(router: &Router, path: &str, session: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(path);
    if let Some(identity) = session {
        builder = builder.header(header::COOKIE, format!("__session={identity}"));
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("expected a redirect Location header")
        .to_str()
        .unwrap()
}

// --- Anonymous Requests ---

#[tokio::test]
async fn anonymous_request_to_public_routes_passes_through() {
    let router = app(MockIdentityProvider::new());

    for path in ["/", "/sign-in"] {
        let response = get(&router, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn anonymous_request_to_protected_route_redirects_to_sign_in() {
    let router = app(MockIdentityProvider::new());

    for path in ["/sign-up", "/editor", "/admin/settings", "/api/session"] {
        let response = get(&router, path, None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "path {path}");
        assert_eq!(location(&response), "/sign-in", "path {path}");
    }
}

#[tokio::test]
async fn static_assets_and_internal_paths_are_not_intercepted() {
    let router = app(MockIdentityProvider::new());

    // No route serves these files, so the untouched pass-through surfaces as
    // a plain 404 rather than a redirect.
    let response = get(&router, "/favicon.ico", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The health probe sits on the internal side of the matcher and answers
    // without any session.
    let response = get(&router, "/_health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// --- Provider Failure ---

#[tokio::test]
async fn provider_fetch_failure_redirects_to_error() {
    let router = app(MockIdentityProvider::new_failing());

    let response = get(&router, "/editor", Some("user_1")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/error");
}

// --- Role Resolution ---

#[tokio::test]
async fn session_without_role_redirects_to_unauthorized() {
    let router = app(MockIdentityProvider::new().with_user("user_1", None));

    let response = get(&router, "/editor", Some("user_1")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/unauthorized");
}

#[tokio::test]
async fn signed_in_user_is_bounced_from_entry_pages_to_role_landing() {
    let router = app(MockIdentityProvider::new().with_user("user_1", Some("admin")));

    for path in ["/", "/sign-in", "/sign-up"] {
        let response = get(&router, path, Some("user_1")).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "path {path}");
        assert_eq!(location(&response), "/admin", "path {path}");
    }
}

#[tokio::test]
async fn non_admin_is_redirected_away_from_admin_section() {
    let router = app(MockIdentityProvider::new().with_user("user_1", Some("editor")));

    let response = get(&router, "/admin/settings", Some("user_1")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/editor");
}

#[tokio::test]
async fn admin_reaches_the_admin_section() {
    let router = app(MockIdentityProvider::new().with_user("user_1", Some("admin")));

    let response = get(&router, "/admin/settings", Some("user_1")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn role_landing_page_passes_through_for_its_owner() {
    let router = app(MockIdentityProvider::new().with_user("user_1", Some("editor")));

    let response = get(&router, "/editor", Some("user_1")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malicious_role_value_never_reaches_a_redirect_url() {
    // A provider-side role crafted to escape its path segment is treated as
    // no role at all.
    let router = app(MockIdentityProvider::new().with_user("user_1", Some("//evil.example")));

    let response = get(&router, "/dashboard", Some("user_1")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/unauthorized");
}

// --- API Surface ---

#[tokio::test]
async fn api_session_reports_the_resolved_identity_and_role() {
    let router = app(MockIdentityProvider::new().with_user("user_9", Some("editor")));

    let response = get(&router, "/api/session", Some("user_9")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let info: SessionInfo = serde_json::from_slice(&body).unwrap();
    assert_eq!(info.identity, "user_9");
    assert_eq!(info.role.as_deref(), Some("editor"));
}

// --- Idempotence ---

#[tokio::test]
async fn repeated_evaluation_yields_identical_outcomes() {
    let router = app(MockIdentityProvider::new().with_user("user_1", Some("editor")));

    let first = get(&router, "/admin/reports", Some("user_1")).await;
    let second = get(&router, "/admin/reports", Some("user_1")).await;

    assert_eq!(first.status(), second.status());
    assert_eq!(location(&first), location(&second));
    assert_eq!(location(&first), "/editor");
}
