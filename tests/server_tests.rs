use role_gate::{
    AppConfig, AppState, MockIdentityProvider, create_router, identity::IdentityState,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

/// Boots the real HTTP server on an ephemeral port, backed by the mock
/// identity provider, and returns its base address. Exercises the full
/// tower stack (request-id, tracing, CORS) over actual TCP.
async fn spawn_app(provider: MockIdentityProvider) -> TestApp {
    let state = AppState {
        identity: Arc::new(provider) as IdentityState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

/// A client that reports redirects instead of following them, so the gate's
/// decisions stay observable.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(MockIdentityProvider::new()).await;

    let response = client()
        .get(format!("{}/_health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_sign_in() {
    let app = spawn_app(MockIdentityProvider::new()).await;

    let response = client()
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 307);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/sign-in"
    );
}

#[tokio::test]
async fn test_signed_in_admin_lands_on_dashboard() {
    let provider = MockIdentityProvider::new().with_user("user_admin", Some("admin"));
    let app = spawn_app(provider).await;

    // Entry page bounce for an established session.
    let response = client()
        .get(format!("{}/sign-in", app.address))
        .header("cookie", "__session=user_admin")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 307);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/admin"
    );

    // And the landing page itself answers.
    let response = client()
        .get(format!("{}/admin", app.address))
        .header("cookie", "__session=user_admin")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    // Responses carry the correlation header added by the observability stack.
    assert!(response.headers().contains_key("x-request-id"));
}
