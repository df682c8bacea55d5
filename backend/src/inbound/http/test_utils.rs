//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::inbound::http::state::{HttpState, HttpStateAdapters};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::verification::{HostAllowListVerifier, SizeThresholdClassifier};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state wired to real services over a fresh in-memory store.
pub fn memory_state() -> (HttpState, InMemoryStore) {
    let store = InMemoryStore::new();
    let shared = Arc::new(store.clone());
    let state = HttpState::from_adapters(HttpStateAdapters {
        users: shared.clone(),
        ledger: shared.clone(),
        documents: shared,
        verifier: Arc::new(HostAllowListVerifier),
        classifier: Arc::new(SizeThresholdClassifier::default()),
        clock: Arc::new(DefaultClock),
    });
    (state, store)
}

/// Log in with the fixture credentials and return the session cookie.
pub async fn login_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": "admin", "password": "password" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "fixture login succeeds");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Log in and accept the terms so gated endpoints become reachable.
pub async fn accepted_terms_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let cookie = login_cookie(app).await;
    let request = actix_test::TestRequest::put()
        .uri("/api/v1/users/me/terms")
        .cookie(cookie.clone())
        .set_json(json!({ "hasAcceptedTerms": true }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "terms accepted");
    cookie
}

/// Decode a JSON response body.
pub async fn read_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("response JSON")
}
