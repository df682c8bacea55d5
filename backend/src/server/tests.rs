//! Server bootstrap: readiness signalling and the assembled app.

use super::*;
use std::net::SocketAddr;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn config() -> ServerConfig {
    ServerConfig::new(
        Key::generate(),
        false,
        SameSite::Lax,
        SocketAddr::from(([127, 0, 0, 1], 0)),
    )
}

fn dependencies(health_state: web::Data<HealthState>, config: &ServerConfig) -> AppDependencies {
    AppDependencies {
        health_state,
        http_state: build_http_state(config),
        key: config.key.clone(),
        cookie_secure: config.cookie_secure,
        same_site: config.same_site,
    }
}

async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("response JSON")
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, config: ServerConfig) {
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(health_state.clone(), config).expect("server should bind");

    assert!(health_state.is_ready(), "binding should mark readiness");
}

#[rstest]
#[actix_web::test]
async fn health_checks_are_mounted_outside_the_api(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) {
    health_state.mark_ready();
    let app = actix_test::init_service(build_app(dependencies(health_state, &config))).await;

    for uri in ["/health/ready", "/health/live"] {
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(response.headers().contains_key("trace-id"), "{uri}");
    }
}

#[rstest]
#[actix_web::test]
async fn fan_journey_through_the_assembled_app(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) {
    let app = actix_test::init_service(build_app(dependencies(health_state, &config))).await;

    let login_response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "admin", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(login_response.status(), StatusCode::OK);
    let cookie = login_response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));

    let terms = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/me/terms")
            .cookie(cookie.clone())
            .set_json(json!({ "hasAcceptedTerms": true }))
            .to_request(),
    )
    .await;
    assert_eq!(terms.status(), StatusCode::OK);

    let award = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/points/award")
            .cookie(cookie.clone())
            .set_json(json!({ "points": 10, "action": "PROFILE_UPDATE" }))
            .to_request(),
    )
    .await;
    assert_eq!(json_body(award).await["balance"], 10);

    let points = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/points/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let points = json_body(points).await;
    assert_eq!(points["points"], 10);
    assert_eq!(points["pointsHistory"][0]["action"], "PROFILE_UPDATE");
}

#[cfg(debug_assertions)]
#[rstest]
#[actix_web::test]
async fn openapi_document_is_served_in_debug_builds(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) {
    let app = actix_test::init_service(build_app(dependencies(health_state, &config))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let spec = json_body(response).await;
    assert!(spec["paths"]["/api/v1/points/award"].is_object());
}
