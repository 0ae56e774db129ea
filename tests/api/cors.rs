use reqwest::Method;

use crate::helpers::{TestSettings, spawn_app, spawn_app_with};
use studio_api::{configuration::Environment, cors::UnmatchedOrigin};

#[tokio::test]
async fn an_allowed_origin_is_echoed() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/api/health", &app.address))
        .header("Origin", "https://noveloper.ai")
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://noveloper.ai"
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn a_subdomain_origin_is_echoed() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/api/health", &app.address))
        .header("Origin", "https://preview.noveloper.ai")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://preview.noveloper.ai"
    );
}

#[tokio::test]
async fn an_unknown_origin_gets_no_allow_origin_header() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/api/health", &app.address))
        .header("Origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();

    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn the_permissive_fallback_answers_with_a_wildcard_and_no_credentials() {
    let app = spawn_app_with(TestSettings {
        unmatched_origin: UnmatchedOrigin::AllowAny,
        ..Default::default()
    })
    .await;

    let response = app
        .api_client
        .get(format!("{}/api/health", &app.address))
        .header("Origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .is_none()
    );
}

#[tokio::test]
async fn a_request_without_origin_is_not_blocked() {
    let app = spawn_app().await;

    let response = app.get("/api/health").await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn preflight_requests_get_204_without_a_body() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .request(Method::OPTIONS, format!("{}/api/contact", &app.address))
        .header("Origin", "https://noveloper.ai")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(204, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://noveloper.ai"
    );
    assert!(response.headers().get("access-control-allow-methods").is_some());
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn preflight_is_answered_for_paths_without_a_route() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .request(Method::OPTIONS, format!("{}/api/anything", &app.address))
        .header("Origin", "https://noveloper.ai")
        .send()
        .await
        .unwrap();

    assert_eq!(204, response.status().as_u16());
}

#[tokio::test]
async fn security_headers_are_only_added_in_production() {
    let local = spawn_app().await;
    let production = spawn_app_with(TestSettings {
        environment: Environment::Production,
        ..Default::default()
    })
    .await;

    let local_response = local.get("/api/health").await;
    let production_response = production.get("/api/health").await;

    assert!(local_response.headers().get("x-frame-options").is_none());
    assert_eq!(production_response.headers()["x-frame-options"], "DENY");
    assert!(
        production_response
            .headers()
            .get("content-security-policy")
            .is_some()
    );
}
