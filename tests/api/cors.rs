use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;

use crate::helpers::{spawn_app, spawn_app_with};

const DASHBOARD_ORIGIN: &str = "http://localhost:5173";

fn allowed_origin(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn preflight_from_another_origin_is_answered() {
    let app = spawn_app().await;

    let response = app.preflight("/auth/login", DASHBOARD_ORIGIN, "POST").await;

    assert!(response.status().is_success(), "{}", response.status());
    let origin = allowed_origin(&response);
    assert!(
        origin == Some(DASHBOARD_ORIGIN) || origin == Some("*"),
        "unexpected allow-origin {:?}",
        origin
    );
}

#[tokio::test]
async fn preflight_for_a_protected_route_needs_no_token() {
    let app = spawn_app().await;

    let response = app.preflight("/attendance/1", DASHBOARD_ORIGIN, "DELETE").await;

    assert!(response.status().is_success(), "{}", response.status());
    assert!(allowed_origin(&response).is_some());
}

#[tokio::test]
async fn cross_origin_responses_carry_the_allow_origin_header() {
    let app = spawn_app().await;

    let response = app
        .http
        .get(format!("{}/attendance/class/1", app.api_url()))
        .header(reqwest::header::ORIGIN, DASHBOARD_ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(allowed_origin(&response).is_some());
}

#[tokio::test]
async fn configured_origins_restrict_cross_origin_access() {
    let app = spawn_app_with(|c| {
        c.application.allowed_origins = vec!["https://ata.example".to_string()];
    })
    .await;

    let allowed = app.preflight("/classes", "https://ata.example", "GET").await;
    assert!(allowed.status().is_success(), "{}", allowed.status());
    assert_eq!(allowed_origin(&allowed), Some("https://ata.example"));

    let refused = app.preflight("/classes", "https://elsewhere.example", "GET").await;
    assert_eq!(allowed_origin(&refused), None);
}
