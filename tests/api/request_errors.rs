use crate::helpers::{spawn_app, spawn_app_with};

async fn error_message(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.expect("error body is JSON");
    assert!(body["timestamp"].is_string());
    body["message"].as_str().expect("message is a string").to_string()
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = spawn_app().await;

    let response = app.post_raw("/auth/login", "{\"email\": ").await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(error_message(response).await.starts_with("Invalid request body"));
}

#[tokio::test]
async fn json_of_the_wrong_shape_is_a_bad_request() {
    let app = spawn_app().await;

    let response = app.post_raw("/attendance", r#"{"classId": [1]}"#).await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(error_message(response).await.starts_with("Invalid request body"));
}

#[tokio::test]
async fn bodies_over_the_configured_limit_are_rejected() {
    let app = spawn_app_with(|c| c.application.max_payload_bytes = 1024).await;
    let body = serde_json::json!({
        "name": "Prof. Teste",
        "email": "grande@escola.edu.br",
        "password": "x".repeat(4096),
    })
    .to_string();

    let response = app.post_raw("/auth/register", body).await;

    assert_eq!(response.status().as_u16(), 413);
    assert!(error_message(response).await.starts_with("Invalid request body"));
}

#[tokio::test]
async fn unparsable_path_ids_are_not_found() {
    let app = spawn_app().await;

    let response = app.get_with_token("/attendance/class/abc", None).await;

    assert_eq!(response.status().as_u16(), 404);
    assert!(error_message(response).await.starts_with("Not found"));
}

#[tokio::test]
async fn unknown_routes_answer_with_the_json_error_body() {
    let app = spawn_app().await;

    let response = app.get_with_token("/no-such-thing", None).await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await, "Not found");
}
