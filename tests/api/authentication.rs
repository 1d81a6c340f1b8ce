use crate::helpers::spawn_app;

#[tokio::test]
async fn protected_endpoints_require_a_token() {
    let app = spawn_app().await;

    for path in ["/classes", "/classes/1", "/user/profile", "/classes/1/attendance-sheet"] {
        let response = app.get_with_token(path, None).await;
        assert_eq!(response.status().as_u16(), 401, "{} accepted a missing token", path);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Access token required");
    }
}

#[tokio::test]
async fn forged_tokens_are_forbidden() {
    let app = spawn_app().await;

    let response = app.get_with_token("/classes", Some("not.a.jwt")).await;

    assert_eq!(response.status().as_u16(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn expired_tokens_are_unauthorized() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let profile = teacher.client.profile().await.unwrap();
    let expired = app
        .expired_keys()
        .generate_token(profile.id, &profile.email)
        .unwrap();

    let response = app.get_with_token("/user/profile", Some(&expired)).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn check_in_endpoints_are_open() {
    let app = spawn_app().await;

    let response = app.get_with_token("/attendance/class/1", None).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(body.is_empty());
}
