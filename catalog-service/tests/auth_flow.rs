mod support;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common_auth::Role;
use serde_json::json;
use support::TestApp;

#[tokio::test]
async fn register_defaults_to_seller_and_returns_token() {
    let app = TestApp::new();
    let (status, body) = app.register("alice", "wonderland", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["roles"], json!(["ROLE_SELLER"]));
    assert!(body["id"].as_i64().is_some());

    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    let claims = app.codec.verify(token).unwrap();
    assert_eq!(claims.subject, "alice");
    assert_eq!(claims.roles, vec![Role::Seller]);
}

#[tokio::test]
async fn register_with_admin_role() {
    let app = TestApp::new();
    let (status, body) = app.register("root", "hunter22", Some("ADMIN")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["roles"], json!(["ROLE_ADMIN"]));
}

#[tokio::test]
async fn register_rejects_duplicates_and_blank_input() {
    let app = TestApp::new();
    assert_eq!(app.register("alice", "pw", None).await.0, StatusCode::CREATED);

    let (status, body) = app.register("alice", "other", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["path"], "/user/register");

    assert_eq!(app.register("  ", "pw", None).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(app.register("bob", "", None).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(app.register("bob", "pw", Some("ROOT")).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn padded_username_logs_in_after_register() {
    let app = TestApp::new();
    let (status, body) = app.register(" alice ", "wonderland", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");

    for name in [" alice ", "alice", "\talice"] {
        let (status, body) = app.login(name, "wonderland").await;
        assert_eq!(status, StatusCode::OK, "{name:?}: {body}");
        assert_eq!(body["username"], "alice");
    }
}

#[tokio::test]
async fn login_issues_fresh_token() {
    let app = TestApp::new();
    app.register("alice", "wonderland", None).await;

    let (status, body) = app.login("alice", "wonderland").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["roles"], json!(["ROLE_SELLER"]));
    let claims = app.codec.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.subject, "alice");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();
    app.register("alice", "wonderland", None).await;

    let (wrong_status, wrong) = app.login("alice", "looking-glass").await;
    let (unknown_status, unknown) = app.login("mallory", "wonderland").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["message"], "Invalid username or password");
    assert_eq!(wrong["message"], unknown["message"]);
    assert_eq!(wrong["status"], unknown["status"]);
    assert_eq!(wrong["path"], unknown["path"]);
}

#[tokio::test]
async fn seller_can_create_product_but_not_delete_category() {
    let app = TestApp::new();
    let admin = app.token_for("root", "ADMIN").await;
    let seller = app.token_for("alice", "SELLER").await;

    let (status, category) = app
        .send(
            Method::POST,
            "/api/categories",
            Some(&admin),
            Some(json!({ "name": "lamps" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, product) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&seller),
            Some(json!({
                "name": "desk lamp",
                "description": "brass",
                "price": 49.5,
                "categoryId": category_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["categoryId"], category_id);
    assert_eq!(product["price"], 49.5);

    let uri = format!("/api/categories/{category_id}");
    let (status, body) = app.send(Method::DELETE, &uri, Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access Denied");
    assert_eq!(body["status"], 403);
    assert_eq!(body["path"], uri);
    assert!(body["timestamp"].is_string());

    // denial happened before the store was touched
    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn expired_token_is_rejected_on_protected_route() {
    let app = TestApp::new();
    let stale = app
        .codec
        .issue_at("alice", &[Role::Seller], Utc::now() - Duration::seconds(121))
        .unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&stale),
            Some(json!({ "name": "x", "price": 1.0, "categoryId": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication token has expired");
    assert_eq!(body["path"], "/api/products");
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::DELETE, "/api/products/1", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Full authentication is required to access this resource"
    );
}

#[tokio::test]
async fn tampered_token_is_rejected_even_on_public_read() {
    let app = TestApp::new();
    let token = app.token_for("alice", "SELLER").await;
    let mut chars: Vec<char> = token.chars().collect();
    let idx = chars.len() - 5;
    chars[idx] = if chars[idx] == 'x' { 'y' } else { 'x' };
    let forged: String = chars.into_iter().collect();

    let (status, body) = app.send(Method::GET, "/api/products", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn token_roles_are_a_snapshot() {
    let app = TestApp::new();
    // Identity does not exist in the store; the verified token alone is trusted.
    let token = app.codec.issue("ghost", &[Role::Admin]).unwrap();
    let (status, _) = app
        .send(
            Method::POST,
            "/api/categories",
            Some(&token),
            Some(json!({ "name": "spooky" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
