//! API Integration Tests
//!
//! Drive the full router over the in-memory repositories.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use statement_ledger::api::{self, InMemoryAppState};
use statement_ledger::auth::TokenService;

fn test_app() -> Router {
    let tokens = TokenService::new(b"integration-test-secret", Duration::hours(1));
    api::create_router(InMemoryAppState::in_memory(tokens))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user and open a session, returning the bearer token
async fn sign_in(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        post_json(
            "/api/v1/users",
            None,
            json!({ "name": "John Due", "email": email, "password": "123456" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "User creation failed");

    let (status, body) = send(
        app,
        post_json("/api/v1/sessions", None, json!({ "email": email, "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Session creation failed");

    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =========================================================================
// Users and sessions
// =========================================================================

#[tokio::test]
async fn test_session_returns_user_and_token() {
    let app = test_app();
    let _ = sign_in(&app, "john.due@email.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/sessions",
            None,
            json!({ "email": "john.due@email.com", "password": "123456" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "john.due@email.com");
    assert_eq!(body["user"]["name"], "John Due");
    assert!(body["user"].get("password").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_session_rejects_bad_credentials() {
    let app = test_app();
    let _ = sign_in(&app, "john.due@email.com").await;

    let (status, wrong_password) = send(
        &app,
        post_json(
            "/api/v1/sessions",
            None,
            json!({ "email": "john.due@email.com", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], "Incorrect email or password");

    let (status, unknown_email) = send(
        &app,
        post_json(
            "/api/v1/sessions",
            None,
            json!({ "email": "nobody@email.com", "password": "123456" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, wrong_password);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = test_app();
    let _ = sign_in(&app, "john.due@email.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/users",
            None,
            json!({ "name": "Other", "email": "john.due@email.com", "password": "abcdef" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn test_profile() {
    let app = test_app();
    let token = sign_in(&app, "john.due@email.com").await;

    let (status, body) = send(&app, get("/api/v1/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "john.due@email.com");
    assert!(body.get("password").is_none());

    let (status, body) = send(&app, get("/api/v1/profile", Some("invalid-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "JWT invalid token!");

    let (status, body) = send(&app, get("/api/v1/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "JWT token is missing!");
}

// =========================================================================
// Statements
// =========================================================================

#[tokio::test]
async fn test_deposit_and_withdraw() {
    let app = test_app();
    let token = sign_in(&app, "john.due@email.com").await;

    let (status, deposit) = send(
        &app,
        post_json(
            "/api/v1/statements/deposit",
            Some(&token),
            json!({ "description": "deposit of 300", "amount": 123.45 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deposit["type"], "deposit");
    assert_eq!(deposit["amount"], 123.45);
    assert_eq!(deposit["description"], "deposit of 300");

    let (status, withdraw) = send(
        &app,
        post_json(
            "/api/v1/statements/withdraw",
            Some(&token),
            json!({ "description": "groceries", "amount": "23.45" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(withdraw["type"], "withdraw");
    assert_eq!(withdraw["amount"], 23.45);
    assert_eq!(withdraw["user_id"], deposit["user_id"]);
}

#[tokio::test]
async fn test_withdraw_insufficient_funds() {
    let app = test_app();
    let token = sign_in(&app, "john.due@email.com").await;

    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/statements/deposit",
            Some(&token),
            json!({ "description": "salary", "amount": 100 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/statements/withdraw",
            Some(&token),
            json!({ "description": "rent", "amount": 300 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient funds");

    let (_, balance) = send(&app, get("/api/v1/statements/balance", Some(&token))).await;
    assert_eq!(balance["balance"], 100.0);
    assert_eq!(balance["statement"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_amount_rejected() {
    let app = test_app();
    let token = sign_in(&app, "john.due@email.com").await;

    for amount in [json!(0), json!(-10), json!(1.005)] {
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/statements/deposit",
                Some(&token),
                json!({ "description": "bad", "amount": amount }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {} accepted", amount);
        assert_eq!(body["error_code"], "invalid_amount");
    }
}

#[tokio::test]
async fn test_malformed_bodies_rejected_as_json() {
    let app = test_app();
    let token = sign_in(&app, "john.due@email.com").await;

    let bodies = [
        json!({ "description": "x", "amount": "abc" }).to_string(),
        json!({ "amount": 10 }).to_string(),
        "not json".to_string(),
    ];

    for body in bodies {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/statements/deposit")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(body.clone()))
            .unwrap();

        let (status, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(json["error_code"], "invalid_request", "body {:?}", body);
        assert_eq!(json["message"], "Invalid request");
    }

    let (status, json) = send(&app, post_json("/api/v1/sessions", None, json!({ "email": "a@b.c" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_request");

    let (_, balance) = send(&app, get("/api/v1/statements/balance", Some(&token))).await;
    assert_eq!(balance["statement"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_balance() {
    let app = test_app();
    let token = sign_in(&app, "john.due@email.com").await;

    for (kind, amount) in [("deposit", 950.35), ("withdraw", 420.10)] {
        let (status, _) = send(
            &app,
            post_json(
                &format!("/api/v1/statements/{}", kind),
                Some(&token),
                json!({ "description": kind, "amount": amount }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get("/api/v1/statements/balance", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 530.25);

    let entries = body["statement"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["type"], "deposit");
    assert_eq!(entries[1]["type"], "withdraw");
    assert!(entries[0].get("user_id").is_none());
}

#[tokio::test]
async fn test_get_statement() {
    let app = test_app();
    let owner = sign_in(&app, "john.due@email.com").await;
    let stranger = sign_in(&app, "jane.due@email.com").await;

    let (_, deposit) = send(
        &app,
        post_json(
            "/api/v1/statements/deposit",
            Some(&owner),
            json!({ "description": "deposit of 300", "amount": 300 }),
        ),
    )
    .await;
    let uri = format!("/api/v1/statements/{}", deposit["id"].as_str().unwrap());

    let (status, body) = send(&app, get(&uri, Some(&owner))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], deposit["id"]);
    assert_eq!(body["amount"], 300.0);

    let (status, body) = send(&app, get(&uri, Some(&stranger))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Statement not found");

    let (status, body) = send(
        &app,
        get(&format!("/api/v1/statements/{}", uuid::Uuid::new_v4()), Some(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Statement not found");

    let (status, _) = send(&app, get("/api/v1/statements/not-a-uuid", Some(&owner))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "JWT token is missing!");
}

#[tokio::test]
async fn test_correlation_id_echoed() {
    let app = test_app();
    let correlation_id = uuid::Uuid::new_v4().to_string();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/sessions")
        .header("content-type", "application/json")
        .header("x-correlation-id", &correlation_id)
        .body(Body::from(json!({ "email": "a@b.c", "password": "x" }).to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(
        response.headers().get("x-correlation-id").unwrap().to_str().unwrap(),
        correlation_id
    );
}
