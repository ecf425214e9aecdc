// tests/otp_tests.rs

mod common;

use common::{PASSWORD, TestApp, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn unknown_route_is_404() {
    let app = spawn_app().await;

    let response = app.get("/random_path_that_does_not_exist", None).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn issue_code_returns_expiry_and_mails_code() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/auth/otp",
            None,
            json!({ "email": "A@X.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["expiresIn"], 600);

    let code = app.code_for("a@x.com");
    assert_eq!(code.len(), 6);
    assert!(code.parse::<u32>().unwrap() >= 100_000);
}

#[tokio::test]
async fn missing_password_is_invalid_argument() {
    let app = spawn_app().await;

    let response = app
        .post("/api/auth/otp", None, json!({ "email": "a@x.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "invalid-argument");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn verified_signup_can_log_in_and_cannot_verify_twice() {
    let app = spawn_app().await;
    let token = app.register("cand@x.com").await;

    let response = app.get("/api/users/me", Some(&token)).await;
    assert_eq!(response.status().as_u16(), 200);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["email"], "cand@x.com");
    assert_eq!(profile["role"], "user");
    assert_eq!(profile["emailVerified"], true);

    let response = app
        .post(
            "/api/auth/otp/verify",
            None,
            json!({ "email": "cand@x.com", "otp": "123456", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "not-found");
}

async fn verify(app: &TestApp, otp: &str) -> reqwest::Response {
    app.post(
        "/api/auth/otp/verify",
        None,
        json!({ "email": "a@x.com", "otp": otp, "password": PASSWORD }),
    )
    .await
}

#[tokio::test]
async fn three_wrong_codes_exhaust_the_request() {
    let app = spawn_app().await;
    app.post(
        "/api/auth/otp",
        None,
        json!({ "email": "a@x.com", "password": PASSWORD }),
    )
    .await;
    let code = app.code_for("a@x.com");
    let bad = if code == "000000" { "111111" } else { "000000" };

    let first = verify(&app, bad).await;
    assert_eq!(first.status().as_u16(), 400);
    let body: Value = first.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Invalid verification code. 2 attempt(s) remaining."
    );

    let second = verify(&app, bad).await;
    assert_eq!(second.status().as_u16(), 400);

    let third = verify(&app, bad).await;
    assert_eq!(third.status().as_u16(), 429);
    let body: Value = third.json().await.unwrap();
    assert_eq!(body["code"], "resource-exhausted");
}

#[tokio::test]
async fn mismatched_password_keeps_attempts() {
    let app = spawn_app().await;
    app.post(
        "/api/auth/otp",
        None,
        json!({ "email": "a@x.com", "password": PASSWORD }),
    )
    .await;
    let code = app.code_for("a@x.com");

    for _ in 0..3 {
        let response = app
            .post(
                "/api/auth/otp/verify",
                None,
                json!({ "email": "a@x.com", "otp": code, "password": "not-the-same" }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 400);
    }

    let response = app
        .post(
            "/api/auth/otp/verify",
            None,
            json!({ "email": "a@x.com", "otp": code, "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert!(body["uid"].as_str().is_some());
}

#[tokio::test]
async fn second_signup_for_same_email_is_conflict() {
    let app = spawn_app().await;
    app.register("a@x.com").await;

    app.post(
        "/api/auth/otp",
        None,
        json!({ "email": "a@x.com", "password": PASSWORD }),
    )
    .await;
    let code = app.code_for("a@x.com");
    let response = app
        .post(
            "/api/auth/otp/verify",
            None,
            json!({ "email": "a@x.com", "otp": code, "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "This email is already registered. Please sign in instead."
    );
}

#[tokio::test]
async fn wrong_password_login_is_unauthenticated() {
    let app = spawn_app().await;
    app.register("a@x.com").await;

    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "a@x.com", "password": "wrong-password" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn allow_listed_email_gets_admin_role() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.register("cand@x.com").await;

    let response = app.get("/api/admin/users", Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 200);
    let users: Vec<Value> = response.json().await.unwrap();
    assert_eq!(users.len(), 2);

    let response = app.get("/api/admin/users", Some(&user)).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.get("/api/admin/users", None).await;
    assert_eq!(response.status().as_u16(), 401);
}
