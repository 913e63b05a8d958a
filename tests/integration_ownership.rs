#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::todo,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    missing_debug_implementations,
    clippy::cast_precision_loss,
    clippy::clone_on_ref_ptr,
    clippy::match_same_arms,
    clippy::items_after_statements,
    unreachable_pub,
    clippy::print_stdout,
    clippy::similar_names
)]
use reqwest::StatusCode;
use serde_json::json;
use ticklist_server::domain::auth::Claims;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_todos_are_scoped_to_owner() {
    let app = common::TestApp::spawn().await;
    let token_a = app.register_and_login(&common::generate_username("alice")).await;
    let token_b = app.register_and_login(&common::generate_username("bob")).await;

    for title in ["a1", "a2"] {
        let resp = app.create_todo(&token_a, &json!({ "title": title })).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let resp = app.create_todo(&token_b, &json!({ "title": "b1" })).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.list_todos(&token_a).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let resp = app.list_todos(&token_b).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "b1");
}

#[tokio::test]
async fn test_cross_user_update_looks_like_missing_todo() {
    let app = common::TestApp::spawn().await;
    let token_a = app.register_and_login(&common::generate_username("owner")).await;
    let token_b = app.register_and_login(&common::generate_username("intruder")).await;

    let resp = app.create_todo(&token_a, &json!({ "title": "private" })).await;
    let created: serde_json::Value = resp.json().await.unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // B touching A's todo must be indistinguishable from touching a random id
    let resp_foreign = app
        .client
        .put(format!("{}/api/v1/todos/{}", app.server_url, id))
        .header("Authorization", format!("Bearer {token_b}"))
        .json(&json!({ "done": true }))
        .send()
        .await
        .unwrap();
    let status_foreign = resp_foreign.status();
    let body_foreign = resp_foreign.text().await.unwrap();

    let resp_random = app
        .client
        .put(format!("{}/api/v1/todos/{}", app.server_url, Uuid::new_v4()))
        .header("Authorization", format!("Bearer {token_b}"))
        .json(&json!({ "done": true }))
        .send()
        .await
        .unwrap();
    let status_random = resp_random.status();
    let body_random = resp_random.text().await.unwrap();

    assert_eq!(status_foreign, StatusCode::NOT_FOUND);
    assert_eq!(status_random, StatusCode::NOT_FOUND);
    assert_eq!(body_foreign, body_random, "foreign todos must not be revealed as existing");

    // A's todo is untouched
    let resp = app.list_todos(&token_a).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"][0]["done"], false);
}

#[tokio::test]
async fn test_cross_user_delete_is_rejected() {
    let app = common::TestApp::spawn().await;
    let token_a = app.register_and_login(&common::generate_username("keeper")).await;
    let token_b = app.register_and_login(&common::generate_username("thief")).await;

    let resp = app.create_todo(&token_a, &json!({ "title": "survives" })).await;
    let created: serde_json::Value = resp.json().await.unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let resp = app
        .client
        .delete(format!("{}/api/v1/todos/{}", app.server_url, id))
        .header("Authorization", format!("Bearer {token_b}"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "todo not found");

    let resp = app.list_todos(&token_a).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1, "failed foreign delete must not remove the todo");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/api/v1/todos", app.server_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "invalid credentials");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_malformed_auth_headers_are_rejected() {
    let app = common::TestApp::spawn().await;

    for header in ["Bearer", "Bearer ", "Basic dXNlcjpwdw==", "not-even-a-scheme", "Bearer abc.def"] {
        let resp = app
            .client
            .get(format!("{}/api/v1/todos", app.server_url))
            .header("Authorization", header)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {header:?} should be rejected");

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    let app = common::TestApp::spawn().await;

    let forged = Claims::new(Uuid::new_v4(), 900).encode("not_the_real_secret").unwrap();

    let resp = app
        .client
        .get(format!("{}/api/v1/todos", app.server_url))
        .header("Authorization", format!("Bearer {forged}"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "invalid credentials");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = common::TestApp::spawn().await;

    // Expired decades ago; signature itself is valid
    let expired = Claims { sub: Uuid::new_v4(), exp: 1000 }.encode(&app.config.auth.jwt_secret).unwrap();

    let resp = app
        .client
        .get(format!("{}/api/v1/todos", app.server_url))
        .header("Authorization", format!("Bearer {expired}"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "invalid credentials");
}
