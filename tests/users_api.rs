//! End-to-end tests for the `/users` endpoints over an in-memory database.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

fn new_user(login: &str, roles: &[&str]) -> serde_json::Value {
    json!({
        "login": login,
        "name": "New User",
        "password": "Password123",
        "roles": roles,
    })
}

#[tokio::test]
async fn create_user_returns_201_with_resolved_roles() {
    let (app, db) = test_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/users", &new_user("newuser", &["admin", "user"])),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["login"], "newuser");
    assert_eq!(body["user"]["name"], "New User");
    assert_eq!(role_names(&body["user"]), vec!["admin", "user"]);
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    assert_eq!(role_count(&db).await, 2);
    assert_eq!(link_count(&db).await, 2);
}

#[tokio::test]
async fn create_with_taken_login_fails_and_changes_nothing() {
    let (app, db) = test_app().await;
    send(
        &app,
        json_request("POST", "/users", &new_user("existinguser", &["admin"])),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/users",
            &new_user("existinguser", &["admin", "brand-new-role"]),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
    assert_eq!(role_count(&db).await, 1);
    assert_eq!(link_count(&db).await, 1);
}

#[tokio::test]
async fn create_reuses_existing_roles() {
    let (app, db) = test_app().await;
    let (_, first) = send(
        &app,
        json_request("POST", "/users", &new_user("first", &["admin"])),
    )
    .await;
    let (_, second) = send(
        &app,
        json_request("POST", "/users", &new_user("second", &["admin", "auditor"])),
    )
    .await;

    assert_eq!(
        role_id(&first["user"], "admin"),
        role_id(&second["user"], "admin")
    );
    assert_eq!(role_count(&db).await, 2);
}

#[tokio::test]
async fn create_rejects_invalid_payloads() {
    let (app, db) = test_app().await;

    let cases = [
        json!({"login": "u1", "name": "N", "password": "password123", "roles": ["admin"]}),
        json!({"login": "u2", "name": "N", "password": "PASSWORD", "roles": ["admin"]}),
        json!({"login": "u3", "name": "N", "password": "Password1", "roles": []}),
        json!({"login": "", "name": "N", "password": "Password1", "roles": ["admin"]}),
        json!({"login": "u4", "name": "", "password": "Password1", "roles": ["admin"]}),
        json!({"login": "u5", "name": "N", "password": "Password1", "roles": ["  "]}),
        json!({"login": "u6", "name": "N", "password": "Password1"}),
        json!({"login": "u7", "name": "N", "password": "Password1", "roles": "admin"}),
    ];

    for case in cases {
        let (status, body) = send(&app, json_request("POST", "/users", &case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(body["success"], false, "{case}");
    }

    let (_, list) = send(&app, empty_request("GET", "/users")).await;
    assert!(list["users"].as_array().unwrap().is_empty());
    assert_eq!(role_count(&db).await, 0);
}

#[tokio::test]
async fn weak_password_reports_strength_rule() {
    let (app, _db) = test_app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/users",
            &json!({"login": "u", "name": "N", "password": "password123", "roles": ["admin"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "password: Password must contain at least one uppercase letter and one digit"
    );
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (app, _db) = test_app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"login\": "))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn get_user_returns_roles() {
    let (app, _db) = test_app().await;
    send(
        &app,
        json_request("POST", "/users", &new_user("alice", &["admin", "user"])),
    )
    .await;

    let (status, body) = send(&app, empty_request("GET", "/users/alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["login"], "alice");
    assert_eq!(role_names(&body["user"]), vec!["admin", "user"]);
}

#[tokio::test]
async fn unknown_login_is_404_for_get_put_delete() {
    let (app, _db) = test_app().await;

    let (status, body) = send(&app, empty_request("GET", "/users/nonexistentuser")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/users/nonexistentuser",
            &json!({"name": "Updated Name", "roles": ["admin"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, empty_request("DELETE", "/users/nonexistentuser")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_users_returns_login_and_name_only() {
    let (app, _db) = test_app().await;
    send(&app, json_request("POST", "/users", &new_user("bob", &["user"]))).await;
    send(&app, json_request("POST", "/users", &new_user("alice", &["admin"]))).await;

    let (status, body) = send(&app, empty_request("GET", "/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["users"],
        json!([
            {"login": "alice", "name": "New User"},
            {"login": "bob", "name": "New User"},
        ])
    );
}

#[tokio::test]
async fn list_users_on_empty_store_is_empty() {
    let (app, _db) = test_app().await;
    let (status, body) = send(&app, empty_request("GET", "/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "users": []}));
}

#[tokio::test]
async fn update_name_only_keeps_roles() {
    let (app, _db) = test_app().await;
    send(
        &app,
        json_request("POST", "/users", &new_user("u", &["admin", "user"])),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/users/u", &json!({"name": "Updated Name"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["login"], "u");
    assert_eq!(body["name"], "Updated Name");
    assert_eq!(role_names(&body), vec!["admin", "user"]);
}

#[tokio::test]
async fn update_roles_only_keeps_name() {
    let (app, _db) = test_app().await;
    send(&app, json_request("POST", "/users", &new_user("u", &["A", "B"]))).await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/users/u", &json!({"roles": ["B", "C"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "New User");
    assert_eq!(role_names(&body), vec!["B", "C"]);
}

#[tokio::test]
async fn update_with_empty_roles_clears_assignments() {
    let (app, db) = test_app().await;
    send(&app, json_request("POST", "/users", &new_user("u", &["admin"]))).await;

    let (status, body) = send(&app, json_request("PUT", "/users/u", &json!({"roles": []}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["roles"].as_array().unwrap().is_empty());
    assert_eq!(link_count(&db).await, 0);
    assert_eq!(role_count(&db).await, 1);
}

#[tokio::test]
async fn update_rejects_blank_role_names() {
    let (app, _db) = test_app().await;
    send(&app, json_request("POST", "/users", &new_user("u", &["admin"]))).await;

    let (status, _) = send(&app, json_request("PUT", "/users/u", &json!({"roles": [""]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, empty_request("GET", "/users/u")).await;
    assert_eq!(role_names(&body["user"]), vec!["admin"]);
}

#[tokio::test]
async fn example_scenario_replaces_roles_and_reuses_admin() {
    let (app, db) = test_app().await;

    let (status, created) = send(
        &app,
        json_request("POST", "/users", &new_user("newuser", &["admin", "user"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let admin_id = role_id(&created["user"], "admin");

    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            "/users/newuser",
            &json!({"name": "Updated Name", "roles": ["admin", "manager"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Updated Name");
    assert_eq!(role_names(&updated), vec!["admin", "manager"]);
    assert_eq!(role_id(&updated, "admin"), admin_id);

    // "user" is detached but still exists as a role.
    assert_eq!(role_count(&db).await, 3);
    assert_eq!(link_count(&db).await, 2);

    let (_, fetched) = send(&app, empty_request("GET", "/users/newuser")).await;
    assert_eq!(role_names(&fetched["user"]), vec!["admin", "manager"]);
}

#[tokio::test]
async fn delete_user_returns_envelope_and_removes_links() {
    let (app, db) = test_app().await;
    send(
        &app,
        json_request("POST", "/users", &new_user("existinguser", &["admin", "user"])),
    )
    .await;

    let (status, body) = send(&app, empty_request("DELETE", "/users/existinguser")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "deletedUser": {"success": true, "message": "User deleted successfully"}
        })
    );

    let (status, _) = send(&app, empty_request("GET", "/users/existinguser")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(link_count(&db).await, 0);
    assert_eq!(role_count(&db).await, 2);

    // The login is free again.
    let (status, _) = send(
        &app,
        json_request("POST", "/users", &new_user("existinguser", &["admin"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (app, _db) = test_app().await;
    let request = axum::http::Request::builder()
        .uri("/users")
        .header("x-request-id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let (app, _db) = test_app().await;
    let (status, body) = send(&app, empty_request("GET", "/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
