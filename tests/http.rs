mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use backoffice::app;
use backoffice::models::ids::{TenantId, UserId, UserKey};

use common::state;

fn onboarding_body(n: u32) -> Value {
    json!({
        "tenant": {
            "name": format!("Empresa {n}"),
            "vatNumber": format!("IT{n:09}"),
            "address": "Via Roma 1",
            "city": "Firenze",
            "postalCode": "50100",
            "phone": format!("+39055{n:06}"),
        },
        "owner": {
            "email": format!("owner{n}@example.com"),
            "firstName": "Mario",
            "lastName": "Rossi",
        }
    })
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn onboard(app: &Router, n: u32) -> String {
    let (status, body) = send(app, Method::POST, "/api/tenants", None, Some(onboarding_body(n))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app(state());
    let (status, _) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app(state());
    let (status, body) = send(&app, Method::GET, "/api/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["components"]["schemas"]["Tenant"].is_object());
}

#[tokio::test]
async fn onboarding_returns_a_working_token() {
    let app = app(state());
    let token = onboard(&app, 1).await;

    let (status, body) = send(&app, Method::GET, "/api/tenant", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vatNumber"], "IT000000001");

    let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "owner1@example.com");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = app(state());

    let (status, _) = send(&app, Method::GET, "/api/roles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/roles", Some("lixo"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_onboarding_names_the_conflicting_field() {
    let app = app(state());
    onboard(&app, 1).await;

    let (status, body) = send(&app, Method::POST, "/api/tenants", None, Some(onboarding_body(1))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn invalid_onboarding_lists_field_errors() {
    let app = app(state());
    let mut payload = onboarding_body(1);
    payload["owner"]["email"] = json!("sem-arroba");

    let (status, body) = send(&app, Method::POST, "/api/tenants", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["owner.email"].is_array());
}

#[tokio::test]
async fn task_flow_through_the_module_store() {
    let app = app(state());
    let token = onboard(&app, 1).await;
    let task = json!({ "title": "Inventário", "priority": 1, "targets": [{ "type": "user", "id": 0 }] });

    let (status, _) = send(&app, Method::POST, "/api/tasks", Some(&token), Some(task.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::POST, "/api/modules/5/activate", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 5);

    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(&token), Some(task)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "open");
    assert_eq!(body["assignees"], json!([0]));

    let (status, body) = send(&app, Method::POST, "/api/tasks/0/complete", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (status, _) = send(&app, Method::POST, "/api/tasks/0/complete", Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/api/modules/accessible", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn unknown_assignment_target_is_not_found() {
    let app = app(state());
    let token = onboard(&app, 1).await;
    send(&app, Method::POST, "/api/modules/4/activate", Some(&token), None).await;

    let event = json!({
        "name": "Reunião",
        "startsAt": "2999-01-01T10:00:00Z",
        "targets": [{ "type": "role", "id": 42 }]
    });
    let (status, _) = send(&app, Method::POST, "/api/events", Some(&token), Some(event)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_roles_are_refused_over_http() {
    let app = app(state());
    let token = onboard(&app, 1).await;

    let (status, _) = send(&app, Method::DELETE, "/api/roles/0", Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let role = json!({ "name": "Editors", "color": "#1e88e5" });
    let (status, body) = send(&app, Method::POST, "/api/roles", Some(&token), Some(role)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);

    let (status, _) = send(&app, Method::DELETE, "/api/roles/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn pending_user_cannot_administer_the_tenant() {
    let state = state();
    let app = app(state.clone());

    let (status, body) = send(&app, Method::POST, "/api/tenants", None, Some(onboarding_body(1))).await;
    assert_eq!(status, StatusCode::CREATED);
    let owner_token = body["token"].as_str().unwrap().to_string();
    let tenant = TenantId(body["tenant"]["id"].as_i64().unwrap() as i32);

    let newcomer = json!({ "email": "ana@example.com", "firstName": "Ana", "lastName": "Bianchi" });
    let (status, body) = send(&app, Method::POST, "/api/users", Some(&owner_token), Some(newcomer)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    let token = state
        .auth_service
        .create_token(UserKey::new(tenant, UserId(id as i32)))
        .unwrap();

    send(&app, Method::POST, "/api/modules/5/activate", Some(&owner_token), None).await;

    let denied = [
        (Method::PUT, format!("/api/users/{id}/roles"), Some(json!({ "roles": [0] }))),
        (Method::PUT, "/api/roles/0/members".to_string(), Some(json!({ "users": [id] }))),
        (Method::PUT, "/api/modules/5/roles".to_string(), Some(json!({ "roles": [1] }))),
        (Method::POST, "/api/modules/5/deactivate".to_string(), None),
        (Method::POST, "/api/roles".to_string(), Some(json!({ "name": "Editors", "color": "#1e88e5" }))),
        (Method::DELETE, "/api/tenant".to_string(), None),
    ];
    for (method, uri, body) in denied {
        let (status, _) = send(&app, method.clone(), &uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
    }

    // Os módulos essenciais continuam no painel.
    let (status, body) = send(&app, Method::GET, "/api/modules/accessible", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(5));

    let (status, body) = send(&app, Method::GET, "/api/roles/0", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"], json!([0]));
    let (status, _) = send(&app, Method::GET, "/api/tenant", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Com a permissão concedida ao cargo, a rota abre.
    let (status, _) = send(&app, Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::POST, "/api/modules/0/roles/1", Some(&owner_token), None).await;
    assert!(status.is_success());
    let (status, body) = send(&app, Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}
