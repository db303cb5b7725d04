use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use fyyur_suite::coffee::auth::SharedSecretVerifier;
use fyyur_suite::coffee::directory::{DirectoryError, RoleIds, UserDirectory};
use fyyur_suite::coffee::{self, CoffeeApp, CoffeeStore};
use fyyur_suite::seed::seed_coffee;
use fyyur_suite::storage::{Database, Repository};

const SECRET: &str = "integration-secret";
const AUDIENCE: &str = "drinks";

const BARISTA: &[&str] = &["get:drinks-detail"];
const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
    "get:baristas",
    "post:baristas",
    "get:managers",
    "post:managers",
];

/// Records role changes instead of calling the identity provider.
#[derive(Default)]
struct RecordingDirectory {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl UserDirectory for RecordingDirectory {
    async fn role_members(&self, role_id: &str) -> Result<Value, DirectoryError> {
        self.calls.lock().unwrap().push(format!("list {role_id}"));
        Ok(json!([{"user_id": "auth0|barista", "email": "barista@example.com"}]))
    }

    async fn assign_role(&self, user_id: &str, role_id: &str) -> Result<(), DirectoryError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("assign {role_id} {user_id}"));
        Ok(())
    }

    async fn revoke_role(&self, user_id: &str, role_id: &str) -> Result<(), DirectoryError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("revoke {role_id} {user_id}"));
        Ok(())
    }
}

struct Harness {
    app: Router,
    store: CoffeeStore,
    directory: Arc<RecordingDirectory>,
}

async fn harness() -> Harness {
    let store = CoffeeStore::open(Database::open_in_memory().unwrap())
        .await
        .unwrap();
    seed_coffee(&store).await.unwrap();
    let directory = Arc::new(RecordingDirectory::default());
    let app = CoffeeApp::new(
        store.clone(),
        Arc::new(SharedSecretVerifier::new(SECRET, Some(AUDIENCE))),
        directory.clone(),
        RoleIds {
            barista: "rol_barista".into(),
            manager: "rol_manager".into(),
        },
    );
    Harness {
        app: coffee::router(app),
        store,
        directory,
    }
}

fn token_with(claims: Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn token(permissions: &[&str]) -> String {
    token_with(json!({
        "sub": "auth0|tester",
        "aud": AUDIENCE,
        "exp": chrono::Utc::now().timestamp() + 3600,
        "permissions": permissions,
    }))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn public_listing_hides_ingredient_names() {
    let h = harness().await;
    let (status, body) = send(&h.app, Method::GET, "/drinks", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let drinks = body["drinks"].as_array().unwrap();
    assert_eq!(drinks.len(), 2);
    assert_eq!(drinks[0]["title"], "water");
    assert_eq!(drinks[0]["recipe"], json!([{"color": "blue", "parts": 1}]));
}

#[tokio::test]
async fn empty_catalog_is_not_found() {
    let h = harness().await;
    h.store.clear().await.unwrap();
    let (status, body) = send(&h.app, Method::GET, "/drinks", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);
}

#[tokio::test]
async fn detail_requires_a_valid_bearer_token() {
    let h = harness().await;

    let (status, body) = send(&h.app, Method::GET, "/drinks-detail", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"]["code"], "authorization_header_missing");

    let forged = {
        let claims = json!({"aud": AUDIENCE, "exp": chrono::Utc::now().timestamp() + 60});
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"someone-else"),
        )
        .unwrap()
    };
    let (status, body) = send(&h.app, Method::GET, "/drinks-detail", Some(&forged), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"]["code"], "invalid_header");

    let expired = token_with(json!({
        "aud": AUDIENCE,
        "exp": chrono::Utc::now().timestamp() - 3600,
        "permissions": BARISTA,
    }));
    let (status, body) = send(&h.app, Method::GET, "/drinks-detail", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"]["code"], "token_expired");

    let wrong_audience = token_with(json!({
        "aud": "someone-else",
        "exp": chrono::Utc::now().timestamp() + 3600,
        "permissions": BARISTA,
    }));
    let (status, body) =
        send(&h.app, Method::GET, "/drinks-detail", Some(&wrong_audience), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"]["code"], "invalid_claims");

    let (status, body) =
        send(&h.app, Method::GET, "/drinks-detail", Some(&token(BARISTA)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "water");
}

#[tokio::test]
async fn missing_permission_is_forbidden() {
    let h = harness().await;
    let (status, body) = send(
        &h.app,
        Method::POST,
        "/drinks",
        Some(&token(BARISTA)),
        Some(json!({"title": "latte", "recipe": [{"name": "milk", "color": "white", "parts": 2}]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"]["code"], "unauthorized");
    assert_eq!(h.store.drinks.count().await.unwrap(), 2);

    let no_claim = token_with(json!({"aud": AUDIENCE, "exp": chrono::Utc::now().timestamp() + 60}));
    let (status, body) = send(&h.app, Method::DELETE, "/drinks/1", Some(&no_claim), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"]["code"], "invalid_claims");
}

#[tokio::test]
async fn managers_create_update_and_delete_drinks() {
    let h = harness().await;
    let manager = token(MANAGER);

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/drinks",
        Some(&manager),
        Some(json!({"title": "latte", "recipe": {"name": "milk", "color": "white", "parts": 2}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created = &body["drinks"][0];
    assert_eq!(created["title"], "latte");
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &h.app,
        Method::PATCH,
        &format!("/drinks/{id}"),
        Some(&manager),
        Some(json!({"title": "flat white"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "flat white");
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "milk");

    let (status, body) =
        send(&h.app, Method::DELETE, &format!("/drinks/{id}"), Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "delete": id}));
    assert!(h.store.drinks.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_drink_writes() {
    let h = harness().await;
    let manager = token(MANAGER);

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/drinks",
        Some(&manager),
        Some(json!({"title": "water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], 422);

    let (status, _) = send(
        &h.app,
        Method::POST,
        "/drinks",
        Some(&manager),
        Some(json!({"title": "no recipe"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &h.app,
        Method::PATCH,
        "/drinks/999",
        Some(&manager),
        Some(json!({"title": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.app, Method::PATCH, "/drinks/1", Some(&manager), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&h.app, Method::DELETE, "/drinks/999", Some(&manager), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(h.store.drinks.count().await.unwrap(), 2);
}

#[tokio::test]
async fn staff_roles_pass_through_to_the_directory() {
    let h = harness().await;
    let manager = token(MANAGER);

    let (status, body) = send(&h.app, Method::GET, "/baristas", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["user_id"], "auth0|barista");

    let (status, body) =
        send(&h.app, Method::POST, "/baristas/auth0%7Cnew", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["barista_id"], "auth0|new");

    let (status, _) = send(&h.app, Method::POST, "/managers/auth0%7Cboss/add", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.app, Method::DELETE, "/managers/auth0%7Cboss", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&h.app, Method::GET, "/managers", Some(&token(BARISTA)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let calls = h.directory.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            "list rol_barista",
            "assign rol_barista auth0|new",
            "assign rol_manager auth0|boss",
            "revoke rol_manager auth0|boss",
        ]
    );
}

#[tokio::test]
async fn unsupported_methods_use_the_envelope() {
    let h = harness().await;
    let (status, body) = send(&h.app, Method::PUT, "/drinks", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], 405);
}
