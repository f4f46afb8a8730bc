// card-client/tests/http_store.rs
// HTTP transport against an in-process mock of the card API

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use card_client::{
    AuthClient, CardStore, ClientConfig, ClientError, HttpCardStore, MemorySession, Session,
    SessionProvider,
};
use serde_json::{Value, json};
use shared::client::LoginRequest;
use shared::models::{CardId, CardPayload, PendingImage};

#[derive(Default)]
struct Recorder {
    auth_headers: Mutex<Vec<Option<String>>>,
    forms: Mutex<Vec<HashMap<String, String>>>,
}

impl Recorder {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(value);
    }
}

fn card_json(id: &str, name: &str, total: u32, checked: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "pokemon_name": "Charizard",
        "energy_type": "Fire",
        "card_rarity": "Rare",
        "total_quantity": total,
        "checked_out_quantity": checked,
    })
}

async fn read_form(mut multipart: Multipart) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.unwrap();
                fields.insert(name, format!("{file_name}:{}", bytes.len()));
            }
            None => {
                fields.insert(name, field.text().await.unwrap());
            }
        }
    }
    fields
}

async fn list_cards(State(rec): State<Arc<Recorder>>, headers: HeaderMap) -> Json<Value> {
    rec.record_auth(&headers);
    Json(json!({
        "success": true,
        "data": [card_json("1", "Blaze", 2, 0), card_json("2", "Spark", 1, 1)],
        "message": "Pokemon cards retrieved successfully."
    }))
}

async fn get_card(Path(id): Path<String>) -> Response {
    if id == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database offline").into_response();
    }
    Json(json!({"data": card_json(&id, "Blaze", 2, 0)})).into_response()
}

async fn create_card(State(rec): State<Arc<Recorder>>, multipart: Multipart) -> Response {
    let form = read_form(multipart).await;
    let name = form.get("name").cloned().unwrap_or_default();
    let total: u32 = form
        .get("total_quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(1);
    let has_image = form.contains_key("card_image");
    rec.forms.lock().unwrap().push(form);

    let mut card = card_json("c1", &name, total, 0);
    if has_image {
        card["card_image"] = json!("https://cdn.example/c1.png");
    }
    (StatusCode::CREATED, Json(json!({"success": true, "data": card}))).into_response()
}

async fn update_card(
    State(rec): State<Arc<Recorder>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let form = read_form(multipart).await;
    let name = form.get("name").cloned().unwrap_or_default();
    rec.forms.lock().unwrap().push(form);
    if name.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": {"name": ["The name field is required."]}
            })),
        )
            .into_response();
    }
    Json(json!({"data": card_json(&id, &name, 2, 0)})).into_response()
}

async fn delete_card(Path(id): Path<String>) -> Response {
    if id == "gone" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response();
    }
    Json(json!({"success": true, "message": "Deleted"})).into_response()
}

async fn checkout_card(Path(id): Path<String>) -> Response {
    if id == "empty" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "No copies available for checkout"})),
        )
            .into_response();
    }
    Json(json!({"data": card_json(&id, "Blaze", 2, 1)})).into_response()
}

async fn return_card(Path(id): Path<String>) -> Json<Value> {
    // bare body, no envelope
    Json(card_json(&id, "Blaze", 2, 0))
}

async fn login(multipart: Multipart) -> Response {
    let form = read_form(multipart).await;
    if form.get("password").map(String::as_str) != Some("pikachu") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorised."}))).into_response();
    }
    Json(json!({
        "success": true,
        "data": {"token": "t-123", "name": "Ash", "email": form["email"]}
    }))
    .into_response()
}

async fn spawn_server() -> (String, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let app = Router::new()
        .route("/api/pokemon-cards", get(list_cards).post(create_card))
        .route(
            "/api/pokemon-cards/{id}",
            get(get_card).post(update_card).delete(delete_card),
        )
        .route("/api/pokemon-cards/{id}/checkout", patch(checkout_card))
        .route("/api/pokemon-cards/{id}/return", patch(return_card))
        .route("/api/login", post(login))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/"), recorder)
}

fn store_with(base_url: &str, session: Arc<MemorySession>) -> HttpCardStore {
    let transport = ClientConfig::new(base_url)
        .with_timeout(5)
        .build_transport(session)
        .unwrap();
    HttpCardStore::new(transport)
}

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let (url, recorder) = spawn_server().await;
    let session = Arc::new(MemorySession::with_session(Session::new("secret")));
    let store = store_with(&url, session);

    let cards = store.list().await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].id, CardId::new("1"));
    assert!(cards[1].is_out_of_stock());

    let headers = recorder.auth_headers.lock().unwrap().clone();
    assert_eq!(headers, vec![Some("Bearer secret".to_string())]);
}

#[tokio::test]
async fn test_anonymous_request_has_no_auth_header() {
    let (url, recorder) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    store.list().await.unwrap();
    assert_eq!(recorder.auth_headers.lock().unwrap().clone(), vec![None]);
}

#[tokio::test]
async fn test_create_uploads_multipart_with_image() {
    let (url, recorder) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let payload = CardPayload::new("Charizard", 1).with_image(PendingImage::new("front.png", vec![1, 2, 3]));
    let card = store.create(&payload).await.unwrap();
    assert_eq!(card.id, CardId::new("c1"));
    assert_eq!(card.total_quantity, 1);
    assert_eq!(card.card_image.as_deref(), Some("https://cdn.example/c1.png"));

    let forms = recorder.forms.lock().unwrap();
    assert_eq!(forms[0]["name"], "Charizard");
    assert_eq!(forms[0]["card_image"], "front.png:3");
    assert!(!forms[0].contains_key("_method"));
}

#[tokio::test]
async fn test_update_uses_method_override_and_keeps_image() {
    let (url, recorder) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let card = store
        .update(&CardId::new("7"), &CardPayload::new("Renamed", 2))
        .await
        .unwrap();
    assert_eq!(card.name, "Renamed");

    let forms = recorder.forms.lock().unwrap();
    assert_eq!(forms[0]["_method"], "PUT");
    assert!(!forms[0].contains_key("card_image"));
}

#[tokio::test]
async fn test_update_sends_cleared_fields_blank() {
    let (url, recorder) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let mut card = shared::models::Card::new("7", "Blaze", 2);
    card.description = Some("old text".into());
    card.weight = Some("90.5".into());
    let mut payload = CardPayload::from_card(&card);
    payload.description = None;

    store.update(&card.id, &payload).await.unwrap();

    let forms = recorder.forms.lock().unwrap();
    assert_eq!(forms[0]["description"], "");
    assert_eq!(forms[0]["weight"], "90.5");
    assert_eq!(forms[0]["card_rarity"], "");
    assert!(!forms[0].contains_key("card_image"));
}

#[tokio::test]
async fn test_update_validation_error_carries_field_errors() {
    let (url, _) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let err = store
        .update(&CardId::new("7"), &CardPayload::new("", 2))
        .await
        .unwrap_err();
    match err {
        ClientError::Validation {
            message,
            field_errors,
        } => {
            assert_eq!(message, "The given data was invalid.");
            assert_eq!(field_errors["name"], "The name field is required.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_missing_card_is_success() {
    let (url, _) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    store.delete(&CardId::new("gone")).await.unwrap();
    store.delete(&CardId::new("3")).await.unwrap();
}

#[tokio::test]
async fn test_checkout_conflict() {
    let (url, _) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let card = store.checkout(&CardId::new("1")).await.unwrap();
    assert_eq!(card.checked_out_quantity, 1);

    let err = store.checkout(&CardId::new("empty")).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(ref m) if m == "No copies available for checkout"));
}

#[tokio::test]
async fn test_return_accepts_bare_body() {
    let (url, _) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let card = store.return_card(&CardId::new("1")).await.unwrap();
    assert_eq!(card.checked_out_quantity, 0);
}

#[tokio::test]
async fn test_server_error_is_transport() {
    let (url, _) = spawn_server().await;
    let store = store_with(&url, Arc::new(MemorySession::new()));

    let err = store.get(&CardId::new("boom")).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { .. }));
    assert_eq!(err.kind(), shared::ErrorKind::Transport);
    assert_eq!(err.message(), "database offline");
}

#[tokio::test]
async fn test_unreachable_server_is_transport() {
    // nothing listens on port 9 locally
    let store = store_with("http://127.0.0.1:9/api/", Arc::new(MemorySession::new()));
    let err = store.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(err.kind(), shared::ErrorKind::Transport);
}

#[tokio::test]
async fn test_login_stores_session() {
    let (url, _) = spawn_server().await;
    let session = Arc::new(MemorySession::new());
    let transport = ClientConfig::new(&url).build_transport(session.clone()).unwrap();
    let auth = AuthClient::new(transport);

    let bad = auth
        .login(&LoginRequest {
            email: "ash@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(bad, ClientError::Unauthorized(_)));
    assert!(!session.is_authenticated());

    let logged_in = auth
        .login(&LoginRequest {
            email: "ash@example.com".into(),
            password: "pikachu".into(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.token, "t-123");
    assert_eq!(session.token().as_deref(), Some("t-123"));
    assert_eq!(auth.current_session().unwrap().name.as_deref(), Some("Ash"));

    auth.logout().unwrap();
    assert!(session.session().is_none());
}
