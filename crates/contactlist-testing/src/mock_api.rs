//! In-process mock of the Contact List application.
//!
//! Serves the same surface the real deployment exposes — register/login with
//! bearer tokens, owner-scoped contact CRUD — backed by in-memory maps, so
//! client and scenario tests run hermetically. Bound to `127.0.0.1:0`; each
//! [`MockApi`] owns its own state and port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

const CONTACT_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "birthdate",
    "email",
    "phone",
    "street1",
    "street2",
    "city",
    "stateProvince",
    "postalCode",
    "country",
];

/// A running mock server. Dropping it stops the server task.
pub struct MockApi {
    base_url: String,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Bind a random loopback port and start serving.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = AppState::default();
        let server = tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// ── State ────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct AppState {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// user id → account
    users: HashMap<String, Account>,
    /// bearer token → user id
    tokens: HashMap<String, String>,
    /// contact id → contact object (camelCase fields plus `_id`/`owner`)
    contacts: HashMap<String, Value>,
}

#[derive(Clone)]
struct Account {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

impl Account {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
        })
    }
}

impl Inner {
    fn authenticate(&self, headers: &HeaderMap) -> Result<String, Response> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token).cloned())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "please authenticate"))
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

// ── Router ───────────────────────────────────────────────────────────────────

fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/me", get(profile).patch(update_profile).delete(delete_account))
        .route("/contacts", post(create_contact).get(list_contacts))
        .route(
            "/contacts/{id}",
            get(get_contact)
                .put(replace_contact)
                .patch(patch_contact)
                .delete(delete_contact),
        )
        .with_state(state)
}

// ── User handlers ────────────────────────────────────────────────────────────

async fn register(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut inner = state.inner.lock().unwrap();

    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        str_field(&body, "firstName"),
        str_field(&body, "lastName"),
        str_field(&body, "email"),
        str_field(&body, "password"),
    ) else {
        return error(StatusCode::BAD_REQUEST, "user validation failed");
    };

    if inner.users.values().any(|u| u.email == email) {
        return error(StatusCode::BAD_REQUEST, "email address is already in use");
    }

    let account = Account {
        id: Uuid::new_v4().simple().to_string(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    };
    let token = Uuid::new_v4().simple().to_string();
    inner.tokens.insert(token.clone(), account.id.clone());
    let user = account.to_json();
    inner.users.insert(account.id.clone(), account);

    (
        StatusCode::CREATED,
        Json(json!({ "user": user, "token": token })),
    )
        .into_response()
}

async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let mut inner = state.inner.lock().unwrap();

    let (Some(email), Some(password)) = (
        str_field(&body, "email"),
        str_field(&body, "password"),
    ) else {
        return error(StatusCode::UNAUTHORIZED, "incorrect email or password");
    };

    let Some(account) = inner
        .users
        .values()
        .find(|u| u.email == email && u.password == password)
        .cloned()
    else {
        return error(StatusCode::UNAUTHORIZED, "incorrect email or password");
    };

    let token = Uuid::new_v4().simple().to_string();
    inner.tokens.insert(token.clone(), account.id.clone());
    Json(json!({ "user": account.to_json(), "token": token })).into_response()
}

async fn profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    Json(inner.users[&user_id].to_json()).into_response()
}

async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let account = inner.users.get_mut(&user_id).unwrap();
    if let Some(v) = str_field(&body, "firstName") {
        account.first_name = v.to_owned();
    }
    if let Some(v) = str_field(&body, "lastName") {
        account.last_name = v.to_owned();
    }
    if let Some(v) = str_field(&body, "email") {
        account.email = v.to_owned();
    }
    if let Some(v) = str_field(&body, "password") {
        account.password = v.to_owned();
    }
    Json(account.to_json()).into_response()
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut inner = state.inner.lock().unwrap();
    if let Err(resp) = inner.authenticate(&headers) {
        return resp;
    }
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap()
        .to_owned();
    inner.tokens.remove(&token);
    StatusCode::OK.into_response()
}

async fn delete_account(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    inner.users.remove(&user_id);
    inner.tokens.retain(|_, uid| *uid != user_id);
    inner
        .contacts
        .retain(|_, c| c.get("owner").and_then(Value::as_str) != Some(user_id.as_str()));
    StatusCode::OK.into_response()
}

// ── Contact handlers ─────────────────────────────────────────────────────────

/// Copy only the recognized contact fields out of a request body.
fn contact_fields(body: &Value) -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    for key in CONTACT_FIELDS {
        if let Some(value) = body.get(*key) {
            if !value.is_null() {
                fields.insert((*key).to_owned(), value.clone());
            }
        }
    }
    fields
}

async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if str_field(&body, "firstName").is_none() || str_field(&body, "lastName").is_none() {
        return error(StatusCode::BAD_REQUEST, "contact validation failed");
    }

    let id = Uuid::new_v4().simple().to_string();
    let mut contact = contact_fields(&body);
    contact.insert("_id".to_owned(), json!(id));
    contact.insert("owner".to_owned(), json!(user_id));
    let contact = Value::Object(contact);
    inner.contacts.insert(id, contact.clone());

    (StatusCode::CREATED, Json(contact)).into_response()
}

async fn list_contacts(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let owned: Vec<&Value> = inner
        .contacts
        .values()
        .filter(|c| c.get("owner").and_then(Value::as_str) == Some(user_id.as_str()))
        .collect();
    Json(owned).into_response()
}

/// Look up a contact by id, enforcing ownership. Foreign contacts are
/// reported as 404, not 403 — ids are not enumerable across accounts.
fn owned_contact<'a>(inner: &'a Inner, user_id: &str, id: &str) -> Result<&'a Value, Response> {
    inner
        .contacts
        .get(id)
        .filter(|c| c.get("owner").and_then(Value::as_str) == Some(user_id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "contact not found"))
}

async fn get_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match owned_contact(&inner, &user_id, &id) {
        Ok(contact) => Json(contact).into_response(),
        Err(resp) => resp,
    }
}

async fn replace_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = owned_contact(&inner, &user_id, &id) {
        return resp;
    }
    if str_field(&body, "firstName").is_none() || str_field(&body, "lastName").is_none() {
        return error(StatusCode::BAD_REQUEST, "contact validation failed");
    }

    let mut contact = contact_fields(&body);
    contact.insert("_id".to_owned(), json!(id));
    contact.insert("owner".to_owned(), json!(user_id));
    let contact = Value::Object(contact);
    inner.contacts.insert(id, contact.clone());
    Json(contact).into_response()
}

async fn patch_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = owned_contact(&inner, &user_id, &id) {
        return resp;
    }

    let updates = contact_fields(&body);
    let contact = inner.contacts.get_mut(&id).unwrap();
    let fields = contact.as_object_mut().unwrap();
    for (key, value) in updates {
        fields.insert(key, value);
    }
    Json(&*contact).into_response()
}

async fn delete_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let user_id = match inner.authenticate(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = owned_contact(&inner, &user_id, &id) {
        return resp;
    }
    inner.contacts.remove(&id);
    StatusCode::OK.into_response()
}
