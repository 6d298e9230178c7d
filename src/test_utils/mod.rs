//! An in-process fake of the expense tracker API for client tests.
//!
//! The fake keeps its data in memory, answers with the same routes, status
//! codes and `{"detail": ...}` error bodies as the real API, and records the
//! method, path and relevant headers of every request it receives.

use std::sync::{Arc, Mutex};

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path, Request, State},
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, HeaderName},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// The token the fake issues to regular users.
pub(crate) const TEST_TOKEN: &str = "test-token";
/// The token the fake issues to the user `root`, who is an admin.
pub(crate) const ADMIN_TOKEN: &str = "admin-token";
/// The only password the fake accepts.
pub(crate) const TEST_PASSWORD: &str = "correct horse battery staple";

/// What the fake saw of a request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

/// A running fake API.
pub(crate) struct FakeApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeApi {
    /// The most recent request.
    pub(crate) fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("the fake API has not received any requests")
    }

    /// How many requests the fake has received.
    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a fake API on a random local port.
pub(crate) async fn spawn_fake_api() -> FakeApi {
    let state = FakeState {
        data: Arc::new(Mutex::new(FakeData::seeded())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let requests = state.requests.clone();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind the fake API");
    let address = listener.local_addr().unwrap();

    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeApi {
        base_url: format!("http://{address}"),
        requests,
    }
}

#[derive(Clone)]
struct FakeState {
    data: Arc<Mutex<FakeData>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

struct FakeData {
    expenses: Vec<Value>,
    categories: Vec<Value>,
    persons: Vec<Value>,
    users: Vec<Value>,
    profile_person: Option<Value>,
    next_id: i64,
}

impl FakeData {
    fn seeded() -> Self {
        let acme = json!({
            "id": 1,
            "name": "Acme Market",
            "type": "Company",
            "rut": "76.123.456-7"
        });
        let jane = json!({
            "id": 2,
            "name": "Jane Doe",
            "type": "Individual",
            "rut": "12.345.678-9",
            "relation": "Self"
        });

        let expense = |id: i64, title: &str, amount: f64, category: &str, date: &str| {
            json!({
                "id": id,
                "title": title,
                "amount": amount,
                "category": category,
                "date": date,
                "note": null,
                "provider_id": 1,
                "recipient_id": 2,
                "provider": acme,
                "recipient": jane
            })
        };

        let user = |id: i64, username: &str, is_admin: bool| {
            json!({
                "id": id,
                "username": username,
                "email": format!("{username}@example.com"),
                "is_admin": is_admin,
                "is_active": true,
                "created_at": "2024-01-01T09:30:00.000000"
            })
        };

        Self {
            expenses: vec![
                expense(3, "Bus pass", 5.0, "Transport", "2024-02-01"),
                expense(2, "Dinner", 20.0, "Food", "2024-01-10"),
                expense(1, "Groceries", 10.0, "Food", "2024-01-05"),
            ],
            categories: vec![
                json!({"id": 1, "name": "Food", "color": "#ff0000"}),
                json!({"id": 2, "name": "Transport", "color": "#00ff00"}),
            ],
            persons: vec![acme.clone(), jane.clone()],
            users: vec![user(1, "root", true), user(2, "jane", false)],
            profile_person: None,
            next_id: 100,
        }
    }

    fn take_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn items(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Expenses => &mut self.expenses,
            Collection::Categories => &mut self.categories,
            Collection::Persons => &mut self.persons,
        }
    }

    fn person(&self, id: &Value) -> Value {
        self.persons
            .iter()
            .find(|person| &person["id"] == id)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Attach the provider and recipient records the way the API does.
    fn with_persons(&self, mut expense: Value) -> Value {
        expense["provider"] = self.person(&expense["provider_id"]);
        expense["recipient"] = self.person(&expense["recipient_id"]);
        expense
    }

    fn current_user(&self, is_admin: bool) -> Value {
        let (id, username) = if is_admin { (1, "root") } else { (2, "jane") };
        let profile_person_id = self
            .profile_person
            .as_ref()
            .map(|person| person["id"].clone());

        json!({
            "id": id,
            "username": username,
            "email": format!("{username}@example.com"),
            "is_admin": is_admin,
            "profile_person_id": profile_person_id,
            "profile_person": self.profile_person
        })
    }
}

#[derive(Clone, Copy)]
enum Collection {
    Expenses,
    Categories,
    Persons,
}

impl Collection {
    fn not_found(self) -> &'static str {
        match self {
            Collection::Expenses => "Expense not found",
            Collection::Categories => "Category not found",
            Collection::Persons => "Person not found",
        }
    }
}

fn build_router(state: FakeState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .merge(collection_routes("/expenses", Collection::Expenses))
        .merge(collection_routes("/categories", Collection::Categories))
        .merge(collection_routes("/persons", Collection::Persons))
        .route("/users/", get(list_users))
        .route("/users/me", get(me))
        .route("/users/me/profile", put(update_profile))
        .route("/users/{id}/activate", patch(toggle_active))
        .route("/users/{id}/role", patch(toggle_role))
        .route("/users/{id}", axum::routing::delete(delete_user))
        .route("/scan/receipt", post(scan_receipt))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
        )
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

fn collection_routes(path: &str, collection: Collection) -> Router<FakeState> {
    Router::new()
        .route(
            path,
            get(move |state: State<FakeState>, headers: HeaderMap| {
                list(state, headers, collection)
            })
            .post(
                move |state: State<FakeState>, headers: HeaderMap, Json(body): Json<Value>| {
                    create(state, headers, collection, body)
                },
            ),
        )
        .route(
            &format!("{path}/{{id}}"),
            put(
                move |state: State<FakeState>,
                      headers: HeaderMap,
                      Path(id): Path<i64>,
                      Json(body): Json<Value>| {
                    update(state, headers, collection, id, body)
                },
            )
            .delete(
                move |state: State<FakeState>, headers: HeaderMap, Path(id): Path<i64>| {
                    delete(state, headers, collection, id)
                },
            ),
        )
}

async fn record_request(
    State(state): State<FakeState>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        authorization: header_value(headers, AUTHORIZATION),
        content_type: header_value(headers, CONTENT_TYPE),
    };
    state.requests.lock().unwrap().push(recorded);

    next.run(request).await
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Check the bearer token and return whether it belongs to an admin.
fn authorize(headers: &HeaderMap) -> Result<bool, Response> {
    match header_value(headers, AUTHORIZATION).as_deref() {
        Some(value) if value == format!("Bearer {TEST_TOKEN}") => Ok(false),
        Some(value) if value == format!("Bearer {ADMIN_TOKEN}") => Ok(true),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "Invalid or expired token")),
    }
}

fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    if authorize(headers)? {
        Ok(())
    } else {
        Err(detail(StatusCode::FORBIDDEN, "Admin access required"))
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    if form.password != TEST_PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }

    if form.username == "locked" {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let token = if form.username == "root" {
        ADMIN_TOKEN
    } else {
        TEST_TOKEN
    };

    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn register(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }

    let mut data = state.data.lock().unwrap();
    let user = json!({
        "id": data.take_id(),
        "username": body["username"],
        "email": body["email"],
        "is_admin": false,
        "is_active": true,
        "created_at": "2024-06-01T12:00:00.000000"
    });
    data.users.push(user.clone());

    (StatusCode::CREATED, Json(user)).into_response()
}

async fn me(State(state): State<FakeState>, headers: HeaderMap) -> Result<Response, Response> {
    let is_admin = authorize(&headers)?;
    let data = state.data.lock().unwrap();

    Ok(Json(data.current_user(is_admin)).into_response())
}

async fn list(
    State(state): State<FakeState>,
    headers: HeaderMap,
    collection: Collection,
) -> Result<Response, Response> {
    authorize(&headers)?;
    let mut data = state.data.lock().unwrap();

    Ok(Json(data.items(collection).clone()).into_response())
}

async fn create(
    State(state): State<FakeState>,
    headers: HeaderMap,
    collection: Collection,
    mut body: Value,
) -> Result<Response, Response> {
    authorize(&headers)?;
    let mut data = state.data.lock().unwrap();

    if let Collection::Categories = collection {
        let name = body["name"].as_str().unwrap_or_default();

        if name.is_empty() {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "detail": [{
                        "type": "string_too_short",
                        "loc": ["body", "name"],
                        "msg": "String should have at least 1 character"
                    }]
                })),
            )
                .into_response());
        }

        if data
            .categories
            .iter()
            .any(|category| category["name"] == name)
        {
            return Err(detail(StatusCode::BAD_REQUEST, "Category already exists"));
        }
    }

    body["id"] = json!(data.take_id());
    if let Collection::Expenses = collection {
        body = data.with_persons(body);
    }
    data.items(collection).push(body.clone());

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update(
    State(state): State<FakeState>,
    headers: HeaderMap,
    collection: Collection,
    id: i64,
    mut body: Value,
) -> Result<Response, Response> {
    authorize(&headers)?;
    let mut data = state.data.lock().unwrap();

    body["id"] = json!(id);
    if let Collection::Expenses = collection {
        body = data.with_persons(body);
    }

    let item = data
        .items(collection)
        .iter_mut()
        .find(|item| item["id"] == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, collection.not_found()))?;
    *item = body.clone();

    Ok(Json(body).into_response())
}

async fn delete(
    State(state): State<FakeState>,
    headers: HeaderMap,
    collection: Collection,
    id: i64,
) -> Result<Response, Response> {
    authorize(&headers)?;
    let mut data = state.data.lock().unwrap();
    let items = data.items(collection);

    let position = items
        .iter()
        .position(|item| item["id"] == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, collection.not_found()))?;
    items.remove(position);

    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_users(
    State(state): State<FakeState>,
    headers: HeaderMap,
) -> Result<Response, Response> {
    require_admin(&headers)?;
    let data = state.data.lock().unwrap();

    Ok(Json(data.users.clone()).into_response())
}

fn toggle_user_flag(state: &FakeState, id: i64, flag: &str) -> Result<Response, Response> {
    let mut data = state.data.lock().unwrap();
    let user = data
        .users
        .iter_mut()
        .find(|user| user["id"] == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "User not found"))?;

    let flipped = !user[flag].as_bool().unwrap_or_default();
    user[flag] = json!(flipped);

    Ok(Json(user.clone()).into_response())
}

async fn toggle_active(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    require_admin(&headers)?;
    toggle_user_flag(&state, id, "is_active")
}

async fn toggle_role(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    require_admin(&headers)?;
    toggle_user_flag(&state, id, "is_admin")
}

async fn delete_user(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    require_admin(&headers)?;
    let mut data = state.data.lock().unwrap();

    let position = data
        .users
        .iter()
        .position(|user| user["id"] == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "User not found"))?;
    data.users.remove(position);

    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn update_profile(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Response> {
    let is_admin = authorize(&headers)?;
    let mut data = state.data.lock().unwrap();

    let id = data.take_id();
    data.profile_person = Some(json!({
        "id": id,
        "name": body["name"],
        "type": body["type"],
        "rut": body["rut"],
        "relation": "Self"
    }));

    Ok(Json(data.current_user(is_admin)).into_response())
}

async fn scan_receipt(
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, Response> {
    authorize(&headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| detail(StatusCode::BAD_REQUEST, &error.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| detail(StatusCode::BAD_REQUEST, &error.to_string()))?;

        return Ok(Json(json!({
            "amount": 12990.0,
            "rut": "76.123.456-7",
            "provider_name": "Acme Market",
            "raw_text": format!("{file_name} {content_type} {}", bytes.len())
        }))
        .into_response());
    }

    Err(detail(StatusCode::UNPROCESSABLE_ENTITY, "Field required"))
}
