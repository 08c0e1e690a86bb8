use std::{
    collections::BTreeMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

const DEFAULT_PER_PAGE: usize = 30;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub admin: bool,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub login: String,
    pub name: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub admin: Option<bool>,
}

#[derive(Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Avatar {
    pub user_id: u64,
    pub size: usize,
    pub content_type: Option<String>,
}

#[derive(Clone, Default)]
pub struct Db {
    users: Arc<RwLock<BTreeMap<u64, User>>>,
    next_id: Arc<AtomicU64>,
}

impl Db {
    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/{id}/avatar", post(upload_avatar))
        .with_state(Db::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Bind the server to an ephemeral local port and serve it from a dedicated
/// thread for the rest of the process.
pub fn spawn() -> Result<SocketAddr, std::io::Error> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        let served = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .and_then(|rt| rt.block_on(serve_std(std_listener)));
        if let Err(err) = served {
            tracing::error!(%err, "mock server stopped");
        }
    });

    Ok(addr)
}

async fn serve_std(listener: std::net::TcpListener) -> Result<(), std::io::Error> {
    run(TcpListener::from_std(listener)?).await
}

async fn list_users(
    State(db): State<Db>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    let page = pagination.page.unwrap_or(1).max(1);
    let per_page = pagination.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
    let users = db.users.read().await;
    let total = users.len();
    let slice: Vec<User> = users
        .values()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect();
    ([("x-total-count", total.to_string())], Json(slice))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: db.allocate_id(),
        login: input.login,
        name: input.name,
        admin: input.admin,
    };
    db.users.write().await.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    let users = db.users.read().await;
    users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, StatusCode> {
    let mut users = db.users.write().await;
    let user = users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        user.name = Some(name);
    }
    if let Some(admin) = input.admin {
        user.admin = admin;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut users = db.users.write().await;
    users.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn upload_avatar(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Avatar>), StatusCode> {
    if !db.users.read().await.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Ok((
        StatusCode::CREATED,
        Json(Avatar {
            user_id: id,
            size: body.len(),
            content_type,
        }),
    ))
}
