use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// Token every request must present in `X-Api-Token`.
pub const API_TOKEN: &str = "test-api-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deployment {
    pub id: i64,
    pub environment_id: i64,
    pub state: String,
    pub deployed_version: String,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct TriggerDeployment {
    pub environment_id: i64,
    #[serde(default)]
    pub deployed_version: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Default)]
pub struct Store {
    pub users: Vec<User>,
    pub deployments: HashMap<i64, Deployment>,
}

pub struct AppState {
    pub store: RwLock<Store>,
    next_id: AtomicI64,
}

pub type Db = Arc<AppState>;

/// Build the router, pre-seeded with three users and two deployments so
/// list endpoints have something to return.
pub fn app() -> Router {
    let store = Store {
        users: vec![
            User {
                id: 1,
                email: "ada@example.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
            User {
                id: 2,
                email: "grace@example.com".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            },
            User {
                id: 3,
                email: "edsger@example.com".to_string(),
                first_name: "Edsger".to_string(),
                last_name: "Dijkstra".to_string(),
            },
        ],
        deployments: HashMap::from([
            (
                1,
                Deployment {
                    id: 1,
                    environment_id: 10,
                    state: "done".to_string(),
                    deployed_version: "a1b2c3".to_string(),
                    comment: None,
                },
            ),
            (
                2,
                Deployment {
                    id: 2,
                    environment_id: 11,
                    state: "done".to_string(),
                    deployed_version: "d4e5f6".to_string(),
                    comment: None,
                },
            ),
        ]),
    };
    let db: Db = Arc::new(AppState {
        store: RwLock::new(store),
        next_id: AtomicI64::new(3),
    });
    Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/{id}", get(get_user))
        .route(
            "/api/v1/deployments",
            get(list_deployments).post(create_deployment),
        )
        .route("/api/v1/deployments/{id}", get(get_deployment))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// DeployBot answers 4xx with plain text, not JSON.
fn check_token(headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    match headers.get("X-Api-Token").and_then(|v| v.to_str().ok()) {
        Some(token) if token == API_TOKEN => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            "Invalid API token".to_string(),
        )),
    }
}

async fn list_users(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    check_token(&headers)?;
    let store = db.store.read().await;
    Ok(Json(json!({ "entries": store.users.clone() })))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<User>, (StatusCode, String)> {
    check_token(&headers)?;
    let store = db.store.read().await;
    store
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))
}

async fn list_deployments(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    check_token(&headers)?;
    let store = db.store.read().await;
    let mut entries: Vec<Deployment> = store.deployments.values().cloned().collect();
    entries.sort_by_key(|d| d.id);
    if let Some(limit) = query.limit {
        entries.truncate(limit);
    }
    Ok(Json(json!({ "entries": entries })))
}

async fn get_deployment(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Deployment>, (StatusCode, String)> {
    check_token(&headers)?;
    let store = db.store.read().await;
    store
        .deployments
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Deployment not found".to_string()))
}

async fn create_deployment(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TriggerDeployment>,
) -> Result<Json<Deployment>, (StatusCode, String)> {
    check_token(&headers)?;
    let deployment = Deployment {
        id: db.next_id.fetch_add(1, Ordering::SeqCst),
        environment_id: input.environment_id,
        state: "pending".to_string(),
        deployed_version: input.deployed_version.unwrap_or_default(),
        comment: input.comment,
    };
    db.store
        .write()
        .await
        .deployments
        .insert(deployment.id, deployment.clone());
    Ok(Json(deployment))
}
