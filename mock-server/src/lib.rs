use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Patch {
    pub op: String,
    pub path: String,
    pub value: String,
}

/// In-memory todo table. Ids are handed out sequentially starting at 1.
#[derive(Debug, Default)]
pub struct Store {
    last_id: i32,
    todos: BTreeMap<i32, Todo>,
}

impl Store {
    /// Store a new todo under the next id. Returns `None` once ids run out.
    pub fn insert(&mut self, input: CreateTodo) -> Option<Todo> {
        let id = self.last_id.checked_add(1)?;
        self.last_id = id;
        let todo = Todo {
            id,
            title: input.title,
            description: input.description,
            status: input.status,
        };
        self.todos.insert(id, todo.clone());
        Some(todo)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/todo", get(list_todos).post(create_todo))
        .route(
            "/todo/{id}",
            get(get_todo)
                .put(update_todo)
                .patch(patch_todo)
                .delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    let todo = db.write().await.insert(input).ok_or_else(|| {
        tracing::error!("todo ids exhausted");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<i32>,
) -> Result<Json<Todo>, StatusCode> {
    let store = db.read().await;
    store.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Full replace. The id in the path wins over any id in the body.
async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(input): Json<Todo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    *todo = Todo { id, ..input };
    Ok(Json(todo.clone()))
}

async fn patch_todo(
    State(db): State<Db>,
    Path(id): Path<i32>,
    Json(patches): Json<Vec<Patch>>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let patched = apply_patches(todo, &patches).ok_or_else(|| {
        tracing::warn!(id, ?patches, "rejected patch");
        StatusCode::BAD_REQUEST
    })?;
    *todo = patched;
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .todos
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Apply `replace` operations to a copy of `todo`. Returns `None`, leaving
/// the original untouched, if any operation is unsupported.
pub fn apply_patches(todo: &Todo, patches: &[Patch]) -> Option<Todo> {
    let mut patched = todo.clone();
    for patch in patches {
        if patch.op != "replace" {
            return None;
        }
        let field = match patch.path.as_str() {
            "/title" => &mut patched.title,
            "/description" => &mut patched.description,
            "/status" => &mut patched.status,
            _ => return None,
        };
        *field = patch.value.clone();
    }
    Some(patched)
}
