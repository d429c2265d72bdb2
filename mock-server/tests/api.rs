use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Todo};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn send(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = app().oneshot(empty_request("GET", "/todo")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_first_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/todo",
            r#"{"title":"Buy milk","description":"2% milk"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(
        todo,
        Todo {
            id: 1,
            title: "Buy milk".to_string(),
            description: "2% milk".to_string(),
            status: String::new(),
        }
    );
}

#[tokio::test]
async fn create_todo_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/todo", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_todo_not_found() {
    let resp = app().oneshot(empty_request("GET", "/todo/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_todo_non_integer_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/todo/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_todo_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/todo/42",
            r#"{"id":42,"title":"Nope","description":"","status":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_todo_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/todo/42",
            r#"[{"op":"replace","path":"/status","value":"done"}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_todo_unknown_path_returns_400() {
    let mut app = app();
    let resp = send(
        &mut app,
        json_request("POST", "/todo", r#"{"title":"Walk dog","description":""}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
        &mut app,
        json_request(
            "PATCH",
            "/todo/1",
            r#"[{"op":"replace","path":"/owner","value":"me"}]"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/todo/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let mut app = app();

    // create
    let resp = send(
        &mut app,
        json_request("POST", "/todo", r#"{"title":"Walk dog","description":"leash"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = body_json(resp).await;
    let id = created.id;

    // second todo gets the next id
    let resp = send(
        &mut app,
        json_request("POST", "/todo", r#"{"title":"Feed cat","description":""}"#),
    )
    .await;
    let other: Todo = body_json(resp).await;
    assert_eq!(other.id, id + 1);

    // list
    let resp = send(&mut app, empty_request("GET", "/todo")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.len(), 2);

    // full replace, body id is ignored in favour of the path id
    let resp = send(
        &mut app,
        json_request(
            "PUT",
            &format!("/todo/{id}"),
            r#"{"id":999,"title":"Walk cat","description":"no leash","status":"doing"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "Walk cat");
    assert_eq!(updated.status, "doing");

    // status patch
    let resp = send(
        &mut app,
        json_request(
            "PATCH",
            &format!("/todo/{id}"),
            r#"[{"op":"replace","path":"/status","value":"done"}]"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Todo = body_json(resp).await;
    assert_eq!(patched.status, "done");
    assert_eq!(patched.title, "Walk cat"); // unchanged

    // the other todo is untouched
    let resp = send(&mut app, empty_request("GET", &format!("/todo/{}", other.id))).await;
    let fetched: Todo = body_json(resp).await;
    assert_eq!(fetched, other);

    // delete
    let resp = send(&mut app, empty_request("DELETE", &format!("/todo/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = send(&mut app, empty_request("GET", &format!("/todo/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete
    let resp = send(&mut app, empty_request("GET", "/todo")).await;
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos, vec![other]);
}
