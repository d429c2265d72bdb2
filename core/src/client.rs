//! Request builder, response parser and blocking façade for the todo API.
//!
//! # Design
//! `TodoClient` holds only the target host and a `Transport`. Each operation
//! has a `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; neither touches the network. The façade
//! methods (`create_todo`, `get_todo`, ...) run the round trip in between.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateTodo, Patch, Todo};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous client for the remote `/todo` resource.
///
/// Safe to share across threads when `T` is; the client itself holds no
/// mutable state.
#[derive(Debug, Clone)]
pub struct TodoClient<T = UreqTransport> {
    host: String,
    transport: T,
}

impl TodoClient<UreqTransport> {
    /// `host` is `host[:port]` without a scheme; requests always use `http`.
    pub fn new(host: &str) -> Self {
        Self::with_transport(host, UreqTransport::new())
    }
}

impl<T> TodoClient<T> {
    pub fn with_transport(host: &str, transport: T) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn collection_url(&self) -> String {
        format!("http://{}/todo", self.host)
    }

    fn item_url(&self, id: i32) -> String {
        format!("http://{}/todo/{id}", self.host)
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_create_todo(&self, title: &str, description: &str) -> Result<HttpRequest> {
        let input = CreateTodo {
            title: title.to_string(),
            description: description.to_string(),
            status: String::new(),
        };
        json_request(HttpMethod::Post, self.collection_url(), &input)
    }

    pub fn build_get_all_todos(&self) -> HttpRequest {
        empty_request(HttpMethod::Get, self.collection_url())
    }

    pub fn build_get_todo(&self, id: i32) -> HttpRequest {
        empty_request(HttpMethod::Get, self.item_url(id))
    }

    pub fn build_update_todo(&self, todo: &Todo) -> Result<HttpRequest> {
        json_request(HttpMethod::Put, self.item_url(todo.id), todo)
    }

    /// The body is always a patch array, even for the single status change.
    pub fn build_update_todo_status(&self, id: i32, status: &str) -> Result<HttpRequest> {
        let patches = vec![Patch::replace_status(status)];
        json_request(HttpMethod::Patch, self.item_url(id), &patches)
    }

    pub fn build_delete_todo(&self, id: i32) -> HttpRequest {
        empty_request(HttpMethod::Delete, self.item_url(id))
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo> {
        check_status(&response, 201)?;
        decode(&response)
    }

    pub fn parse_get_all_todos(&self, response: HttpResponse) -> Result<Vec<Todo>> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_update_todo_status(&self, response: HttpResponse) -> Result<Todo> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, 204)
    }
}

impl<T: Transport> TodoClient<T> {
    /// Create a todo; the returned value carries the server-assigned id.
    pub fn create_todo(&self, title: &str, description: &str) -> Result<Todo> {
        let request = self.build_create_todo(title, description)?;
        self.parse_create_todo(self.round_trip(request)?)
    }

    pub fn get_all_todos(&self) -> Result<Vec<Todo>> {
        self.parse_get_all_todos(self.round_trip(self.build_get_all_todos())?)
    }

    pub fn get_todo(&self, id: i32) -> Result<Todo> {
        self.parse_get_todo(self.round_trip(self.build_get_todo(id))?)
    }

    /// Replace every field of the todo identified by `todo.id`.
    pub fn update_todo(&self, todo: &Todo) -> Result<Todo> {
        let request = self.build_update_todo(todo)?;
        self.parse_update_todo(self.round_trip(request)?)
    }

    pub fn update_todo_status(&self, id: i32, status: &str) -> Result<Todo> {
        let request = self.build_update_todo_status(id, status)?;
        self.parse_update_todo_status(self.round_trip(request)?)
    }

    pub fn delete_todo(&self, id: i32) -> Result<()> {
        self.parse_delete_todo(self.round_trip(self.build_delete_todo(id))?)
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method.as_str();
        let url = request.url.clone();
        tracing::debug!(method, url = %url, "sending request");

        let response = self.transport.execute(request).map_err(|err| {
            tracing::debug!(method, url = %url, error = %err, "request failed");
            err
        })?;
        tracing::debug!(method, url = %url, status = response.status, "received response");
        Ok(response)
    }
}

fn empty_request(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<B: Serialize + ?Sized>(
    method: HttpMethod,
    url: String,
    body: &B,
) -> Result<HttpRequest> {
    let body = serde_json::to_string(body).map_err(ApiError::Encoding)?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![(JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string())],
        body: Some(body),
    })
}

/// Anything but `expected` is a failure; the raw response is logged first.
fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    tracing::warn!(
        expected,
        status = response.status,
        headers = ?response.headers,
        body = %response.body,
        "unexpected response status"
    );
    Err(ApiError::UnexpectedStatus {
        expected,
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<R> {
    serde_json::from_str(&response.body).map_err(ApiError::Decoding)
}
