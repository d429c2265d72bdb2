//! Blocking execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the single seam between the pure request/response mapping
//! in `client` and the network. Implementations must return non-2xx responses
//! as `HttpResponse` data; only failures to obtain a response at all are
//! `ApiError::Transport`.

use ureq::{Agent, RequestBuilder};

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Default transport backed by a blocking `ureq::Agent`.
///
/// Cloning is cheap; clones share the agent's connection pool.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Agent with ureq's defaults, except that 4xx/5xx responses are returned
    /// as data rather than `Err`.
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent, e.g. one with timeouts. The agent must
    /// be built with `http_status_as_error(false)`, otherwise error statuses
    /// surface as `ApiError::Transport`.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => {
                with_headers(self.agent.patch(&url), &headers).send_empty()
            }
        };
        let mut response = result.map_err(ApiError::transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(ApiError::transport)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
