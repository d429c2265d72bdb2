//! Blocking HTTP/JSON client for the remote todo service.
//!
//! # Overview
//! `TodoClient` exposes create, list, get, update, status patch and delete
//! against the `/todo` resource. Every operation is a single round trip:
//! serialize the payload, send, check the one expected status code, decode.
//!
//! # Design
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`). Both halves are pure and public,
//!   so a host can run the I/O itself.
//! - The `create_todo`, `get_todo`, ... methods glue the halves together
//!   through a `Transport`. `UreqTransport` is the default.
//! - Any status other than the expected one is `ApiError::UnexpectedStatus`;
//!   there is no retry and no partial result.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, Patch, Todo};
