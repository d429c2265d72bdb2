//! Wire-format DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the integration tests catch any drift between the two crates. Missing
//! fields in a response decode to their zero value, so a server that omits an
//! empty `status` still yields a `Todo`. Only JSON objects decode as a `Todo`;
//! serde's derive would otherwise also accept a positional array.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single todo item as represented by the server.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct TodoFields {
    id: i32,
    title: String,
    description: String,
    status: String,
}

/// Accepts JSON objects only.
struct ObjectVisitor;

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = Map<String, Value>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a todo object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut object = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            object.insert(key, value);
        }
        Ok(object)
    }
}

impl<'de> Deserialize<'de> for Todo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = deserializer.deserialize_map(ObjectVisitor)?;
        let fields = TodoFields::deserialize(Value::Object(object)).map_err(de::Error::custom)?;
        Ok(Todo {
            id: fields.id,
            title: fields.title,
            description: fields.description,
            status: fields.status,
        })
    }
}

/// Request payload for creating a new todo. The server assigns the id; the
/// status starts out empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: String,
}

/// One JSON Patch operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patch {
    pub op: String,
    pub path: String,
    pub value: String,
}

impl Patch {
    /// A `replace` operation on `/status`.
    pub fn replace_status(status: &str) -> Self {
        Self {
            op: "replace".to_string(),
            path: "/status".to_string(),
            value: status.to_string(),
        }
    }
}
