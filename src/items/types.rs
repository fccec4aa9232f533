//! Item types and request validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ValidationError;

/// A persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Item {
    /// Database-assigned identifier.
    pub id: i32,
    /// Item name.
    pub name: String,
    /// Creation time, set by the database. `None` for legacy NULL rows.
    pub created_at: Option<DateTime<Utc>>,
}

/// Documented shape of the `POST /items` body. Parsing goes through
/// [`NewItem::from_json_body`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// Name of the new item.
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of a successful `POST /items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateItemResponse {
    /// Confirmation message.
    pub message: String,
    /// Identifier of the created item.
    pub id: u64,
}

impl CreateItemResponse {
    /// Response for a freshly inserted item.
    pub fn created(id: u64) -> Self {
        Self {
            message: "Item created successfully".to_string(),
            id,
        }
    }
}

/// A validated item about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
}

impl NewItem {
    /// Validate a name: it must be present and non-empty.
    pub fn new(name: Option<String>) -> Result<Self, ValidationError> {
        match name {
            Some(name) if !name.is_empty() => Ok(Self { name }),
            _ => Err(ValidationError::NameRequired),
        }
    }

    /// Validate a JSON request body.
    ///
    /// An empty body reads as `{}`. A `name` that is absent, `null`, `false`,
    /// `0` or `""` is missing; any other non-string `name` is an invalid body.
    pub fn from_json_body(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::NameRequired);
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|_| ValidationError::InvalidBody)?;

        match value.get("name") {
            Some(Value::String(name)) => NewItem::new(Some(name.clone())),
            Some(other) if !is_falsy(other) => Err(ValidationError::InvalidBody),
            _ => Err(ValidationError::NameRequired),
        }
    }

    /// The validated name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
