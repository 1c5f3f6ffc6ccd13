use std::collections::HashMap;

use serde::Deserialize;

/// One page of results from a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// A database row. Notion calls these pages.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A typed property value, discriminated by the API's `type` field.
/// Types the exporter never reads decode as `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Date { date: Option<DateValue> },
    #[serde(other)]
    Other,
}

impl PropertyValue {
    /// The API's name for this property type, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Title { .. } => "title",
            PropertyValue::RichText { .. } => "rich_text",
            PropertyValue::Date { .. } => "date",
            PropertyValue::Other => "other",
        }
    }
}

/// A rich text segment. Only `text`-typed segments carry `text`; mentions
/// and equations leave it `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    pub plain_text: Option<String>,
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub content: String,
}

/// Value of a date property. `start` is an ISO 8601 date or datetime.
#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: String,
}

/// Database metadata from `GET /databases/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
}

impl Database {
    /// First title segment's plain text, or "Untitled" for unnamed databases.
    pub fn display_title(&self) -> &str {
        self.title
            .first()
            .and_then(|t| t.plain_text.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
    }
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
