pub mod error;
pub mod types;

pub use error::{NotionError, Result};
pub use types::{
    ApiErrorBody, Database, DateValue, Page, PropertyValue, QueryResponse, RichText, TextContent,
};

use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version pinned on every request via the `Notion-Version` header.
const NOTION_VERSION: &str = "2022-06-28";

pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch database metadata. Fails if the integration can't see the database.
    pub async fn retrieve_database(&self, database_id: &str) -> Result<Database> {
        let url = format!("{}/databases/{}", self.base_url, database_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;

        read_json(resp).await
    }

    /// Query a database with no filter or sort. Returns only the first page
    /// of results; `has_more` and `next_cursor` report whether more exist.
    pub async fn query_database(&self, database_id: &str) -> Result<QueryResponse> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let page: QueryResponse = read_json(resp).await?;
        tracing::debug!(
            database_id,
            results = page.results.len(),
            has_more = page.has_more,
            "Database query returned"
        );
        Ok(page)
    }
}

/// Map a non-2xx response to `NotionError::Api`, otherwise decode the body.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(api_error(status.as_u16(), body));
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn api_error(status: u16, body: String) -> NotionError {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) => NotionError::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => NotionError::Api {
            status,
            code: "unknown".to_string(),
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notion_client_new() {
        let client = NotionClient::new("secret_test");
        assert_eq!(client.token, "secret_test");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let client = NotionClient::new("secret_test").with_base_url("http://localhost:9999/v1/");
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
    }

    #[test]
    fn test_api_error_uses_json_body() {
        let err = api_error(
            401,
            r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#
                .to_string(),
        );
        match err {
            NotionError::Api { status, code, message } => {
                assert_eq!(status, 401);
                assert_eq!(code, "unauthorized");
                assert_eq!(message, "API token is invalid.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(502, "Bad Gateway".to_string());
        assert_eq!(
            err.to_string(),
            "API error (status 502, code unknown): Bad Gateway"
        );
    }
}
