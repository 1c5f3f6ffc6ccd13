use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotionError>;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        NotionError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NotionError {
    fn from(err: serde_json::Error) -> Self {
        NotionError::Parse(err.to_string())
    }
}
