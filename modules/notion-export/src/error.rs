use notion_client::NotionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0} is required")]
    Config(String),

    #[error(transparent)]
    Notion(#[from] NotionError),

    #[error("Malformed property {property:?} on page {page_id}: {reason}")]
    MalformedProperty {
        page_id: String,
        property: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
