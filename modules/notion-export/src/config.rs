use std::env;
use std::path::PathBuf;

use crate::error::{ExportError, Result};

pub const DEFAULT_OUTPUT_PATH: &str = "eventi_notion.csv";

/// Export configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub notion_token: String,
    pub database_id: String,
    pub output_path: PathBuf,
    pub api_base_url: String,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    /// `database_id` and `output_path`, when given, win over their variables.
    pub fn from_env(database_id: Option<String>, output_path: Option<PathBuf>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_id = match database_id {
            Some(id) => non_blank("NOTION_DATABASE_ID", id)?,
            None => required_env("NOTION_DATABASE_ID")?,
        };

        let config = Self {
            notion_token: required_env("NOTION_TOKEN")?,
            database_id,
            output_path: output_path
                .or_else(|| optional_env("NOTION_EXPORT_OUTPUT").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            api_base_url: optional_env("NOTION_API_BASE_URL")
                .unwrap_or_else(|| notion_client::DEFAULT_BASE_URL.to_string()),
        };

        config.log_keys();
        Ok(config)
    }

    pub fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  NOTION_TOKEN: {}", preview(&self.notion_token));
        tracing::info!("  NOTION_DATABASE_ID: {}", self.database_id);
        tracing::info!("  NOTION_EXPORT_OUTPUT: {}", self.output_path.display());
        tracing::info!("  NOTION_API_BASE_URL: {}", self.api_base_url);
    }
}

fn preview(val: &str) -> String {
    let n = val.chars().take(5).map(char::len_utf8).sum();
    format!("{}...({} chars)", &val[..n], val.chars().count())
}

fn required_env(key: &str) -> Result<String> {
    let val = env::var(key).map_err(|_| ExportError::Config(key.to_string()))?;
    non_blank(key, val)
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn non_blank(key: &str, val: String) -> Result<String> {
    if val.trim().is_empty() {
        return Err(ExportError::Config(key.to_string()));
    }
    Ok(val)
}
