use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use notion_export::{run_export, Config};

#[derive(Parser)]
#[command(about = "Export Event/Date rows from a Notion database to CSV")]
struct Cli {
    /// Output CSV path (overrides NOTION_EXPORT_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Database to export (overrides NOTION_DATABASE_ID)
    #[arg(long)]
    database_id: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("notion_export=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.database_id, cli.output)?;

    info!(database_id = %config.database_id, "Notion export starting...");

    let summary = run_export(&config).await?;

    println!(
        "Export completed successfully! {} rows written to {}",
        summary.rows,
        summary.output_path.display()
    );

    Ok(())
}
