use anyhow::Context;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config)
        .await
        .context("failed to connect to the database")?;

    let result = DatabaseManager::migrate(&pool).await;
    DatabaseManager::close(&pool).await;
    result?;

    output_success(&output_format, "Database schema is up to date", None)
}
