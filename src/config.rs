use crate::schemas::AppState;
use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://microblog.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Connect to `database_url` and build the shared state
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    let db = Database::connect(options).await?;

    Ok(AppState { db })
}
