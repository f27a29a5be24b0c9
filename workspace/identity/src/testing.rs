use crate::password::use_minimum_cost;
use crate::validation::NewUser;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// In-memory SQLite database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    use_minimum_cost(true);

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Log to stderr at the level named by RUST_LOG, WARN otherwise.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

pub fn example_user() -> NewUser {
    NewUser {
        name: "Example User".to_string(),
        email: "user@example.com".to_string(),
        password: "foobar".to_string(),
        password_confirmation: Some("foobar".to_string()),
    }
}
