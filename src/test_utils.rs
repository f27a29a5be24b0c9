#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use identity::{password::use_minimum_cost, users, NewUser};
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const SEED_PASSWORD: &str = "foobar";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        // Hashing at production cost dominates test time.
        use_minimum_cost(true);

        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Insert a user through the identity layer with the seed password
    pub async fn seed_user(db: &DatabaseConnection, name: &str, email: &str) -> user::Model {
        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: SEED_PASSWORD.to_string(),
            password_confirmation: Some(SEED_PASSWORD.to_string()),
        };
        users::create_user(db, new_user)
            .await
            .expect("Failed to seed user")
            .user
    }

    /// Create AppState for testing with two seeded users
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        seed_user(&db, "Michael Example", "michael@example.com").await;
        seed_user(&db, "Sterling Archer", "duchess@example.gov").await;

        AppState { db }
    }

    /// Tracing to STDERR at the RUST_LOG level, WARN when unset.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();
        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Router over an existing state, for tests that inspect the database
    pub fn app_for(state: AppState) -> Router {
        create_router(state)
    }
}
