#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use paleoanthro::{app, AppState, Config};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::Level;

/// Meeting year the test configuration accepts abstracts for
pub const TEST_ABSTRACT_YEAR: i32 = 2999;

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        bind_addr: ([127, 0, 0, 1], 0).into(),
        db_max_connections: 5,
        static_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        abstract_year: TEST_ABSTRACT_YEAR,
        log_level: Level::INFO,
    }
}

/// Create a migrated test database pool, or `None` when `DATABASE_URL`
/// is not set (database tests are skipped).
pub async fn create_test_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to create test database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Pool that never connects unless a handler touches the database
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://paleoanthro@localhost/paleoanthro_unused")
        .expect("lazy pool")
}

/// Create the application router for testing
pub fn create_test_app(pool: PgPool) -> Router {
    let url = std::env::var("DATABASE_URL").unwrap_or_default();
    app(AppState::new(pool, test_config(&url)))
}
