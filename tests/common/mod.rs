//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use statement_ledger::db;

/// Setup test database - apply migrations.
///
/// Tables are not truncated: tests run concurrently and each one seeds its
/// own users.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    db::apply_migrations(&pool).await.expect("Failed to apply migrations");

    pool
}

/// Insert a user row with a unique email and return its id
pub async fn seed_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    let email = format!("{}@ledger.test", id);

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password)
        VALUES ($1, 'John Due', $2, 'unused')
        "#
    )
    .bind(id)
    .bind(&email)
    .execute(pool)
    .await
    .expect("Failed to seed user");

    id
}
