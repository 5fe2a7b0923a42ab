//! Database module
//!
//! Connection checks and schema setup. The SQL lives in `migrations/`.

use sqlx::{Executor, PgPool};

const MIGRATION_001_USERS: &str = include_str!("../migrations/0001_create_users.sql");
const MIGRATION_002_STATEMENTS: &str = include_str!("../migrations/0002_create_statements.sql");

/// Advisory lock key serializing concurrent migration runs
const MIGRATION_LOCK_KEY: i64 = 0x5354_4d54;

/// Tables the API cannot run without
const REQUIRED_TABLES: &[&str] = &["users", "statements"];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled migrations. Every statement is `IF NOT EXISTS`, so
/// running this against an up-to-date schema is a no-op.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for (name, sql) in [
        ("0001_create_users", MIGRATION_001_USERS),
        ("0002_create_statements", MIGRATION_002_STATEMENTS),
    ] {
        // Multi-statement scripts go through the simple query protocol
        (&mut *tx).execute(sql).await?;
        tracing::debug!("Applied migration {}", name);
    }

    tx.commit().await?;

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
