// src/db.rs - Database schema setup

use sqlx::SqlitePool;
use anyhow::Result;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Unit rows reference assets and locations; SQLite needs this per connection
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS asset_categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 100)
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS asset_location (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 100)
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS asset (
            id TEXT PRIMARY KEY,
            category_id TEXT NOT NULL,
            transaction_detail_id TEXT,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 100),
            description TEXT NOT NULL DEFAULT '',
            image_url TEXT NOT NULL DEFAULT '',
            qty INTEGER NOT NULL CHECK(qty >= 0),
            created_at DATETIME NOT NULL,
            FOREIGN KEY (category_id) REFERENCES asset_categories (id)
        )
        "#,
    )
        .execute(pool)
        .await?;

    // One row per physical unit of an asset
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS asset_details (
            id TEXT PRIMARY KEY,
            asset_id TEXT NOT NULL,
            location_id TEXT NOT NULL,
            status INTEGER NOT NULL,
            updated_at DATETIME,
            removed_at DATETIME,
            FOREIGN KEY (asset_id) REFERENCES asset (id) ON DELETE CASCADE,
            FOREIGN KEY (location_id) REFERENCES asset_location (id)
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            gender TEXT NOT NULL,
            address TEXT NOT NULL,
            phone_number TEXT NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vendors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            phone TEXT NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    // ==================== CREATE INDEXES ====================

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_asset_details_asset_status ON asset_details(asset_id, status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_asset_category_id ON asset(category_id)")
        .execute(pool)
        .await?;

    log::info!("Database schema is up to date");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_pool;

    #[actix_rt::test]
    async fn test_migrations_create_all_tables() {
        let pool = memory_pool().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        for table in [
            "asset",
            "asset_categories",
            "asset_details",
            "asset_location",
            "employee",
            "vendors",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing table {}", table);
        }
    }

    #[actix_rt::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_pool().await;
        assert!(super::run_migrations(&pool).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_unit_rows_require_existing_location() {
        let pool = memory_pool().await;

        sqlx::query("INSERT INTO asset_categories (id, name) VALUES ('c1', 'Laptop')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO asset (id, category_id, name, qty, created_at) VALUES ('a1', 'c1', 'ThinkPad', 1, datetime('now'))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = sqlx::query(
            "INSERT INTO asset_details (id, asset_id, location_id, status) VALUES ('u1', 'a1', 'missing', 1)",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
