// src/repositories/mod.rs
//! Storage gateways. Plain SQL against the pool handed in at construction,
//! rows mapped through `sqlx::FromRow`; no business rules live here.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::SqlitePool;
use validator::Validate;

pub mod asset;

pub use asset::{AssetRepository, PlacementWriteError, SqliteAssetRepository};

/// A flat record stored in one table keyed by a text `id`.
pub trait Record:
    Serialize
    + DeserializeOwned
    + Validate
    + Clone
    + Send
    + Sync
    + Unpin
    + for<'r> sqlx::FromRow<'r, SqliteRow>
    + 'static
{
    /// Table name in the database
    const TABLE: &'static str;

    /// Human readable name for messages, e.g. "location"
    const LABEL: &'static str;

    /// Non-id columns, in the order `bind_columns` binds them
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;

    fn id_mut(&mut self) -> &mut String;

    fn bind_columns<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;
}

/// Basic CRUD over the table of a `Record`.
#[async_trait]
pub trait CrudRepository<T: Record>: Send + Sync {
    async fn create(&self, record: &T) -> Result<(), sqlx::Error>;

    async fn list(&self) -> Result<Vec<T>, sqlx::Error>;

    async fn get_by_id(&self, id: &str) -> Result<Option<T>, sqlx::Error>;

    /// Returns the number of rows touched.
    async fn update(&self, record: &T) -> Result<u64, sqlx::Error>;

    /// Returns the number of rows touched.
    async fn delete(&self, id: &str) -> Result<u64, sqlx::Error>;
}

pub struct SqliteRecordRepository<T> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteRecordRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
    }

    fn insert_sql() -> String {
        let placeholders = vec!["?"; T::COLUMNS.len() + 1].join(", ");
        format!(
            "INSERT INTO {} (id, {}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders
        )
    }

    fn update_sql() -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect();
        format!("UPDATE {} SET {} WHERE id = ?", T::TABLE, assignments.join(", "))
    }
}

#[async_trait]
impl<T: Record> CrudRepository<T> for SqliteRecordRepository<T> {
    async fn create(&self, record: &T) -> Result<(), sqlx::Error> {
        let sql = Self::insert_sql();
        let query = sqlx::query(&sql).bind(record.id().to_string());

        record.bind_columns(query).execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<T>, sqlx::Error> {
        let sql = Self::select_sql();
        sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<T>, sqlx::Error> {
        let sql = format!("{} WHERE id = ?", Self::select_sql());
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update(&self, record: &T) -> Result<u64, sqlx::Error> {
        let sql = Self::update_sql();
        let query = record
            .bind_columns(sqlx::query(&sql))
            .bind(record.id().to_string());

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::models::{AssetLocation, Employee, Vendor};

    #[test]
    fn test_generated_sql() {
        assert_eq!(
            SqliteRecordRepository::<Employee>::insert_sql(),
            "INSERT INTO employee (id, name, gender, address, phone_number) VALUES (?, ?, ?, ?, ?)"
        );
        assert_eq!(
            SqliteRecordRepository::<Vendor>::update_sql(),
            "UPDATE vendors SET name = ?, address = ?, phone = ? WHERE id = ?"
        );
        assert_eq!(
            SqliteRecordRepository::<AssetLocation>::select_sql(),
            "SELECT id, name FROM asset_location"
        );
    }

    #[actix_rt::test]
    async fn test_crud_round_trip() {
        let pool = memory_pool().await;
        let repo = SqliteRecordRepository::<Employee>::new(pool);

        let mut employee = Employee {
            id: "e1".into(),
            name: "Budi".into(),
            gender: "M".into(),
            address: "Jl. Merdeka 1".into(),
            phone_number: "0811111111".into(),
        };
        repo.create(&employee).await.unwrap();

        let fetched = repo.get_by_id("e1").await.unwrap();
        assert_eq!(fetched, Some(employee.clone()));

        employee.address = "Jl. Sudirman 2".into();
        assert_eq!(repo.update(&employee).await.unwrap(), 1);
        assert_eq!(repo.list().await.unwrap(), vec![employee]);

        assert_eq!(repo.delete("e1").await.unwrap(), 1);
        assert!(repo.get_by_id("e1").await.unwrap().is_none());
        assert_eq!(repo.delete("e1").await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_duplicate_id_is_a_store_error() {
        let pool = memory_pool().await;
        let repo = SqliteRecordRepository::<AssetLocation>::new(pool);
        let location = AssetLocation { id: "l1".into(), name: "Gudang".into() };

        repo.create(&location).await.unwrap();
        assert!(repo.create(&location).await.is_err());
    }
}
