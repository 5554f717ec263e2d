// src/models/vendor.rs
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::query::Query;
use validator::Validate;

use crate::repositories::Record;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Validate, Clone, PartialEq, Default)]
pub struct Vendor {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "name is required and cannot exceed 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "address is required and cannot exceed 100 characters"))]
    pub address: String,

    #[validate(length(min = 1, max = 15, message = "phone is required and cannot exceed 15 characters"))]
    pub phone: String,
}

impl Record for Vendor {
    const TABLE: &'static str = "vendors";
    const LABEL: &'static str = "vendor";
    const COLUMNS: &'static [&'static str] = &["name", "address", "phone"];

    fn id(&self) -> &str {
        &self.id
    }

    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }

    fn bind_columns<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.name.clone())
            .bind(self.address.clone())
            .bind(self.phone.clone())
    }
}
