// src/models/asset_category.rs
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::query::Query;
use validator::Validate;

use crate::repositories::Record;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Validate, Clone, PartialEq, Default)]
pub struct AssetCategory {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "name is required and cannot exceed 100 characters"))]
    pub name: String,
}

impl Record for AssetCategory {
    const TABLE: &'static str = "asset_categories";
    const LABEL: &'static str = "category";
    const COLUMNS: &'static [&'static str] = &["name"];

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
        query.bind(self.name.clone())
    }
}
