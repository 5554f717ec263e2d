// src/models/asset_location.rs
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::query::Query;
use validator::Validate;

use crate::repositories::Record;

/// A storage location that asset units can be placed in.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Validate, Clone, PartialEq, Default)]
pub struct AssetLocation {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "location name is required and cannot exceed 100 characters"))]
    pub name: String,
}

impl Record for AssetLocation {
    const TABLE: &'static str = "asset_location";
    const LABEL: &'static str = "location";
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
