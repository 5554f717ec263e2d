// src/models/employee.rs
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::query::Query;
use validator::Validate;

use crate::repositories::Record;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Validate, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,

    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "phone number is required"))]
    pub phone_number: String,
}

impl Record for Employee {
    const TABLE: &'static str = "employee";
    const LABEL: &'static str = "employee";
    const COLUMNS: &'static [&'static str] = &["name", "gender", "address", "phone_number"];

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
            .bind(self.gender.clone())
            .bind(self.address.clone())
            .bind(self.phone_number.clone())
    }
}
