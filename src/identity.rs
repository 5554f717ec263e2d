// src/identity.rs
//! Identifier generation for new records. Ids are always minted here, never by the store.

use uuid::Uuid;

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Keeps a caller-supplied id, mints one when it is missing or blank.
pub fn ensure_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = generate_id();
    }
}
