// src/models/mod.rs

pub mod asset;
pub mod asset_category;
pub mod asset_location;
pub mod dto;
pub mod employee;
pub mod vendor;

// Re-export so structs are reachable as crate::models::StructName
pub use asset::*;
pub use asset_category::*;
pub use asset_location::*;
pub use dto::*;
pub use employee::*;
pub use vendor::*;
