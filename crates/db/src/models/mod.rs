//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where rows are created from Rust, a create DTO.

pub mod media_asset;
pub mod post;
pub mod post_meta;
