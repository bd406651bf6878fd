//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

use serde::{Deserialize, Deserializer};

pub mod dashboard;
pub mod note;
pub mod note_edit_request;
pub mod profile;
pub mod project;
pub mod session;
pub mod task;

/// Deserialize a clearable patch field: absent stays `None` (with
/// `#[serde(default)]`), `null` becomes `Some(None)`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
