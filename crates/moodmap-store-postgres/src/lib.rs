//! PostGIS backend for Moodmap.
//!
//! Wraps a [`sqlx::PgPool`]. Every operation is a single autocommitted
//! statement; the geometry column is only ever touched through PostGIS
//! functions, so callers see plain [`moodmap_core::mood::Point`] values.

mod row;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::PgStore;
