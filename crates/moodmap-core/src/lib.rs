//! Core types and trait definitions for Moodmap.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub mod error;
pub mod geojson;
pub mod mood;
pub mod rate_limit;
pub mod store;

pub use error::{Error, Result};
