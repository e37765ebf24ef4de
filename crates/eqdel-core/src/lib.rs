#![forbid(unsafe_code)]
//! eqdel-core: pure data types shared by the equality-delete crates.
//!
//! Responsibilities:
//! - Field-ID based schemas (`Schema`, `Field`, `DataType`) and ID selection.
//! - Typed scalar values with value-based equality and hashing.
//! - The `RowBatch` page representation handed over by file readers.
//! - Filter configuration and stable schema fingerprints.
//!
//! **No I/O, no async** here.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
