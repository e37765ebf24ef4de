//! Convenient re-exports for downstream crates.

pub use crate::config::DeleteFilterConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::FieldId;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, RowBatch, Scalar};
