#![forbid(unsafe_code)]
//! eqdel-delete: equality-delete filtering over decoded row batches.
//!
//! Design intent:
//! - A delete file is drained once into an immutable `StructLikeSet` keyed on
//!   the delete schema's field order (`EqualityDeleteFilter::read_equality_deletes`).
//! - Each data file gets its own `EqualityDeletePredicate`, which projects the
//!   data layout onto the delete schema once and then answers `keep(batch, pos)`
//!   without copying row values.
//! - Lazy rows (borrowed from a batch) and materialized rows (owned keys) hash
//!   and compare identically, so either can probe the index.

pub mod column;
pub mod equality;
pub mod error;
pub mod predicate;
pub mod projection;
pub mod row;
pub mod set;
pub mod source;

pub use column::{schema_from_handles, ColumnHandle};
pub use equality::{DeleteFilter, EqualityDeleteFilter};
pub use error::{DeleteError, DeleteResult};
pub use predicate::{AndPredicate, EqualityDeletePredicate, RowPredicate};
pub use projection::{ProjectedRow, StructProjection};
pub use row::{LazyRow, MaterializedRow, StructLike};
pub use set::StructLikeSet;
pub use source::{MemoryPageSource, PagePoll, PageSource};
