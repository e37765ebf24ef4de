#![forbid(unsafe_code)]
//! eqdel: equality-delete filtering for table-format scans.
//!
//! Re-exports the scan-facing surface of `eqdel-core` (schemas, values,
//! batches, config) and `eqdel-delete` (delete index and row predicates).

pub use eqdel_core::prelude::*;
pub use eqdel_delete::{
    ColumnHandle, DeleteError, DeleteFilter, DeleteResult, EqualityDeleteFilter,
    EqualityDeletePredicate, MemoryPageSource, PagePoll, PageSource, RowPredicate,
};
