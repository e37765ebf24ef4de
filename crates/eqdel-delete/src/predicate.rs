//! Row predicates applied on the scan path.
//!
//! `keep(batch, position)` is evaluated once per row, so implementations must
//! not allocate for flat keys and must not mutate shared state.

use std::sync::Arc;

use eqdel_core::prelude::RowBatch;

use crate::column::{check_batch, ColumnHandle};
use crate::error::{DeleteError, DeleteResult};
use crate::projection::StructProjection;
use crate::row::LazyRow;
use crate::set::StructLikeSet;

/// Decides whether a row of a batch survives.
pub trait RowPredicate: Send + Sync {
    /// True if the row at `position` is kept.
    ///
    /// # Panics
    ///
    /// Panics if `position >= batch.num_rows()` or if `batch` lacks a column
    /// this predicate reads. Call `check_batch` once per batch first, or use
    /// `selection`/`filter_batch`, which check and return `BatchShape` instead.
    fn keep(&self, batch: &RowBatch, position: usize) -> bool;

    /// Verify `batch` can be evaluated by `keep` without going out of range.
    fn check_batch(&self, _batch: &RowBatch) -> DeleteResult<()> {
        Ok(())
    }

    /// Keep a row only if both predicates keep it.
    fn and<P>(self, other: P) -> AndPredicate<Self, P>
    where
        Self: Sized,
        P: RowPredicate,
    {
        AndPredicate {
            left: self,
            right: other,
        }
    }

    /// `keep` for every row of the batch, in row order.
    fn selection(&self, batch: &RowBatch) -> DeleteResult<Vec<bool>> {
        self.check_batch(batch)?;
        Ok((0..batch.num_rows()).map(|p| self.keep(batch, p)).collect())
    }

    /// Copy of `batch` holding only the kept rows, all columns.
    fn filter_batch(&self, batch: &RowBatch) -> DeleteResult<RowBatch> {
        let keep = self.selection(batch)?;
        batch.filter_rows(&keep).map_err(DeleteError::BatchShape)
    }
}

impl<P: RowPredicate + ?Sized> RowPredicate for Box<P> {
    fn keep(&self, batch: &RowBatch, position: usize) -> bool {
        (**self).keep(batch, position)
    }

    fn check_batch(&self, batch: &RowBatch) -> DeleteResult<()> {
        (**self).check_batch(batch)
    }
}

impl<P: RowPredicate + ?Sized> RowPredicate for Arc<P> {
    fn keep(&self, batch: &RowBatch, position: usize) -> bool {
        (**self).keep(batch, position)
    }

    fn check_batch(&self, batch: &RowBatch) -> DeleteResult<()> {
        (**self).check_batch(batch)
    }
}

#[derive(Debug, Clone)]
pub struct AndPredicate<A, B> {
    left: A,
    right: B,
}

impl<A: RowPredicate, B: RowPredicate> RowPredicate for AndPredicate<A, B> {
    fn keep(&self, batch: &RowBatch, position: usize) -> bool {
        self.left.keep(batch, position) && self.right.keep(batch, position)
    }

    fn check_batch(&self, batch: &RowBatch) -> DeleteResult<()> {
        self.left.check_batch(batch)?;
        self.right.check_batch(batch)
    }
}

/// Drops rows whose identifier columns match a key in the delete index.
#[derive(Debug, Clone)]
pub struct EqualityDeletePredicate {
    columns: Vec<ColumnHandle>,
    projection: StructProjection,
    deletes: Arc<StructLikeSet>,
}

impl EqualityDeletePredicate {
    pub(crate) fn new(
        columns: Vec<ColumnHandle>,
        projection: StructProjection,
        deletes: Arc<StructLikeSet>,
    ) -> Self {
        Self {
            columns,
            projection,
            deletes,
        }
    }

    /// The data layout this predicate reads.
    pub fn columns(&self) -> &[ColumnHandle] {
        &self.columns
    }

    pub fn projection(&self) -> &StructProjection {
        &self.projection
    }
}

impl RowPredicate for EqualityDeletePredicate {
    fn keep(&self, batch: &RowBatch, position: usize) -> bool {
        let row = LazyRow::new(&self.columns, batch, position);
        !self.deletes.contains(&self.projection.wrap(&row))
    }

    fn check_batch(&self, batch: &RowBatch) -> DeleteResult<()> {
        // Only the identifier columns are ever read.
        let used = self.projection.positions().iter().map(|&i| &self.columns[i]);
        check_batch(used, batch)
    }
}
