//! Row views over typed values.
//!
//! `StructLike` is the one capability every row representation exposes:
//! arity plus value-by-position. Equality and hashing are implemented once,
//! on `dyn StructLike`, so a `LazyRow` borrowed from a live batch and a
//! `MaterializedRow` stored in the delete index agree whenever their values do.

use std::borrow::{Borrow, Cow};
use std::hash::{Hash, Hasher};

use eqdel_core::prelude::{RowBatch, Scalar};

use crate::column::ColumnHandle;

pub trait StructLike {
    /// Number of fields.
    fn size(&self) -> usize;

    /// Value of field `pos`. Panics if `pos >= self.size()`.
    fn get(&self, pos: usize) -> Cow<'_, Scalar>;
}

impl<'a> PartialEq for dyn StructLike + 'a {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && (0..self.size()).all(|i| *self.get(i) == *other.get(i))
    }
}

impl<'a> Eq for dyn StructLike + 'a {}

impl<'a> Hash for dyn StructLike + 'a {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.size());
        for i in 0..self.size() {
            Scalar::hash(&self.get(i), state);
        }
    }
}

/// A row read in place from a batch.
///
/// Field `i` is the value in batch column `columns[i].position` at `position`.
/// Nothing is copied; the view is meant to live for one lookup.
#[derive(Debug, Clone, Copy)]
pub struct LazyRow<'a> {
    columns: &'a [ColumnHandle],
    batch: &'a RowBatch,
    position: usize,
}

impl<'a> LazyRow<'a> {
    pub fn new(columns: &'a [ColumnHandle], batch: &'a RowBatch, position: usize) -> Self {
        Self {
            columns,
            batch,
            position,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl StructLike for LazyRow<'_> {
    fn size(&self) -> usize {
        self.columns.len()
    }

    fn get(&self, pos: usize) -> Cow<'_, Scalar> {
        let column = &self.batch.columns[self.columns[pos].position];
        Cow::Borrowed(&column.values[self.position])
    }
}

/// A row that owns copies of its values; used as the stored delete key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedRow {
    values: Box<[Scalar]>,
}

impl MaterializedRow {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self {
            values: values.into_boxed_slice(),
        }
    }

    /// Copy every field of `row`.
    pub fn copy_of(row: &dyn StructLike) -> Self {
        Self::new((0..row.size()).map(|i| row.get(i).into_owned()).collect())
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }
}

impl StructLike for MaterializedRow {
    fn size(&self) -> usize {
        self.values.len()
    }

    fn get(&self, pos: usize) -> Cow<'_, Scalar> {
        Cow::Borrowed(&self.values[pos])
    }
}

// Must match `Hash for dyn StructLike` so lookups through `Borrow` land in
// the same bucket.
impl Hash for MaterializedRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self as &dyn StructLike).hash(state);
    }
}

impl<'a> Borrow<dyn StructLike + 'a> for MaterializedRow {
    fn borrow(&self) -> &(dyn StructLike + 'a) {
        self
    }
}
