//! The delete index: a hash set of materialized rows with value semantics.

use std::collections::HashSet;

use eqdel_core::prelude::Schema;

use crate::row::{MaterializedRow, StructLike};

/// Set of delete keys shaped like one schema.
///
/// Any `StructLike` can probe it; only rows that are not yet present get
/// copied on insert. There is no size bound.
#[derive(Debug, Clone)]
pub struct StructLikeSet {
    rows: HashSet<MaterializedRow>,
    arity: usize,
}

impl StructLikeSet {
    pub fn new(schema: &Schema) -> Self {
        Self::with_capacity(schema, 0)
    }

    pub fn with_capacity(schema: &Schema, capacity: usize) -> Self {
        Self {
            rows: HashSet::with_capacity(capacity),
            arity: schema.len(),
        }
    }

    /// Number of fields every key carries.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a copy of `row`. Returns false if an equal key was already present.
    pub fn insert(&mut self, row: &dyn StructLike) -> bool {
        debug_assert_eq!(row.size(), self.arity, "delete key arity");
        if self.rows.contains(row) {
            return false;
        }
        self.rows.insert(MaterializedRow::copy_of(row))
    }

    pub fn contains(&self, row: &dyn StructLike) -> bool {
        self.rows.contains(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterializedRow> {
        self.rows.iter()
    }
}
