//! Re-indexing rows from one field-ID layout into another.
//!
//! `StructProjection::create(source, target)` resolves every target field ID
//! against the source once, producing a position table. Applying it is a
//! plain index lookup per field; unread fields are never touched, so a
//! projected `LazyRow` stays lazy.

use std::borrow::Cow;

use eqdel_core::prelude::{DataType, Field, Scalar, Schema};

use crate::error::{DeleteError, DeleteResult};
use crate::row::StructLike;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructProjection {
    /// `positions[i]` is the source index of target field `i`.
    positions: Vec<usize>,
    /// Set when a struct field keeps a different set (or order) of children
    /// in the target than in the source.
    nested: Vec<Option<StructProjection>>,
}

impl StructProjection {
    /// Build a projection from rows shaped like `source` to rows shaped like `target`.
    ///
    /// Every target field ID must exist in `source` with a compatible type.
    pub fn create(source: &Schema, target: &Schema) -> DeleteResult<Self> {
        Self::for_fields(&source.fields, &target.fields)
    }

    fn for_fields(source: &[Field], target: &[Field]) -> DeleteResult<Self> {
        let mut positions = Vec::with_capacity(target.len());
        let mut nested = Vec::with_capacity(target.len());

        for t in target {
            let pos = source.iter().position(|s| s.id == t.id).ok_or_else(|| {
                DeleteError::SchemaMismatch {
                    field_id: t.id,
                    name: t.name.clone(),
                }
            })?;
            let s = &source[pos];

            let inner = match (&s.data_type, &t.data_type) {
                (a, b) if same_shape(a, b) => None,
                (DataType::Struct(s_children), DataType::Struct(t_children)) => {
                    Some(Self::for_fields(s_children, t_children)?)
                }
                (found, expected) => {
                    return Err(DeleteError::TypeMismatch {
                        field_id: t.id,
                        expected: format!("{expected:?}"),
                        found: format!("{found:?}"),
                    })
                }
            };

            positions.push(pos);
            nested.push(inner);
        }

        Ok(Self { positions, nested })
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Number of fields in projected rows.
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    /// View `row` through this projection.
    pub fn wrap<'a, R>(&'a self, row: &'a R) -> ProjectedRow<'a, R>
    where
        R: StructLike + ?Sized,
    {
        ProjectedRow {
            projection: self,
            row,
        }
    }

    /// Project the children of a struct value. Children missing from a short
    /// value read as null.
    fn project_values(&self, values: &[Scalar]) -> Vec<Scalar> {
        self.positions
            .iter()
            .zip(&self.nested)
            .map(|(&pos, inner)| match (inner, values.get(pos)) {
                (Some(inner), Some(Scalar::Struct(children))) => {
                    Scalar::Struct(inner.project_values(children))
                }
                (_, Some(v)) => v.clone(),
                (_, None) => Scalar::Null,
            })
            .collect()
    }
}

/// Type equality by field ID and structure. Names and nullability of nested
/// fields are ignored.
fn same_shape(a: &DataType, b: &DataType) -> bool {
    match (a, b) {
        (DataType::Struct(x), DataType::Struct(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|(f, g)| f.id == g.id && same_shape(&f.data_type, &g.data_type))
        }
        (DataType::List(x), DataType::List(y)) => {
            x.id == y.id && same_shape(&x.data_type, &y.data_type)
        }
        _ => a == b,
    }
}

/// A row seen through a `StructProjection`.
#[derive(Debug)]
pub struct ProjectedRow<'a, R: ?Sized> {
    projection: &'a StructProjection,
    row: &'a R,
}

impl<R> StructLike for ProjectedRow<'_, R>
where
    R: StructLike + ?Sized,
{
    fn size(&self) -> usize {
        self.projection.size()
    }

    fn get(&self, pos: usize) -> Cow<'_, Scalar> {
        let value = self.row.get(self.projection.positions[pos]);
        if let Some(inner) = &self.projection.nested[pos] {
            if let Scalar::Struct(children) = &*value {
                return Cow::Owned(Scalar::Struct(inner.project_values(children)));
            }
        }
        value
    }
}
