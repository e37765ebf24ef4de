//! Column handles: how a logical field is found inside a `RowBatch`.

use eqdel_core::prelude::{DataType, Field, FieldId, RowBatch, Schema};
use serde::{Deserialize, Serialize};

use crate::error::{DeleteError, DeleteResult};

/// A field read by a scan, bound to the batch column that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHandle {
    pub field: Field,
    /// Index into `RowBatch::columns`.
    pub position: usize,
}

impl ColumnHandle {
    pub fn new(field: Field, position: usize) -> Self {
        Self { field, position }
    }

    pub fn id(&self) -> FieldId {
        self.field.id
    }

    pub fn data_type(&self) -> &DataType {
        &self.field.data_type
    }
}

/// Schema whose field `i` is `columns[i].field`.
///
/// Fails if two handles claim the same field ID.
pub fn schema_from_handles(columns: &[ColumnHandle]) -> DeleteResult<Schema> {
    let schema = Schema::new(columns.iter().map(|c| c.field.clone()).collect());
    schema.validate()?;
    Ok(schema)
}

/// Check that `batch` is rectangular and has every column the handles point at.
/// A batch without rows is always accepted since nothing will be read from it.
pub(crate) fn check_batch<'a, I>(columns: I, batch: &RowBatch) -> DeleteResult<()>
where
    I: IntoIterator<Item = &'a ColumnHandle>,
{
    batch.validate().map_err(DeleteError::BatchShape)?;
    if batch.is_empty() {
        return Ok(());
    }
    for col in columns {
        if col.position >= batch.num_columns() {
            return Err(DeleteError::BatchShape(format!(
                "field {} expects batch column {}, batch has {} columns",
                col.id(),
                col.position,
                batch.num_columns()
            )));
        }
    }
    Ok(())
}
