//! Equality delete filter: one per delete file.
//!
//! `read_equality_deletes` drains a page source of delete records into a
//! frozen `StructLikeSet`. The filter then hands out one predicate per data
//! layout; all of them share the same index.

use std::sync::Arc;

use eqdel_core::prelude::{DeleteFilterConfig, Hash256, RowBatch, Schema};

use crate::column::{check_batch, schema_from_handles, ColumnHandle};
use crate::error::{DeleteError, DeleteResult};
use crate::predicate::{EqualityDeletePredicate, RowPredicate};
use crate::projection::StructProjection;
use crate::row::LazyRow;
use crate::set::StructLikeSet;
use crate::source::{PagePoll, PageSource};

/// A delete file as seen by the scan: what it needs, and how to apply it.
pub trait DeleteFilter: Send + Sync {
    /// Columns a data layout must provide before `create_predicate` can succeed.
    fn schema(&self) -> &Schema;

    /// Predicate over batches laid out as `columns`.
    fn create_predicate(&self, columns: &[ColumnHandle]) -> DeleteResult<Box<dyn RowPredicate>>;
}

#[derive(Debug, Clone)]
pub struct EqualityDeleteFilter {
    schema: Schema,
    deletes: Arc<StructLikeSet>,
    fingerprint: Hash256,
    rows_read: u64,
}

#[derive(Debug, Default)]
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
struct DrainStats {
    rows: u64,
    pages: u64,
    pending_polls: u64,
}

impl EqualityDeleteFilter {
    /// Build a filter from a delete file, using the default config.
    ///
    /// `columns` describes the delete file's pages; its field IDs are the
    /// file's equality field IDs and are resolved against `table_schema`.
    pub fn read_equality_deletes<S>(
        source: S,
        columns: &[ColumnHandle],
        table_schema: &Schema,
    ) -> DeleteResult<Self>
    where
        S: PageSource,
    {
        Self::read_equality_deletes_with_config(
            source,
            columns,
            table_schema,
            &DeleteFilterConfig::default(),
        )
    }

    pub fn read_equality_deletes_with_config<S>(
        mut source: S,
        columns: &[ColumnHandle],
        table_schema: &Schema,
        config: &DeleteFilterConfig,
    ) -> DeleteResult<Self>
    where
        S: PageSource,
    {
        config.validate()?;
        if columns.is_empty() {
            return Err(eqdel_core::Error::Schema(
                "equality delete file declares no identifier columns".into(),
            )
            .into());
        }

        let file_schema = schema_from_handles(columns)?;
        // Leaf IDs, so a struct column read with only some children selects
        // just those children.
        let schema = table_schema.select(file_schema.leaf_field_ids())?;
        let projection = StructProjection::create(&file_schema, &schema)?;
        let fingerprint = schema.fingerprint()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            fields = ?schema.field_ids(),
            fingerprint = %fingerprint.short_hex(),
            "resolved equality delete schema"
        );

        let mut deletes = StructLikeSet::with_capacity(&schema, config.initial_capacity);
        let stats = drain(&mut source, columns, &projection, config, &mut deletes)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            fingerprint = %fingerprint.short_hex(),
            keys = deletes.len(),
            rows = stats.rows,
            duplicates = stats.rows - deletes.len() as u64,
            pages = stats.pages,
            pending_polls = stats.pending_polls,
            "equality delete index frozen"
        );

        Ok(Self {
            schema,
            deletes: Arc::new(deletes),
            fingerprint,
            rows_read: stats.rows,
        })
    }

    /// Concrete predicate over batches laid out as `columns`.
    ///
    /// Fails with `SchemaMismatch` if an identifier column is missing from
    /// the layout. Extra columns are allowed and ignored.
    pub fn predicate(&self, columns: &[ColumnHandle]) -> DeleteResult<EqualityDeletePredicate> {
        let data_schema = schema_from_handles(columns)?;
        let projection = StructProjection::create(&data_schema, &self.schema)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            fingerprint = %self.fingerprint.short_hex(),
            positions = ?projection.positions(),
            "created equality delete predicate"
        );

        Ok(EqualityDeletePredicate::new(
            columns.to_vec(),
            projection,
            Arc::clone(&self.deletes),
        ))
    }

    /// Distinct delete keys.
    pub fn len(&self) -> usize {
        self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty()
    }

    /// Delete records drained from the source, duplicates included.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn schema_fingerprint(&self) -> Hash256 {
        self.fingerprint
    }

    pub fn delete_set(&self) -> &StructLikeSet {
        &self.deletes
    }
}

impl DeleteFilter for EqualityDeleteFilter {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn create_predicate(&self, columns: &[ColumnHandle]) -> DeleteResult<Box<dyn RowPredicate>> {
        Ok(Box::new(self.predicate(columns)?))
    }
}

/// Pull pages until the source reports `Finished`, inserting every row.
///
/// Any error aborts the build; the partially filled set is dropped by the caller.
fn drain<S: PageSource>(
    source: &mut S,
    columns: &[ColumnHandle],
    projection: &StructProjection,
    config: &DeleteFilterConfig,
    deletes: &mut StructLikeSet,
) -> DeleteResult<DrainStats> {
    let mut stats = DrainStats::default();
    let mut pending_in_a_row = 0usize;

    loop {
        let batch = match source
            .poll_page()
            .map_err(|e| DeleteError::SourceRead(Box::new(e)))?
        {
            PagePoll::Finished => break,
            PagePoll::Pending => {
                stats.pending_polls += 1;
                pending_in_a_row += 1;
                if let Some(max) = config.max_pending_polls {
                    if pending_in_a_row >= max {
                        return Err(DeleteError::Stalled {
                            polls: pending_in_a_row,
                        });
                    }
                }
                continue;
            }
            PagePoll::Ready(batch) => batch,
        };
        pending_in_a_row = 0;
        stats.pages += 1;

        check_batch(columns, &batch)?;
        if config.validate_batch_types && !batch.is_empty() {
            check_value_types(columns, &batch)?;
        }

        for position in 0..batch.num_rows() {
            let row = LazyRow::new(columns, &batch, position);
            deletes.insert(&projection.wrap(&row));
        }
        stats.rows += batch.num_rows() as u64;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            rows = batch.num_rows(),
            keys = deletes.len(),
            "drained equality delete page"
        );
    }

    Ok(stats)
}

fn check_value_types(
    columns: &[ColumnHandle],
    batch: &RowBatch,
) -> DeleteResult<()> {
    for col in columns {
        let values = &batch.columns[col.position].values;
        if let Some(bad) = values.iter().find(|v| !v.matches_type(col.data_type())) {
            return Err(DeleteError::TypeMismatch {
                field_id: col.id(),
                expected: format!("{:?}", col.data_type()),
                found: format!("{bad:?}"),
            });
        }
    }
    Ok(())
}
