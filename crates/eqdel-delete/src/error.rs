use eqdel_core::id::FieldId;
use thiserror::Error;

/// Result type local to eqdel-delete.
pub type DeleteResult<T> = std::result::Result<T, DeleteError>;

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("schema mismatch: field {field_id} ('{name}') is not present in the column layout")]
    SchemaMismatch { field_id: FieldId, name: String },

    #[error("type mismatch for field {field_id}: expected {expected}, found {found}")]
    TypeMismatch {
        field_id: FieldId,
        expected: String,
        found: String,
    },

    /// The page source's own error, boxed but otherwise untouched.
    #[error("page source read failed: {0}")]
    SourceRead(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("page source stalled: no page after {polls} consecutive polls")]
    Stalled { polls: usize },

    #[error("batch shape error: {0}")]
    BatchShape(String),

    #[error(transparent)]
    Core(#[from] eqdel_core::Error),
}
