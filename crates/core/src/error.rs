use thiserror::Error;

/// Contract violations raised before or while running a pipeline stage.
///
/// A stage that finds nothing to do (for example a document without a table
/// of contents) reports it through its messages, never through this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("Stage '{stage}' requires missing columns: {}", columns.join(", "))]
    MissingColumns {
        stage: String,
        columns: Vec<String>,
    },
    #[error("Global '{0}' has not been set")]
    MissingGlobal(&'static str),
}
