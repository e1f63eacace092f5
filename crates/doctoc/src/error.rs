use doctoc_core::TransformError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid input document: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Transform(#[from] TransformError),
}
