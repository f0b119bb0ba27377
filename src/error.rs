use thiserror::Error;

/// Misuse and validation failures. Geometry never fails; it clamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VelvetError {
    #[error("duplicate option value `{0}`")]
    DuplicateOptionValue(String),
    #[error("unknown option value `{0}`")]
    UnknownOptionValue(String),
    #[error("unknown placement `{0}`")]
    InvalidPlacement(String),
    #[error("unknown item `{0}`")]
    UnknownItem(String),
    #[error("toast context used after its provider was dropped")]
    ProviderDropped,
}

pub type Result<T> = std::result::Result<T, VelvetError>;
