use ds_edid::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DsError>;

/// Failure reported by a [`DisplaySdk`](crate::DisplaySdk) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("display sdk: {0}")]
pub struct SdkError(pub String);

impl SdkError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Outcome of a video port operation that did not succeed.
///
/// [`DsError::OperationNotSupported`] is an ordinary answer, not a fault: many outputs simply
/// lack a given control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DsError {
    #[error("video ports are not initialized")]
    NotInitialized,

    #[error("video ports are already initialized")]
    AlreadyInitialized,

    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),

    #[error("operation not supported: {0}")]
    OperationNotSupported(&'static str),

    #[error("general failure: {0}")]
    GeneralFailure(#[from] SdkError),

    #[error("EDID: {0}")]
    Parse(#[from] ParseError),
}
