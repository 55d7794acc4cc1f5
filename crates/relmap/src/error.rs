use derive_more::Display;
use relmap_core::{
    config::ConfigError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_model_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::ModelValidation)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Malformed input; nothing was changed.
    InvalidArgument,

    /// Not allowed in the current model state.
    InvalidOperation,

    /// The model was rejected during finalization.
    ModelValidation,

    /// The caller cannot remediate this.
    Internal,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::InvalidArgument => Self::InvalidArgument,
            ErrorClass::InvalidOperation => Self::InvalidOperation,
            ErrorClass::ModelValidation => Self::ModelValidation,
            ErrorClass::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Annotation,
    Config,
    Convention,
    Metadata,
    Pipeline,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Annotation => Self::Annotation,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Convention => Self::Convention,
            CoreErrorOrigin::Metadata => Self::Metadata,
            CoreErrorOrigin::Pipeline => Self::Pipeline,
        }
    }
}

///
/// TESTS
///
