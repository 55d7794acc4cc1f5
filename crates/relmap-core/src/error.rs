use crate::{
    annotation::AnnotationError, config::ConfigError, convention::ConventionSetError,
    metadata::MetadataError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured error with a stable classification.
/// Every failure raised by the metadata graph, the conventions and the
/// finalization pipeline is reported through this type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an argument error for a specific origin.
    pub fn invalid_argument(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidArgument, origin, message)
    }

    /// Construct an operation-state error for a specific origin.
    pub fn invalid_operation(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidOperation, origin, message)
    }

    /// Construct a model validation failure raised during finalization.
    pub fn model_validation(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::ModelValidation,
            ErrorOrigin::Convention,
            message,
        )
    }

    /// Construct a pipeline-origin internal error.
    pub(crate) fn pipeline_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Pipeline, message)
    }

    #[must_use]
    pub const fn is_model_validation(&self) -> bool {
        matches!(self.class, ErrorClass::ModelValidation)
    }

    #[must_use]
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidOperation)
    }

    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidArgument)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Annotation(AnnotationError),

    #[error("{0}")]
    Metadata(MetadataError),

    #[error("{0}")]
    ConventionSet(ConventionSetError),

    #[error("{0}")]
    Config(ConfigError),
}

impl From<AnnotationError> for InternalError {
    fn from(err: AnnotationError) -> Self {
        Self {
            class: ErrorClass::InvalidArgument,
            origin: ErrorOrigin::Annotation,
            message: err.to_string(),
            detail: Some(ErrorDetail::Annotation(err)),
        }
    }
}

impl From<MetadataError> for InternalError {
    fn from(err: MetadataError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Metadata,
            message: err.to_string(),
            detail: Some(ErrorDetail::Metadata(err)),
        }
    }
}

impl From<ConventionSetError> for InternalError {
    fn from(err: ConventionSetError) -> Self {
        Self {
            class: ErrorClass::InvalidArgument,
            origin: ErrorOrigin::Pipeline,
            message: err.to_string(),
            detail: Some(ErrorDetail::ConventionSet(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::InvalidArgument,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// A required input is missing or malformed; nothing was mutated.
    InvalidArgument,
    /// The operation is not allowed in the current model state.
    InvalidOperation,
    /// The model was rejected during finalization.
    ModelValidation,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidOperation => "invalid_operation",
            Self::ModelValidation => "model_validation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Annotation,
    Metadata,
    Convention,
    Pipeline,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Annotation => "annotation",
            Self::Metadata => "metadata",
            Self::Convention => "convention",
            Self::Pipeline => "pipeline",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
