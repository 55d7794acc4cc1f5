//! Conventions: units of model-transformation logic run during
//! finalization.
//!
//! A convention declares the stage it belongs to and, optionally, the
//! names of conventions it must run after. The [`ConventionSet`] resolves
//! those declarations into one fixed order; conventions never order
//! themselves.

mod db_function_type_mapping;
mod foreign_key_index;
mod key_discovery;
mod key_nullability;
mod property_type_mapping;
mod set;
mod validation;

#[cfg(test)]
mod tests;

pub use db_function_type_mapping::DbFunctionTypeMappingConvention;
pub use foreign_key_index::ForeignKeyIndexConvention;
pub use key_discovery::KeyDiscoveryConvention;
pub use key_nullability::KeyNullabilityConvention;
pub use property_type_mapping::{PropertyTypeMappingConvention, mapping_request};
pub use set::ConventionSet;
pub use validation::ModelValidationConvention;

use crate::{
    config::FinalizeConfig, error::InternalError, mapping::TypeMappingSource, model::ModelBuilder,
};
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// ConventionStage
///
/// Coarse ordering bucket. Every convention in an earlier stage runs
/// before any convention in a later one.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ConventionStage {
    /// Keys and other entity-local shape.
    Shape,
    /// Foreign keys and the indexes that serve them.
    Relationship,
    TypeMapping,
    /// Read-only checks that may reject the model.
    Validation,
}

impl Display for ConventionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Shape => "shape",
            Self::Relationship => "relationship",
            Self::TypeMapping => "type_mapping",
            Self::Validation => "validation",
        };
        write!(f, "{label}")
    }
}

///
/// Convention
///

pub trait Convention: Send + Sync {
    /// Unique name within a convention set.
    fn name(&self) -> &'static str;

    fn stage(&self) -> ConventionStage;

    /// Conventions, by name, that must run first.
    fn runs_after(&self) -> &'static [&'static str] {
        &[]
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError>;
}

///
/// ConventionContext
///
/// Shared processing context handed to every convention in a pass.
///

pub struct ConventionContext<'a> {
    mapping_source: &'a dyn TypeMappingSource,
    config: &'a FinalizeConfig,
    pass: u32,
    rerun_requested: bool,
}

impl<'a> ConventionContext<'a> {
    #[must_use]
    pub fn new(
        mapping_source: &'a dyn TypeMappingSource,
        config: &'a FinalizeConfig,
        pass: u32,
    ) -> Self {
        Self {
            mapping_source,
            config,
            pass,
            rerun_requested: false,
        }
    }

    #[must_use]
    pub fn mapping_source(&self) -> &'a dyn TypeMappingSource {
        self.mapping_source
    }

    #[must_use]
    pub const fn config(&self) -> &'a FinalizeConfig {
        self.config
    }

    /// One-based pass number.
    #[must_use]
    pub const fn pass(&self) -> u32 {
        self.pass
    }

    /// Ask for another full pass even though no structural edit happened.
    pub const fn request_rerun(&mut self) {
        self.rerun_requested = true;
    }

    #[must_use]
    pub const fn rerun_requested(&self) -> bool {
        self.rerun_requested
    }
}

///
/// ConventionSetError
///

#[derive(Debug, ThisError)]
pub enum ConventionSetError {
    #[error("convention '{0}' is already registered")]
    DuplicateName(&'static str),

    #[error("convention '{convention}' runs after unknown convention '{dependency}'")]
    UnknownDependency {
        convention: &'static str,
        dependency: &'static str,
    },

    #[error(
        "convention '{convention}' ({stage}) cannot run after '{dependency}' from the later {dependency_stage} stage"
    )]
    StageInversion {
        convention: &'static str,
        stage: ConventionStage,
        dependency: &'static str,
        dependency_stage: ConventionStage,
    },

    #[error("convention ordering has a cycle through {0}")]
    Cycle(String),
}
