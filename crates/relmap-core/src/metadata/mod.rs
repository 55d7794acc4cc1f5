//! Metadata graph: entity types, properties, keys, foreign keys, indexes
//! and database functions.
//!
//! Nodes live in generational arenas inside [`Graph`] and refer to each
//! other by id. Back-references (the keys, foreign keys and indexes a
//! property belongs to) are stored on the nodes and maintained by every
//! structural edit, so read queries never scan the graph.

mod accessor;
mod arena;
mod entity;
mod foreign_key;
mod function;
mod graph;
mod index;
mod key;
mod property;


pub use accessor::{PropertyRef, format_properties};
pub use arena::{ArenaId, EntityTypeId, ForeignKeyId, FunctionId, IndexId, KeyId, PropertyId};
pub use entity::EntityType;
pub use foreign_key::ForeignKey;
pub use function::{DbFunction, FunctionParameter};
pub use graph::{AnnotationTarget, Graph};
pub use index::Index;
pub use key::Key;
pub use property::{ConfigSource, Property, PropertyFacets};

use crate::error::ErrorClass;
use thiserror::Error as ThisError;

///
/// MetadataError
///
/// Rejected graph edits. Every variant is raised before the graph is
/// touched.
///

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("{element} name is empty")]
    EmptyName { element: &'static str },

    #[error("entity type '{0}' already exists")]
    DuplicateEntityType(String),

    #[error("property '{property}' already exists on entity type '{entity}'")]
    DuplicateProperty { entity: String, property: String },

    #[error("database function '{0}' already exists")]
    DuplicateFunction(String),

    #[error("parameter '{parameter}' already exists on database function '{function}'")]
    DuplicateParameter { function: String, parameter: String },

    #[error("unknown {element} {id}")]
    UnknownElement { element: &'static str, id: String },

    #[error("database function '{function}' has no parameter '{parameter}'")]
    UnknownParameter { function: String, parameter: String },

    #[error("{element} on entity type '{entity}' needs at least one property")]
    EmptyPropertyList {
        element: &'static str,
        entity: String,
    },

    #[error("{element} properties {properties} must all be declared on entity type '{entity}'")]
    ForeignProperties {
        element: &'static str,
        entity: String,
        properties: String,
    },

    #[error("{element} properties {properties} contain a duplicate")]
    RepeatedProperty {
        element: &'static str,
        properties: String,
    },

    #[error("entity type '{entity}' already has a key on {properties}")]
    DuplicateKey { entity: String, properties: String },

    #[error("entity type '{entity}' already has an index on {properties}")]
    DuplicateIndex { entity: String, properties: String },

    #[error(
        "entity type '{entity}' already has a foreign key on {properties} targeting the same principal key"
    )]
    DuplicateForeignKey { entity: String, properties: String },

    #[error(
        "foreign key {dependent} has {dependent_len} properties but principal key {principal} has {principal_len}"
    )]
    ForeignKeyArityMismatch {
        dependent: String,
        dependent_len: usize,
        principal: String,
        principal_len: usize,
    },

    #[error("property '{entity}.{property}' is still used by {usage}")]
    PropertyInUse {
        entity: String,
        property: String,
        usage: &'static str,
    },

    #[error("key {properties} on entity type '{entity}' is referenced by a foreign key")]
    KeyInUse { entity: String, properties: String },

    #[error("entity type '{entity}' is the principal of a foreign key on '{dependent}'")]
    EntityTypeInUse { entity: String, dependent: String },

    #[error("the model is finalized and can no longer be changed")]
    ModelFinalized,
}

impl MetadataError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::PropertyInUse { .. }
            | Self::KeyInUse { .. }
            | Self::EntityTypeInUse { .. }
            | Self::ModelFinalized => ErrorClass::InvalidOperation,
            _ => ErrorClass::InvalidArgument,
        }
    }

    pub(crate) fn unknown(element: &'static str, id: impl std::fmt::Display) -> Self {
        Self::UnknownElement {
            element,
            id: id.to_string(),
        }
    }
}
