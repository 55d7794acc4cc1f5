//! Core of relmap: the annotated metadata graph, provider type mapping
//! sources, the convention set and the finalization pipeline that turns a
//! mutable model into a frozen one.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod annotation;
pub mod config;
pub mod convention;
pub mod error;
pub mod finalize;
pub mod mapping;
pub mod metadata;
pub mod model;

///
/// Prelude
///
/// Prelude contains only modeling vocabulary.
/// No conventions, providers or trace sinks are re-exported here.
///

pub mod prelude {
    pub use crate::{
        annotation::AnnotationValue,
        finalize::Finalizer,
        mapping::{TypeMapping, TypeMappingSource, ValueComparer, ValueConverter},
        metadata::{
            AnnotationTarget, EntityTypeId, ForeignKeyId, FunctionId, Graph, IndexId, KeyId,
            PropertyId, PropertyRef,
        },
        model::{Model, ModelBuilder, ModelState},
    };
    pub use relmap_primitives::{ValueKind, ValueType};
}
