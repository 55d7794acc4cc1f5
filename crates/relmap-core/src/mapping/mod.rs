//! Store-level type mappings and the sources that resolve them.
//!
//! A [`TypeMappingSource`] is supplied by a storage provider. Resolution by
//! an explicit store type name always takes precedence over resolution by
//! value kind; absence is a normal result and never an error here.

pub mod catalog;
pub mod converter;
pub mod provider;
pub mod store_type;

pub use catalog::{CatalogTypeMappingSource, KindRule, StoreTypeEntry, StoreTypeSizing};
pub use converter::{ValueComparer, ValueConverter};
pub use store_type::{StoreTypeFacet, StoreTypeName};

use relmap_primitives::ValueKind;
use serde::Serialize;
use std::sync::Arc;

///
/// TypeMapping
///
/// Immutable description of how one logical value is represented at the
/// store boundary. Shared as `Arc<TypeMapping>`; a source hands out the
/// same allocation for the same request.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct TypeMapping {
    /// Full store type, e.g. `nvarchar(50)`.
    pub store_type: String,
    /// Store type without facets, e.g. `nvarchar`.
    pub store_type_base: String,
    /// Model-side kind this mapping materializes.
    pub kind: ValueKind,
    pub size: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub unicode: bool,
    pub fixed_length: bool,
    pub converter: Option<ValueConverter>,
    pub comparer: ValueComparer,
}

///
/// MappingRequest
///
/// Everything a property contributes to mapping resolution.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct MappingRequest<'a> {
    pub kind: Option<ValueKind>,
    pub store_type: Option<&'a str>,
    pub provider_kind: Option<ValueKind>,
    pub converter: Option<&'a ValueConverter>,
    pub max_length: Option<u32>,
    pub unicode: Option<bool>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
}

impl<'a> MappingRequest<'a> {
    #[must_use]
    pub const fn for_kind(kind: ValueKind) -> Self {
        Self {
            kind: Some(kind),
            store_type: None,
            provider_kind: None,
            converter: None,
            max_length: None,
            unicode: None,
            precision: None,
            scale: None,
        }
    }

    /// Explicit store type, treating an empty or blank name as absent.
    #[must_use]
    pub fn explicit_store_type(&self) -> Option<&'a str> {
        non_empty(self.store_type)
    }

    /// Kind the store has to hold once any converter is applied.
    #[must_use]
    pub fn store_kind(&self) -> Option<ValueKind> {
        self.converter
            .map(|c| c.provider_kind)
            .or(self.provider_kind)
            .or(self.kind)
    }
}

///
/// TypeMappingSource
///
/// Provider-specific catalog of store types. Implementations must be
/// deterministic for their whole lifetime.
///

pub trait TypeMappingSource: Send + Sync {
    /// Short provider name used in diagnostics.
    fn provider_name(&self) -> &str;

    fn find_mapping_by_store_type(&self, store_type: &str) -> Option<Arc<TypeMapping>>;

    fn find_mapping_by_kind(&self, kind: ValueKind) -> Option<Arc<TypeMapping>>;

    /// Resolve a mapping for a full property request.
    ///
    /// The default implementation ignores facets and converters and
    /// applies only the store-type-over-kind precedence.
    fn find_mapping(&self, request: &MappingRequest<'_>) -> Option<Arc<TypeMapping>> {
        resolve(self, request.explicit_store_type(), request.store_kind()?)
    }
}

/// Explicit store type name if present and non-blank, else value kind.
pub fn resolve<S: TypeMappingSource + ?Sized>(
    source: &S,
    store_type: Option<&str>,
    kind: ValueKind,
) -> Option<Arc<TypeMapping>> {
    match non_empty(store_type) {
        Some(store_type) => source.find_mapping_by_store_type(store_type),
        None => source.find_mapping_by_kind(kind),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
