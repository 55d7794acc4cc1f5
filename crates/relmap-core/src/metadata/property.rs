use crate::{
    annotation::{AnnotationValue, Annotations, keys},
    mapping::{TypeMapping, ValueComparer, ValueConverter},
    metadata::{EntityTypeId, ForeignKeyId, IndexId, KeyId},
};
use relmap_primitives::{ValueKind, ValueType};
use std::sync::Arc;

///
/// ConfigSource
///
/// Who last set a configurable value. Conventions only overwrite values
/// they set themselves.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConfigSource {
    #[default]
    Convention,
    Explicit,
}

///
/// PropertyFacets
///
/// Typed storage for the reserved core annotation keys.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyFacets {
    pub max_length: Option<u32>,
    pub unicode: Option<bool>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub store_type: Option<String>,
    pub provider_kind: Option<ValueKind>,
    pub value_converter: Option<ValueConverter>,
    pub value_comparer: Option<ValueComparer>,
    pub key_value_comparer: Option<ValueComparer>,
    pub structural_value_comparer: Option<ValueComparer>,
    pub type_mapping: Option<Arc<TypeMapping>>,
}

impl PropertyFacets {
    /// Render the facet stored under a reserved core key.
    #[must_use]
    pub fn core_annotation(&self, key: &str) -> Option<AnnotationValue> {
        match key {
            keys::TYPE_MAPPING => self
                .type_mapping
                .as_ref()
                .map(|m| AnnotationValue::Text(m.store_type.clone())),
            keys::MAX_LENGTH => self.max_length.map(AnnotationValue::from),
            keys::UNICODE => self.unicode.map(AnnotationValue::Bool),
            keys::PRECISION => self.precision.map(|p| AnnotationValue::Int(i64::from(p))),
            keys::SCALE => self.scale.map(|s| AnnotationValue::Int(i64::from(s))),
            keys::STORE_TYPE => self.store_type.clone().map(AnnotationValue::Text),
            keys::PROVIDER_VALUE_KIND => self
                .provider_kind
                .map(|k| AnnotationValue::Text(k.to_string())),
            keys::VALUE_CONVERTER => self
                .value_converter
                .as_ref()
                .map(|c| AnnotationValue::Text(c.name.clone())),
            keys::VALUE_COMPARER => comparer_annotation(self.value_comparer.as_ref()),
            keys::KEY_VALUE_COMPARER => comparer_annotation(self.key_value_comparer.as_ref()),
            keys::STRUCTURAL_VALUE_COMPARER => {
                comparer_annotation(self.structural_value_comparer.as_ref())
            }
            _ => None,
        }
    }
}

fn comparer_annotation(comparer: Option<&ValueComparer>) -> Option<AnnotationValue> {
    comparer.map(|c| AnnotationValue::Text(c.name().to_string()))
}

///
/// Property
///
/// A single typed attribute of an entity type. The containing-key,
/// foreign-key and index lists are back-references kept in sync by the
/// graph on every structural edit.
///

#[derive(Clone, Debug)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) entity: EntityTypeId,
    pub(crate) kind: ValueKind,
    pub(crate) nullable: bool,
    pub(crate) nullability_source: ConfigSource,
    pub(crate) facets: PropertyFacets,
    pub(crate) annotations: Annotations,
    pub(crate) primary_key: Option<KeyId>,
    pub(crate) keys: Vec<KeyId>,
    pub(crate) foreign_keys: Vec<ForeignKeyId>,
    pub(crate) indexes: Vec<IndexId>,
}

impl Property {
    pub(crate) fn new(name: String, entity: EntityTypeId, value_type: ValueType) -> Self {
        Self {
            name,
            entity,
            kind: value_type.kind,
            nullable: value_type.nullable,
            nullability_source: ConfigSource::Convention,
            facets: PropertyFacets::default(),
            annotations: Annotations::new(),
            primary_key: None,
            keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn entity(&self) -> EntityTypeId {
        self.entity
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn nullability_source(&self) -> ConfigSource {
        self.nullability_source
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        ValueType::new(self.kind, self.nullable)
    }

    #[must_use]
    pub const fn facets(&self) -> &PropertyFacets {
        &self.facets
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
