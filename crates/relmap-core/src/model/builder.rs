use crate::{
    annotation::{AnnotationValue, Annotations},
    error::{ErrorOrigin, InternalError},
    mapping::{
        TypeMapping, ValueComparer, ValueConverter, catalog::MAX_FRACTIONAL_SECONDS_PRECISION,
    },
    metadata::{
        AnnotationTarget, ConfigSource, EntityTypeId, ForeignKeyId, FunctionId, Graph, IndexId,
        KeyId, MetadataError, Property, PropertyFacets, PropertyId,
    },
    model::ModelState,
};
use derive_more::Deref;
use relmap_primitives::{ValueFamily, ValueKind, ValueType};
use std::sync::Arc;

///
/// ModelBuilder
///
/// Owns a mutable metadata graph and its lifecycle state. Dereferences to
/// [`Graph`] for reads; every write goes through a guarded method here.
///
/// Once finalized the builder rejects all writes with an
/// invalid-operation error. A rejected finalization leaves the builder
/// `Invalid` until the next successful edit.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct ModelBuilder {
    #[deref]
    graph: Graph,
    state: ModelState,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn from_graph(graph: Graph) -> Self {
        Self {
            graph,
            state: ModelState::Mutable,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ModelState {
        self.state
    }

    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(crate) const fn set_state(&mut self, state: ModelState) {
        self.state = state;
    }

    pub(crate) fn replace_graph(&mut self, graph: Graph) {
        self.graph = graph;
    }

    pub(crate) fn into_graph(self) -> Graph {
        self.graph
    }

    fn ensure_editable(&self) -> Result<(), InternalError> {
        if self.state == ModelState::Finalized {
            return Err(MetadataError::ModelFinalized.into());
        }

        Ok(())
    }

    // Run one edit against the graph. A finalized model refuses the edit
    // outright; a successful edit clears an Invalid state.
    fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut Graph) -> Result<T, MetadataError>,
    ) -> Result<T, InternalError> {
        self.ensure_editable()?;

        let out = f(&mut self.graph)?;
        if self.state == ModelState::Invalid {
            self.state = ModelState::Mutable;
        }

        Ok(out)
    }

    fn edit_facets(
        &mut self,
        id: PropertyId,
        f: impl FnOnce(&mut PropertyFacets),
    ) -> Result<(), InternalError> {
        self.edit(|graph| {
            f(&mut graph.property_mut(id)?.facets);
            Ok(())
        })
    }

    fn property_checked(&self, id: PropertyId) -> Result<&Property, InternalError> {
        self.graph
            .property_node(id)
            .ok_or_else(|| MetadataError::unknown("property", id).into())
    }

    // Reject a facet the property's kind cannot carry.
    fn require_facet(
        &self,
        id: PropertyId,
        facet: &str,
        supported: impl FnOnce(ValueKind) -> bool,
    ) -> Result<(), InternalError> {
        let property = self.property_checked(id)?;
        if supported(property.kind()) {
            return Ok(());
        }

        Err(InternalError::invalid_argument(
            ErrorOrigin::Metadata,
            format!(
                "property '{}' of kind {} does not support {facet}",
                property.name(),
                property.kind()
            ),
        ))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn add_entity_type(&mut self, name: &str) -> Result<EntityTypeId, InternalError> {
        self.edit(|graph| graph.add_entity_type(name))
    }

    pub fn remove_entity_type(&mut self, id: EntityTypeId) -> Result<(), InternalError> {
        self.edit(|graph| graph.remove_entity_type(id))
    }

    pub fn add_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        value_type: ValueType,
    ) -> Result<PropertyId, InternalError> {
        self.edit(|graph| graph.add_property(entity, name, value_type))
    }

    pub fn remove_property(&mut self, id: PropertyId) -> Result<(), InternalError> {
        self.edit(|graph| graph.remove_property(id))
    }

    pub fn set_primary_key(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
    ) -> Result<KeyId, InternalError> {
        self.edit(|graph| graph.set_primary_key(entity, properties))
    }

    /// Declare an alternate key.
    pub fn add_key(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
    ) -> Result<KeyId, InternalError> {
        self.edit(|graph| graph.add_key(entity, properties))
    }

    pub fn remove_key(&mut self, id: KeyId) -> Result<(), InternalError> {
        self.edit(|graph| graph.remove_key(id))
    }

    pub fn add_foreign_key(
        &mut self,
        dependent: EntityTypeId,
        properties: &[PropertyId],
        principal_key: KeyId,
    ) -> Result<ForeignKeyId, InternalError> {
        self.edit(|graph| graph.add_foreign_key(dependent, properties, principal_key))
    }

    pub fn remove_foreign_key(&mut self, id: ForeignKeyId) -> Result<(), InternalError> {
        self.edit(|graph| graph.remove_foreign_key(id))
    }

    pub fn set_foreign_key_unique(
        &mut self,
        id: ForeignKeyId,
        unique: bool,
    ) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_foreign_key_unique(id, unique))
    }

    pub fn add_index(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
        unique: bool,
    ) -> Result<IndexId, InternalError> {
        self.edit(|graph| graph.add_index(entity, properties, unique))
    }

    pub fn set_index_name(&mut self, id: IndexId, name: Option<&str>) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_index_name(id, name.map(str::to_string)))
    }

    pub fn remove_index(&mut self, id: IndexId) -> Result<(), InternalError> {
        self.edit(|graph| graph.remove_index(id))
    }

    pub fn add_function(
        &mut self,
        name: &str,
        return_kind: ValueKind,
    ) -> Result<FunctionId, InternalError> {
        self.edit(|graph| graph.add_function(name, return_kind))
    }

    pub fn remove_function(&mut self, id: FunctionId) -> Result<(), InternalError> {
        self.edit(|graph| graph.remove_function(id))
    }

    pub fn set_function_schema(
        &mut self,
        id: FunctionId,
        schema: Option<&str>,
    ) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_function_schema(id, schema.map(str::to_string)))
    }

    /// Explicit store return type. Takes precedence over the return kind
    /// during type mapping.
    pub fn set_function_store_type(
        &mut self,
        id: FunctionId,
        store_type: Option<&str>,
    ) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_function_store_type(id, store_type.map(str::to_string)))
    }

    pub fn add_function_parameter(
        &mut self,
        id: FunctionId,
        name: &str,
        kind: ValueKind,
    ) -> Result<(), InternalError> {
        self.edit(|graph| graph.add_function_parameter(id, name, kind))
    }

    pub fn set_parameter_store_type(
        &mut self,
        id: FunctionId,
        parameter: &str,
        store_type: Option<&str>,
    ) -> Result<(), InternalError> {
        self.edit(|graph| {
            graph.set_parameter_store_type(id, parameter, store_type.map(str::to_string))
        })
    }

    // ------------------------------------------------------------------
    // Property facets
    // ------------------------------------------------------------------

    /// Explicitly configure nullability. Conventions leave it alone
    /// afterwards.
    pub fn set_nullable(&mut self, id: PropertyId, nullable: bool) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_property_nullable(id, nullable, ConfigSource::Explicit))
    }

    /// Convention-level nullability. Returns `false` without touching the
    /// property when nullability was configured explicitly.
    pub fn set_nullable_by_convention(
        &mut self,
        id: PropertyId,
        nullable: bool,
    ) -> Result<bool, InternalError> {
        self.ensure_editable()?;
        if self.property_checked(id)?.nullability_source() == ConfigSource::Explicit {
            return Ok(false);
        }

        self.edit(|graph| graph.set_property_nullable(id, nullable, ConfigSource::Convention))?;

        Ok(true)
    }

    /// Maximum length for text and binary kinds.
    pub fn set_max_length(
        &mut self,
        id: PropertyId,
        max_length: Option<u32>,
    ) -> Result<(), InternalError> {
        self.ensure_editable()?;
        if max_length == Some(0) {
            return Err(InternalError::invalid_argument(
                ErrorOrigin::Metadata,
                "max length must be greater than zero",
            ));
        }
        if max_length.is_some() {
            self.require_facet(id, "a max length", ValueKind::supports_max_length)?;
        }

        self.edit_facets(id, |facets| facets.max_length = max_length)
    }

    pub fn set_unicode(
        &mut self,
        id: PropertyId,
        unicode: Option<bool>,
    ) -> Result<(), InternalError> {
        self.ensure_editable()?;
        if unicode.is_some() {
            self.require_facet(id, "unicode", ValueKind::supports_unicode)?;
        }

        self.edit_facets(id, |facets| facets.unicode = unicode)
    }

    pub fn set_precision(
        &mut self,
        id: PropertyId,
        precision: Option<u8>,
        scale: Option<u8>,
    ) -> Result<(), InternalError> {
        self.ensure_editable()?;
        match (precision, scale) {
            (Some(0), _) => {
                return Err(InternalError::invalid_argument(
                    ErrorOrigin::Metadata,
                    "precision must be greater than zero",
                ));
            }
            (None, Some(_)) => {
                return Err(InternalError::invalid_argument(
                    ErrorOrigin::Metadata,
                    "scale requires a precision",
                ));
            }
            (Some(p), Some(s)) if s > p => {
                return Err(InternalError::invalid_argument(
                    ErrorOrigin::Metadata,
                    format!("scale {s} exceeds precision {p}"),
                ));
            }
            _ => {}
        }

        if let Some(precision) = precision {
            self.require_facet(id, "a precision", ValueKind::supports_precision)?;

            let kind = self.property_checked(id)?.kind();
            if kind.family() == ValueFamily::Temporal
                && precision > MAX_FRACTIONAL_SECONDS_PRECISION
            {
                return Err(InternalError::invalid_argument(
                    ErrorOrigin::Metadata,
                    format!(
                        "fractional seconds precision must be at most {MAX_FRACTIONAL_SECONDS_PRECISION}"
                    ),
                ));
            }
        }
        if scale.is_some() {
            self.require_facet(id, "a scale", ValueKind::is_numeric)?;
        }

        self.edit_facets(id, |facets| {
            facets.precision = precision;
            facets.scale = scale;
        })
    }

    /// Explicit store type name. Blank names clear the setting.
    pub fn set_store_type(
        &mut self,
        id: PropertyId,
        store_type: Option<&str>,
    ) -> Result<(), InternalError> {
        let store_type = store_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        self.edit_facets(id, |facets| facets.store_type = store_type)
    }

    pub fn set_provider_kind(
        &mut self,
        id: PropertyId,
        kind: Option<ValueKind>,
    ) -> Result<(), InternalError> {
        self.edit_facets(id, |facets| facets.provider_kind = kind)
    }

    /// Attach a converter. Its model-side kind must match the property.
    pub fn set_value_converter(
        &mut self,
        id: PropertyId,
        converter: Option<ValueConverter>,
    ) -> Result<(), InternalError> {
        if let Some(converter) = &converter {
            let property = self.property_checked(id)?;
            if !converter.accepts(property.kind()) {
                return Err(InternalError::invalid_argument(
                    ErrorOrigin::Metadata,
                    format!(
                        "converter {converter} cannot convert property '{}' of kind {}",
                        property.name(),
                        property.kind()
                    ),
                ));
            }
        }

        self.edit_facets(id, |facets| facets.value_converter = converter)
    }

    pub fn set_value_comparer(
        &mut self,
        id: PropertyId,
        comparer: Option<ValueComparer>,
    ) -> Result<(), InternalError> {
        self.edit_facets(id, |facets| facets.value_comparer = comparer)
    }

    pub fn set_key_value_comparer(
        &mut self,
        id: PropertyId,
        comparer: Option<ValueComparer>,
    ) -> Result<(), InternalError> {
        self.edit_facets(id, |facets| facets.key_value_comparer = comparer)
    }

    pub fn set_structural_value_comparer(
        &mut self,
        id: PropertyId,
        comparer: Option<ValueComparer>,
    ) -> Result<(), InternalError> {
        self.edit_facets(id, |facets| facets.structural_value_comparer = comparer)
    }

    // ------------------------------------------------------------------
    // Type mappings
    // ------------------------------------------------------------------

    pub fn set_type_mapping(
        &mut self,
        id: PropertyId,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<(), InternalError> {
        self.edit_facets(id, |facets| facets.type_mapping = mapping)
    }

    pub fn set_function_type_mapping(
        &mut self,
        id: FunctionId,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_function_type_mapping(id, mapping))
    }

    pub fn set_parameter_type_mapping(
        &mut self,
        id: FunctionId,
        parameter: &str,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<(), InternalError> {
        self.edit(|graph| graph.set_parameter_type_mapping(id, parameter, mapping))
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Store an open annotation, returning the previous value. Reserved
    /// `Core:` keys are rejected.
    pub fn set_annotation(
        &mut self,
        target: AnnotationTarget,
        key: &str,
        value: impl Into<AnnotationValue>,
    ) -> Result<Option<AnnotationValue>, InternalError> {
        let value = value.into();
        self.annotations_for(target, |annotations| Ok(annotations.set(key, value)?))
    }

    pub fn remove_annotation(
        &mut self,
        target: AnnotationTarget,
        key: &str,
    ) -> Result<Option<AnnotationValue>, InternalError> {
        self.annotations_for(target, |annotations| Ok(annotations.remove(key)))
    }

    fn annotations_for<T>(
        &mut self,
        target: AnnotationTarget,
        f: impl FnOnce(&mut Annotations) -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        if self.state == ModelState::Finalized {
            return Err(MetadataError::ModelFinalized.into());
        }

        let out = f(self.graph.annotations_mut(target)?)?;
        if self.state == ModelState::Invalid {
            self.state = ModelState::Mutable;
        }

        Ok(out)
    }
}
