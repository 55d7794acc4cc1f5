use crate::{
    annotation::{AnnotationValue, keys},
    mapping::{TypeMapping, ValueComparer, ValueConverter},
    metadata::{EntityType, ForeignKey, ForeignKeyId, Graph, Index, Key, Property, PropertyId},
};
use relmap_primitives::ValueKind;
use std::{fmt::Write, sync::Arc};

///
/// PropertyRef
///
/// Read-only view of one property together with the graph it lives in.
/// All relationship queries go through the back-reference lists on the
/// property node.
///

#[derive(Clone, Copy, Debug)]
pub struct PropertyRef<'a> {
    graph: &'a Graph,
    id: PropertyId,
    node: &'a Property,
}

impl<'a> PropertyRef<'a> {
    pub(crate) const fn new(graph: &'a Graph, id: PropertyId, node: &'a Property) -> Self {
        Self { graph, id, node }
    }

    #[must_use]
    pub const fn id(&self) -> PropertyId {
        self.id
    }

    #[must_use]
    pub const fn node(&self) -> &'a Property {
        self.node
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    /// The declaring entity type. Always present for a live property.
    #[must_use]
    pub fn entity_type(&self) -> Option<&'a EntityType> {
        self.graph.entity_type(self.node.entity)
    }

    /// Annotation lookup across both namespaces. Reserved core keys read
    /// the typed facet, everything else reads the open annotation map.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<AnnotationValue> {
        if keys::is_core_key(key) {
            return self.node.facets.core_annotation(key);
        }

        self.node.annotations.get(key).cloned()
    }

    /// Cached type mapping; never triggers resolution.
    #[must_use]
    pub fn find_type_mapping(&self) -> Option<&'a Arc<TypeMapping>> {
        self.node.facets.type_mapping.as_ref()
    }

    /// Principal-key property at the same position in the first foreign
    /// key that contains this property.
    ///
    /// A property that is dependent in several foreign keys only reports
    /// the principal of the earliest-declared one.
    #[must_use]
    pub fn find_principal(&self) -> Option<Self> {
        self.node.foreign_keys.iter().find_map(|fk_id| {
            let fk = self.graph.foreign_key(*fk_id)?;
            let ordinal = fk.properties.iter().position(|p| *p == self.id)?;
            let principal_key = self.graph.key(fk.principal_key)?;
            let principal = *principal_key.properties.get(ordinal)?;

            self.graph.property(principal)
        })
    }

    #[must_use]
    pub const fn max_length(&self) -> Option<u32> {
        self.node.facets.max_length
    }

    #[must_use]
    pub const fn is_unicode(&self) -> Option<bool> {
        self.node.facets.unicode
    }

    #[must_use]
    pub const fn precision(&self) -> Option<u8> {
        self.node.facets.precision
    }

    #[must_use]
    pub const fn scale(&self) -> Option<u8> {
        self.node.facets.scale
    }

    /// Explicit store type name, if configured.
    #[must_use]
    pub fn store_type(&self) -> Option<&'a str> {
        self.node.facets.store_type.as_deref()
    }

    /// Kind the provider stores, as configured on the property.
    #[must_use]
    pub const fn provider_value_kind(&self) -> Option<ValueKind> {
        self.node.facets.provider_kind
    }

    #[must_use]
    pub fn value_converter(&self) -> Option<&'a ValueConverter> {
        self.node.facets.value_converter.as_ref()
    }

    /// Configured comparer, else the resolved mapping's comparer.
    #[must_use]
    pub fn value_comparer(&self) -> Option<&'a ValueComparer> {
        self.node
            .facets
            .value_comparer
            .as_ref()
            .or_else(|| self.find_type_mapping().map(|m| &m.comparer))
    }

    #[must_use]
    pub fn key_value_comparer(&self) -> Option<&'a ValueComparer> {
        self.node
            .facets
            .key_value_comparer
            .as_ref()
            .or_else(|| self.value_comparer())
    }

    #[must_use]
    pub fn structural_value_comparer(&self) -> Option<&'a ValueComparer> {
        self.node
            .facets
            .structural_value_comparer
            .as_ref()
            .or_else(|| self.key_value_comparer())
    }

    #[must_use]
    pub fn is_foreign_key(&self) -> bool {
        !self.node.foreign_keys.is_empty()
    }

    #[must_use]
    pub fn is_index(&self) -> bool {
        !self.node.indexes.is_empty()
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.node.primary_key.is_some()
    }

    #[must_use]
    pub fn is_key(&self) -> bool {
        !self.node.keys.is_empty()
    }

    pub fn containing_foreign_keys(
        &self,
    ) -> impl Iterator<Item = (ForeignKeyId, &'a ForeignKey)> + use<'a> {
        let (graph, node) = (self.graph, self.node);
        node.foreign_keys
            .iter()
            .filter_map(move |id| graph.foreign_key(*id).map(|fk| (*id, fk)))
    }

    pub fn containing_indexes(&self) -> impl Iterator<Item = &'a Index> + use<'a> {
        let (graph, node) = (self.graph, self.node);
        node.indexes.iter().filter_map(move |id| graph.index(*id))
    }

    #[must_use]
    pub fn containing_primary_key(&self) -> Option<&'a Key> {
        self.node.primary_key.and_then(|id| self.graph.key(id))
    }

    /// Primary and alternate keys containing this property.
    pub fn containing_keys(&self) -> impl Iterator<Item = &'a Key> + use<'a> {
        let (graph, node) = (self.graph, self.node);
        node.keys.iter().filter_map(move |id| graph.key(*id))
    }
}

/// Render properties as `{'A', 'B'}`, or `{'A' : int, 'B' : string?}` with
/// types. Input order is kept; nothing is sorted or deduplicated.
pub fn format_properties<'p>(
    properties: impl IntoIterator<Item = &'p Property>,
    include_types: bool,
) -> String {
    let mut out = String::from("{");

    for (i, property) in properties.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }

        let _ = write!(out, "'{}'", property.name);
        if include_types {
            let _ = write!(out, " : {}", property.value_type());
        }
    }

    out.push('}');
    out
}
