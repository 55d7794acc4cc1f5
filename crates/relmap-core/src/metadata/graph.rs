use crate::{
    annotation::Annotations,
    mapping::TypeMapping,
    metadata::{
        ConfigSource, DbFunction, EntityType, EntityTypeId, ForeignKey, ForeignKeyId, FunctionId,
        FunctionParameter, Index, IndexId, Key, KeyId, MetadataError, Property, PropertyId,
        PropertyRef, arena::Arena, format_properties,
    },
};
use relmap_primitives::{ValueKind, ValueType};
use std::sync::Arc;

///
/// AnnotationTarget
///
/// Addresses the open annotation map of one graph element.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnnotationTarget {
    Model,
    EntityType(EntityTypeId),
    Property(PropertyId),
    Key(KeyId),
    ForeignKey(ForeignKeyId),
    Index(IndexId),
    Function(FunctionId),
}

///
/// Graph
///
/// Arena-backed metadata graph. Reads are public; every edit is
/// crate-private and reached through `ModelBuilder`, which guards the
/// model state.
///
/// `structure_version` moves on every edit that adds, removes or reshapes
/// a node. Facet, annotation and type-mapping writes leave it alone.
///

#[derive(Clone, Debug, Default)]
pub struct Graph {
    entity_types: Arena<EntityType>,
    properties: Arena<Property>,
    keys: Arena<Key>,
    foreign_keys: Arena<ForeignKey>,
    indexes: Arena<Index>,
    functions: Arena<DbFunction>,
    annotations: Annotations,
    structure_version: u64,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn structure_version(&self) -> u64 {
        self.structure_version
    }

    /// Model-level open annotations.
    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[must_use]
    pub fn annotations_of(&self, target: AnnotationTarget) -> Option<&Annotations> {
        match target {
            AnnotationTarget::Model => Some(&self.annotations),
            AnnotationTarget::EntityType(id) => self.entity_type(id).map(|n| &n.annotations),
            AnnotationTarget::Property(id) => self.property_node(id).map(|n| &n.annotations),
            AnnotationTarget::Key(id) => self.key(id).map(|n| &n.annotations),
            AnnotationTarget::ForeignKey(id) => self.foreign_key(id).map(|n| &n.annotations),
            AnnotationTarget::Index(id) => self.index(id).map(|n| &n.annotations),
            AnnotationTarget::Function(id) => self.function(id).map(|n| &n.annotations),
        }
    }

    pub fn entity_types(&self) -> impl Iterator<Item = (EntityTypeId, &EntityType)> {
        self.entity_types.iter().map(|(id, node)| (id.into(), node))
    }

    #[must_use]
    pub fn entity_type(&self, id: EntityTypeId) -> Option<&EntityType> {
        self.entity_types.get(id.0)
    }

    #[must_use]
    pub fn find_entity_type(&self, name: &str) -> Option<EntityTypeId> {
        self.entity_types()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn entity_type_count(&self) -> usize {
        self.entity_types.len()
    }

    /// Accessor view of one property.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> Option<PropertyRef<'_>> {
        self.properties
            .get(id.0)
            .map(|node| PropertyRef::new(self, id, node))
    }

    #[must_use]
    pub fn property_node(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(id.0)
    }

    #[must_use]
    pub fn find_property(&self, entity: EntityTypeId, name: &str) -> Option<PropertyId> {
        self.entity_type(entity)?
            .properties
            .iter()
            .copied()
            .find(|id| self.property_node(*id).is_some_and(|p| p.name == name))
    }

    /// Every property in the graph, in arena order.
    pub fn properties(&self) -> impl Iterator<Item = PropertyRef<'_>> {
        self.properties
            .iter()
            .map(|(id, node)| PropertyRef::new(self, id.into(), node))
    }

    /// Properties of one entity type, in declaration order.
    pub fn entity_properties(&self, entity: EntityTypeId) -> impl Iterator<Item = PropertyRef<'_>> {
        self.entity_type(entity)
            .map(|node| node.properties.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.property(*id))
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&Key> {
        self.keys.get(id.0)
    }

    pub fn keys(&self) -> impl Iterator<Item = (KeyId, &Key)> {
        self.keys.iter().map(|(id, node)| (id.into(), node))
    }

    #[must_use]
    pub fn foreign_key(&self, id: ForeignKeyId) -> Option<&ForeignKey> {
        self.foreign_keys.get(id.0)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (ForeignKeyId, &ForeignKey)> {
        self.foreign_keys.iter().map(|(id, node)| (id.into(), node))
    }

    #[must_use]
    pub fn index(&self, id: IndexId) -> Option<&Index> {
        self.indexes.get(id.0)
    }

    pub fn indexes(&self) -> impl Iterator<Item = (IndexId, &Index)> {
        self.indexes.iter().map(|(id, node)| (id.into(), node))
    }

    #[must_use]
    pub fn function(&self, id: FunctionId) -> Option<&DbFunction> {
        self.functions.get(id.0)
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &DbFunction)> {
        self.functions.iter().map(|(id, node)| (id.into(), node))
    }

    #[must_use]
    pub fn find_function(&self, name: &str) -> Option<FunctionId> {
        self.functions()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Render a property id list with [`format_properties`]. Stale ids are
    /// skipped.
    #[must_use]
    pub fn format_property_ids(&self, ids: &[PropertyId], include_types: bool) -> String {
        format_properties(
            ids.iter().filter_map(|id| self.property_node(*id)),
            include_types,
        )
    }

    // ------------------------------------------------------------------
    // Entity types and properties
    // ------------------------------------------------------------------

    pub(crate) fn add_entity_type(&mut self, name: &str) -> Result<EntityTypeId, MetadataError> {
        let name = require_name("entity type", name)?;
        if self.find_entity_type(name).is_some() {
            return Err(MetadataError::DuplicateEntityType(name.to_string()));
        }

        let id = self.entity_types.insert(EntityType::new(name.to_string()));
        self.touch();

        Ok(id.into())
    }

    /// Remove an entity type and everything declared on it.
    ///
    /// Fails while a foreign key on another entity type still targets one
    /// of its keys.
    pub(crate) fn remove_entity_type(&mut self, id: EntityTypeId) -> Result<(), MetadataError> {
        let node = self.entity_type_node(id)?;

        if let Some(dependent) = self
            .foreign_keys
            .iter()
            .find(|(_, fk)| fk.principal_entity == id && fk.dependent != id)
            .map(|(_, fk)| fk.dependent)
        {
            return Err(MetadataError::EntityTypeInUse {
                entity: node.name.clone(),
                dependent: self.entity_name(dependent),
            });
        }

        let foreign_keys = node.foreign_keys.clone();
        let indexes = node.indexes.clone();
        let keys = node.keys.clone();
        let properties = node.properties.clone();

        for fk in foreign_keys {
            self.remove_foreign_key(fk)?;
        }
        for index in indexes {
            self.remove_index(index)?;
        }
        for key in keys {
            self.unlink_key(key);
        }
        for property in properties {
            self.properties.remove(property.0);
        }

        self.entity_types.remove(id.0);
        self.touch();

        Ok(())
    }

    pub(crate) fn add_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        value_type: ValueType,
    ) -> Result<PropertyId, MetadataError> {
        let name = require_name("property", name)?;
        let entity_name = self.entity_type_node(entity)?.name.clone();
        if self.find_property(entity, name).is_some() {
            return Err(MetadataError::DuplicateProperty {
                entity: entity_name,
                property: name.to_string(),
            });
        }

        let id: PropertyId = self
            .properties
            .insert(Property::new(name.to_string(), entity, value_type))
            .into();
        if let Some(node) = self.entity_types.get_mut(entity.0) {
            node.properties.push(id);
        }
        self.touch();

        Ok(id)
    }

    /// Remove a property that no key, foreign key or index uses.
    pub(crate) fn remove_property(&mut self, id: PropertyId) -> Result<(), MetadataError> {
        let node = self.property_node_checked(id)?;

        let usage = if !node.keys.is_empty() {
            Some("a key")
        } else if !node.foreign_keys.is_empty() {
            Some("a foreign key")
        } else if !node.indexes.is_empty() {
            Some("an index")
        } else {
            None
        };
        if let Some(usage) = usage {
            return Err(MetadataError::PropertyInUse {
                entity: self.entity_name(node.entity),
                property: node.name.clone(),
                usage,
            });
        }

        let entity = node.entity;
        self.properties.remove(id.0);
        if let Some(node) = self.entity_types.get_mut(entity.0) {
            node.properties.retain(|p| *p != id);
        }
        self.touch();

        Ok(())
    }

    pub(crate) fn property_mut(&mut self, id: PropertyId) -> Result<&mut Property, MetadataError> {
        self.properties
            .get_mut(id.0)
            .ok_or_else(|| MetadataError::unknown("property", id))
    }

    /// Set nullability and recompute the required flag of every foreign
    /// key the property belongs to.
    pub(crate) fn set_property_nullable(
        &mut self,
        id: PropertyId,
        nullable: bool,
        source: ConfigSource,
    ) -> Result<(), MetadataError> {
        let node = self.property_mut(id)?;
        node.nullable = nullable;
        node.nullability_source = source;

        let foreign_keys = node.foreign_keys.clone();
        for fk in foreign_keys {
            self.refresh_required(fk);
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    /// Make `properties` the primary key of `entity`.
    ///
    /// An alternate key over the same properties is promoted. The previous
    /// primary key stays as an alternate key while foreign keys reference
    /// it and is dropped otherwise.
    pub(crate) fn set_primary_key(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
    ) -> Result<KeyId, MetadataError> {
        self.check_property_list("primary key", entity, properties)?;

        let current = self.entity_type_node(entity)?.primary_key;
        if let Some(current) = current
            && let Some(key) = self.key(current)
            && key.properties == properties
        {
            return Ok(current);
        }

        let promoted = self.find_key(entity, properties);
        let id = match promoted {
            Some(id) => id,
            None => self.insert_key(entity, properties),
        };

        if let Some(previous) = current {
            self.demote_primary_key(previous);
        }

        if let Some(key) = self.keys.get_mut(id.0) {
            key.is_primary = true;
        }
        for property in properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.primary_key = Some(id);
            }
        }
        if let Some(node) = self.entity_types.get_mut(entity.0) {
            node.primary_key = Some(id);
        }
        self.touch();

        Ok(id)
    }

    pub(crate) fn add_key(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
    ) -> Result<KeyId, MetadataError> {
        self.check_property_list("key", entity, properties)?;

        if self.find_key(entity, properties).is_some() {
            return Err(MetadataError::DuplicateKey {
                entity: self.entity_name(entity),
                properties: self.format_property_ids(properties, false),
            });
        }

        let id = self.insert_key(entity, properties);
        self.touch();

        Ok(id)
    }

    pub(crate) fn remove_key(&mut self, id: KeyId) -> Result<(), MetadataError> {
        let key = self
            .key(id)
            .ok_or_else(|| MetadataError::unknown("key", id))?;

        if !key.referencing_foreign_keys.is_empty() {
            return Err(MetadataError::KeyInUse {
                entity: self.entity_name(key.entity),
                properties: self.format_property_ids(&key.properties, false),
            });
        }

        self.unlink_key(id);
        self.touch();

        Ok(())
    }

    fn find_key(&self, entity: EntityTypeId, properties: &[PropertyId]) -> Option<KeyId> {
        self.entity_type(entity)?
            .keys
            .iter()
            .copied()
            .find(|id| self.key(*id).is_some_and(|k| k.properties == properties))
    }

    fn insert_key(&mut self, entity: EntityTypeId, properties: &[PropertyId]) -> KeyId {
        let id: KeyId = self
            .keys
            .insert(Key {
                entity,
                properties: properties.to_vec(),
                is_primary: false,
                referencing_foreign_keys: Vec::new(),
                annotations: Annotations::new(),
            })
            .into();

        for property in properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.keys.push(id);
            }
        }
        if let Some(node) = self.entity_types.get_mut(entity.0) {
            node.keys.push(id);
        }

        id
    }

    fn demote_primary_key(&mut self, id: KeyId) {
        let Some(key) = self.keys.get_mut(id.0) else {
            return;
        };
        key.is_primary = false;

        let referenced = !key.referencing_foreign_keys.is_empty();
        let properties = key.properties.clone();
        for property in &properties {
            if let Some(node) = self.properties.get_mut(property.0)
                && node.primary_key == Some(id)
            {
                node.primary_key = None;
            }
        }

        if !referenced {
            self.unlink_key(id);
        }
    }

    // Drop a key and every back-reference to it. Callers check usage.
    fn unlink_key(&mut self, id: KeyId) {
        let Some(key) = self.keys.remove(id.0) else {
            return;
        };

        for property in &key.properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.keys.retain(|k| *k != id);
                if node.primary_key == Some(id) {
                    node.primary_key = None;
                }
            }
        }
        if let Some(node) = self.entity_types.get_mut(key.entity.0) {
            node.keys.retain(|k| *k != id);
            if node.primary_key == Some(id) {
                node.primary_key = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Foreign keys
    // ------------------------------------------------------------------

    pub(crate) fn add_foreign_key(
        &mut self,
        dependent: EntityTypeId,
        properties: &[PropertyId],
        principal_key: KeyId,
    ) -> Result<ForeignKeyId, MetadataError> {
        self.check_property_list("foreign key", dependent, properties)?;

        let principal = self
            .key(principal_key)
            .ok_or_else(|| MetadataError::unknown("key", principal_key))?;
        if principal.properties.len() != properties.len() {
            return Err(MetadataError::ForeignKeyArityMismatch {
                dependent: self.format_property_ids(properties, false),
                dependent_len: properties.len(),
                principal: self.format_property_ids(&principal.properties, false),
                principal_len: principal.properties.len(),
            });
        }
        let principal_entity = principal.entity;

        let duplicate = self.entity_type_node(dependent)?.foreign_keys.iter().any(|id| {
            self.foreign_key(*id)
                .is_some_and(|fk| fk.principal_key == principal_key && fk.properties == properties)
        });
        if duplicate {
            return Err(MetadataError::DuplicateForeignKey {
                entity: self.entity_name(dependent),
                properties: self.format_property_ids(properties, false),
            });
        }

        let is_required = properties
            .iter()
            .all(|id| self.property_node(*id).is_some_and(|p| !p.nullable));

        let id: ForeignKeyId = self
            .foreign_keys
            .insert(ForeignKey {
                dependent,
                properties: properties.to_vec(),
                principal_entity,
                principal_key,
                is_unique: false,
                is_required,
                annotations: Annotations::new(),
            })
            .into();

        for property in properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.foreign_keys.push(id);
            }
        }
        if let Some(key) = self.keys.get_mut(principal_key.0) {
            key.referencing_foreign_keys.push(id);
        }
        if let Some(node) = self.entity_types.get_mut(dependent.0) {
            node.foreign_keys.push(id);
        }
        self.touch();

        Ok(id)
    }

    pub(crate) fn remove_foreign_key(&mut self, id: ForeignKeyId) -> Result<(), MetadataError> {
        let fk = self
            .foreign_keys
            .remove(id.0)
            .ok_or_else(|| MetadataError::unknown("foreign key", id))?;

        for property in &fk.properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.foreign_keys.retain(|f| *f != id);
            }
        }
        if let Some(key) = self.keys.get_mut(fk.principal_key.0) {
            key.referencing_foreign_keys.retain(|f| *f != id);
        }
        if let Some(node) = self.entity_types.get_mut(fk.dependent.0) {
            node.foreign_keys.retain(|f| *f != id);
        }
        self.touch();

        Ok(())
    }

    pub(crate) fn set_foreign_key_unique(
        &mut self,
        id: ForeignKeyId,
        unique: bool,
    ) -> Result<(), MetadataError> {
        self.foreign_key_mut(id)?.is_unique = unique;

        Ok(())
    }

    fn foreign_key_mut(&mut self, id: ForeignKeyId) -> Result<&mut ForeignKey, MetadataError> {
        self.foreign_keys
            .get_mut(id.0)
            .ok_or_else(|| MetadataError::unknown("foreign key", id))
    }

    fn refresh_required(&mut self, id: ForeignKeyId) {
        let Some(fk) = self.foreign_keys.get(id.0) else {
            return;
        };
        let required = fk
            .properties
            .iter()
            .all(|p| self.properties.get(p.0).is_some_and(|p| !p.nullable));

        if let Some(fk) = self.foreign_keys.get_mut(id.0) {
            fk.is_required = required;
        }
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    pub(crate) fn add_index(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
        unique: bool,
    ) -> Result<IndexId, MetadataError> {
        self.check_property_list("index", entity, properties)?;

        let duplicate = self.entity_type_node(entity)?.indexes.iter().any(|id| {
            self.index(*id)
                .is_some_and(|index| index.properties == properties)
        });
        if duplicate {
            return Err(MetadataError::DuplicateIndex {
                entity: self.entity_name(entity),
                properties: self.format_property_ids(properties, false),
            });
        }

        let id: IndexId = self
            .indexes
            .insert(Index {
                entity,
                properties: properties.to_vec(),
                is_unique: unique,
                name: None,
                annotations: Annotations::new(),
            })
            .into();

        for property in properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.indexes.push(id);
            }
        }
        if let Some(node) = self.entity_types.get_mut(entity.0) {
            node.indexes.push(id);
        }
        self.touch();

        Ok(id)
    }

    pub(crate) fn set_index_name(
        &mut self,
        id: IndexId,
        name: Option<String>,
    ) -> Result<(), MetadataError> {
        let index = self
            .indexes
            .get_mut(id.0)
            .ok_or_else(|| MetadataError::unknown("index", id))?;
        index.name = name.filter(|n| !n.trim().is_empty());

        Ok(())
    }

    pub(crate) fn remove_index(&mut self, id: IndexId) -> Result<(), MetadataError> {
        let index = self
            .indexes
            .remove(id.0)
            .ok_or_else(|| MetadataError::unknown("index", id))?;

        for property in &index.properties {
            if let Some(node) = self.properties.get_mut(property.0) {
                node.indexes.retain(|i| *i != id);
            }
        }
        if let Some(node) = self.entity_types.get_mut(index.entity.0) {
            node.indexes.retain(|i| *i != id);
        }
        self.touch();

        Ok(())
    }

    // ------------------------------------------------------------------
    // Database functions
    // ------------------------------------------------------------------

    pub(crate) fn add_function(
        &mut self,
        name: &str,
        return_kind: ValueKind,
    ) -> Result<FunctionId, MetadataError> {
        let name = require_name("database function", name)?;
        if self.find_function(name).is_some() {
            return Err(MetadataError::DuplicateFunction(name.to_string()));
        }

        let id = self.functions.insert(DbFunction {
            name: name.to_string(),
            schema: None,
            return_kind,
            store_type: None,
            parameters: Vec::new(),
            type_mapping: None,
            annotations: Annotations::new(),
        });
        self.touch();

        Ok(id.into())
    }

    pub(crate) fn remove_function(&mut self, id: FunctionId) -> Result<(), MetadataError> {
        self.functions
            .remove(id.0)
            .ok_or_else(|| MetadataError::unknown("database function", id))?;
        self.touch();

        Ok(())
    }

    pub(crate) fn set_function_schema(
        &mut self,
        id: FunctionId,
        schema: Option<String>,
    ) -> Result<(), MetadataError> {
        self.function_mut(id)?.schema = schema;

        Ok(())
    }

    pub(crate) fn set_function_store_type(
        &mut self,
        id: FunctionId,
        store_type: Option<String>,
    ) -> Result<(), MetadataError> {
        self.function_mut(id)?.store_type = store_type;

        Ok(())
    }

    pub(crate) fn add_function_parameter(
        &mut self,
        id: FunctionId,
        name: &str,
        kind: ValueKind,
    ) -> Result<(), MetadataError> {
        let name = require_name("parameter", name)?;
        let function = self.function_mut(id)?;
        if function.parameter(name).is_some() {
            return Err(MetadataError::DuplicateParameter {
                function: function.name.clone(),
                parameter: name.to_string(),
            });
        }

        function.parameters.push(FunctionParameter {
            name: name.to_string(),
            kind,
            store_type: None,
            type_mapping: None,
        });
        self.touch();

        Ok(())
    }

    pub(crate) fn set_parameter_store_type(
        &mut self,
        id: FunctionId,
        parameter: &str,
        store_type: Option<String>,
    ) -> Result<(), MetadataError> {
        self.parameter_mut(id, parameter)?.store_type = store_type;

        Ok(())
    }

    pub(crate) fn set_function_type_mapping(
        &mut self,
        id: FunctionId,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<(), MetadataError> {
        self.function_mut(id)?.type_mapping = mapping;

        Ok(())
    }

    pub(crate) fn set_parameter_type_mapping(
        &mut self,
        id: FunctionId,
        parameter: &str,
        mapping: Option<Arc<TypeMapping>>,
    ) -> Result<(), MetadataError> {
        self.parameter_mut(id, parameter)?.type_mapping = mapping;

        Ok(())
    }

    fn function_mut(&mut self, id: FunctionId) -> Result<&mut DbFunction, MetadataError> {
        self.functions
            .get_mut(id.0)
            .ok_or_else(|| MetadataError::unknown("database function", id))
    }

    fn parameter_mut(
        &mut self,
        id: FunctionId,
        parameter: &str,
    ) -> Result<&mut FunctionParameter, MetadataError> {
        let function = self.function_mut(id)?;
        let function_name = function.name.clone();

        function
            .parameters
            .iter_mut()
            .find(|p| p.name == parameter)
            .ok_or_else(|| MetadataError::UnknownParameter {
                function: function_name,
                parameter: parameter.to_string(),
            })
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    pub(crate) fn annotations_mut(
        &mut self,
        target: AnnotationTarget,
    ) -> Result<&mut Annotations, MetadataError> {
        let found = match target {
            AnnotationTarget::Model => Some(&mut self.annotations),
            AnnotationTarget::EntityType(id) => {
                self.entity_types.get_mut(id.0).map(|n| &mut n.annotations)
            }
            AnnotationTarget::Property(id) => {
                self.properties.get_mut(id.0).map(|n| &mut n.annotations)
            }
            AnnotationTarget::Key(id) => self.keys.get_mut(id.0).map(|n| &mut n.annotations),
            AnnotationTarget::ForeignKey(id) => {
                self.foreign_keys.get_mut(id.0).map(|n| &mut n.annotations)
            }
            AnnotationTarget::Index(id) => self.indexes.get_mut(id.0).map(|n| &mut n.annotations),
            AnnotationTarget::Function(id) => {
                self.functions.get_mut(id.0).map(|n| &mut n.annotations)
            }
        };

        found.ok_or_else(|| MetadataError::unknown("annotation target", format!("{target:?}")))
    }

    // ------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------

    fn touch(&mut self) {
        self.structure_version = self.structure_version.wrapping_add(1);
    }

    fn entity_type_node(&self, id: EntityTypeId) -> Result<&EntityType, MetadataError> {
        self.entity_type(id)
            .ok_or_else(|| MetadataError::unknown("entity type", id))
    }

    fn property_node_checked(&self, id: PropertyId) -> Result<&Property, MetadataError> {
        self.property_node(id)
            .ok_or_else(|| MetadataError::unknown("property", id))
    }

    fn entity_name(&self, id: EntityTypeId) -> String {
        self.entity_type(id)
            .map_or_else(|| id.to_string(), |node| node.name.clone())
    }

    // Non-empty, live, declared on `entity`, no repeats.
    fn check_property_list(
        &self,
        element: &'static str,
        entity: EntityTypeId,
        properties: &[PropertyId],
    ) -> Result<(), MetadataError> {
        let entity_node = self.entity_type_node(entity)?;
        if properties.is_empty() {
            return Err(MetadataError::EmptyPropertyList {
                element,
                entity: entity_node.name.clone(),
            });
        }

        for (i, id) in properties.iter().enumerate() {
            let node = self.property_node_checked(*id)?;
            if node.entity != entity {
                return Err(MetadataError::ForeignProperties {
                    element,
                    entity: entity_node.name.clone(),
                    properties: self.format_property_ids(properties, false),
                });
            }
            if properties[..i].contains(id) {
                return Err(MetadataError::RepeatedProperty {
                    element,
                    properties: self.format_property_ids(properties, false),
                });
            }
        }

        Ok(())
    }
}

fn require_name<'a>(element: &'static str, name: &'a str) -> Result<&'a str, MetadataError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MetadataError::EmptyName { element });
    }

    Ok(trimmed)
}
