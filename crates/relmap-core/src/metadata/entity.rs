use crate::{
    annotation::Annotations,
    metadata::{ForeignKeyId, IndexId, KeyId, PropertyId},
};

///
/// EntityType
///
/// A modeled kind of object. Holds ordered handles to everything declared
/// on it; the nodes themselves live in the graph arenas.
///

#[derive(Clone, Debug)]
pub struct EntityType {
    pub(crate) name: String,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) primary_key: Option<KeyId>,
    /// Primary and alternate keys, in declaration order.
    pub(crate) keys: Vec<KeyId>,
    pub(crate) foreign_keys: Vec<ForeignKeyId>,
    pub(crate) indexes: Vec<IndexId>,
    pub(crate) annotations: Annotations,
}

impl EntityType {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            properties: Vec::new(),
            primary_key: None,
            keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    #[must_use]
    pub const fn primary_key(&self) -> Option<KeyId> {
        self.primary_key
    }

    #[must_use]
    pub fn keys(&self) -> &[KeyId] {
        &self.keys
    }

    /// Foreign keys declared on this entity as the dependent side.
    #[must_use]
    pub fn foreign_keys(&self) -> &[ForeignKeyId] {
        &self.foreign_keys
    }

    #[must_use]
    pub fn indexes(&self) -> &[IndexId] {
        &self.indexes
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
