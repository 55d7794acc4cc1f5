use crate::{
    annotation::Annotations,
    metadata::{EntityTypeId, ForeignKeyId, PropertyId},
};

///
/// Key
///
/// Ordered, fixed-size property sequence that uniquely identifies
/// instances of its entity type.
///

#[derive(Clone, Debug)]
pub struct Key {
    pub(crate) entity: EntityTypeId,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) is_primary: bool,
    /// Foreign keys that target this key as their principal.
    pub(crate) referencing_foreign_keys: Vec<ForeignKeyId>,
    pub(crate) annotations: Annotations,
}

impl Key {
    #[must_use]
    pub const fn entity(&self) -> EntityTypeId {
        self.entity
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.is_primary
    }

    #[must_use]
    pub fn referencing_foreign_keys(&self) -> &[ForeignKeyId] {
        &self.referencing_foreign_keys
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
