use crate::{
    annotation::Annotations,
    metadata::{EntityTypeId, PropertyId},
};

///
/// Index
///
/// Property set used for lookups. Field order is significant for prefix
/// coverage checks.
///

#[derive(Clone, Debug)]
pub struct Index {
    pub(crate) entity: EntityTypeId,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) is_unique: bool,
    pub(crate) name: Option<String>,
    pub(crate) annotations: Annotations,
}

impl Index {
    #[must_use]
    pub const fn entity(&self) -> EntityTypeId {
        self.entity
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.is_unique
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
