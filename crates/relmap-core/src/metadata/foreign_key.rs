use crate::{
    annotation::Annotations,
    metadata::{EntityTypeId, KeyId, PropertyId},
};

///
/// ForeignKey
///
/// Dependent properties paired positionally with the properties of a
/// principal key of equal length.
///

#[derive(Clone, Debug)]
pub struct ForeignKey {
    pub(crate) dependent: EntityTypeId,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) principal_entity: EntityTypeId,
    pub(crate) principal_key: KeyId,
    pub(crate) is_unique: bool,
    pub(crate) is_required: bool,
    pub(crate) annotations: Annotations,
}

impl ForeignKey {
    #[must_use]
    pub const fn dependent(&self) -> EntityTypeId {
        self.dependent
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    #[must_use]
    pub const fn principal_entity(&self) -> EntityTypeId {
        self.principal_entity
    }

    #[must_use]
    pub const fn principal_key(&self) -> KeyId {
        self.principal_key
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.is_unique
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
