use crate::{
    convention::{Convention, ConventionContext, ConventionStage, KeyDiscoveryConvention},
    error::InternalError,
    model::ModelBuilder,
};

///
/// KeyNullabilityConvention
///
/// Key properties are required. Explicitly nullable key properties are left
/// for validation to reject.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct KeyNullabilityConvention;

impl KeyNullabilityConvention {
    pub const NAME: &'static str = "key_nullability";
}

impl Convention for KeyNullabilityConvention {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::Shape
    }

    fn runs_after(&self) -> &'static [&'static str] {
        &[KeyDiscoveryConvention::NAME]
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        _context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        let nullable_key_properties: Vec<_> = builder
            .properties()
            .filter(|p| p.is_key() && p.node().is_nullable())
            .map(|p| p.id())
            .collect();

        for id in nullable_key_properties {
            builder.set_nullable_by_convention(id, false)?;
        }

        Ok(())
    }
}
