use crate::{
    convention::{Convention, ConventionContext, ConventionStage},
    error::InternalError,
    mapping::MappingRequest,
    metadata::Property,
    model::ModelBuilder,
};

///
/// PropertyTypeMappingConvention
///
/// Resolves and caches a type mapping for every property. The explicit
/// store type wins; otherwise the kind, converter and facets decide.
/// Unresolvable properties get no mapping and are left to validation.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyTypeMappingConvention;

impl PropertyTypeMappingConvention {
    pub const NAME: &'static str = "property_type_mapping";
}

/// Mapping request carrying every facet configured on `property`.
#[must_use]
pub fn mapping_request(property: &Property) -> MappingRequest<'_> {
    let facets = property.facets();

    MappingRequest {
        kind: Some(property.kind()),
        store_type: facets.store_type.as_deref(),
        provider_kind: facets.provider_kind,
        converter: facets.value_converter.as_ref(),
        max_length: facets.max_length,
        unicode: facets.unicode,
        precision: facets.precision,
        scale: facets.scale,
    }
}

impl Convention for PropertyTypeMappingConvention {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::TypeMapping
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        let source = context.mapping_source();
        let resolved: Vec<_> = builder
            .properties()
            .map(|p| (p.id(), source.find_mapping(&mapping_request(p.node()))))
            .collect();

        for (id, mapping) in resolved {
            builder.set_type_mapping(id, mapping)?;
        }

        Ok(())
    }
}
