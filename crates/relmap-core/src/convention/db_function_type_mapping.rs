use crate::{
    convention::{Convention, ConventionContext, ConventionStage},
    error::InternalError,
    mapping::resolve,
    model::ModelBuilder,
};

///
/// DbFunctionTypeMappingConvention
///
/// Assigns a type mapping to the return value and every parameter of each
/// database function. A non-blank explicit store type is resolved by name;
/// otherwise the declared kind is used. An unresolved mapping is assigned
/// as absent and never fails the pass.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DbFunctionTypeMappingConvention;

impl DbFunctionTypeMappingConvention {
    pub const NAME: &'static str = "db_function_type_mapping";
}

impl Convention for DbFunctionTypeMappingConvention {
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
            .functions()
            .map(|(id, function)| {
                let returns = resolve(source, function.store_type(), function.return_kind());
                let parameters: Vec<_> = function
                    .parameters()
                    .iter()
                    .map(|p| {
                        let mapping = resolve(source, p.store_type(), p.kind());
                        (p.name().to_string(), mapping)
                    })
                    .collect();

                (id, returns, parameters)
            })
            .collect();

        for (id, returns, parameters) in resolved {
            builder.set_function_type_mapping(id, returns)?;
            for (name, mapping) in parameters {
                builder.set_parameter_type_mapping(id, &name, mapping)?;
            }
        }

        Ok(())
    }
}
