use crate::{
    convention::{Convention, ConventionContext, ConventionStage},
    error::InternalError,
    metadata::{EntityTypeId, Graph, PropertyId},
    model::ModelBuilder,
};

///
/// ModelValidationConvention
///
/// Final read-only checks. The first problem found rejects the model;
/// checks run in a fixed order so the reported diagnostic is stable.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ModelValidationConvention;

impl ModelValidationConvention {
    pub const NAME: &'static str = "model_validation";
}

impl Convention for ModelValidationConvention {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::Validation
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        _context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        let graph = builder.graph();

        validate_primary_keys(graph)?;
        validate_key_nullability(graph)?;
        validate_foreign_key_kinds(graph)?;
        validate_property_mappings(graph)?;
        validate_function_mappings(graph)?;

        Ok(())
    }
}

fn entity_name(graph: &Graph, id: EntityTypeId) -> &str {
    graph.entity_type(id).map_or("?", |e| e.name())
}

fn validate_primary_keys(graph: &Graph) -> Result<(), InternalError> {
    if let Some((_, entity)) = graph
        .entity_types()
        .find(|(_, entity)| entity.primary_key().is_none())
    {
        return Err(InternalError::model_validation(format!(
            "entity type '{}' requires a primary key",
            entity.name()
        )));
    }

    Ok(())
}

fn validate_key_nullability(graph: &Graph) -> Result<(), InternalError> {
    for (_, key) in graph.keys() {
        let nullable: Vec<PropertyId> = key
            .properties()
            .iter()
            .copied()
            .filter(|id| graph.property_node(*id).is_some_and(|p| p.is_nullable()))
            .collect();

        if !nullable.is_empty() {
            let kind = if key.is_primary() {
                "primary key"
            } else {
                "key"
            };

            return Err(InternalError::model_validation(format!(
                "{kind} {} on entity type '{}' contains nullable properties {}",
                graph.format_property_ids(key.properties(), false),
                entity_name(graph, key.entity()),
                graph.format_property_ids(&nullable, true),
            )));
        }
    }

    Ok(())
}

fn validate_foreign_key_kinds(graph: &Graph) -> Result<(), InternalError> {
    for (_, fk) in graph.foreign_keys() {
        let Some(principal) = graph.key(fk.principal_key()) else {
            continue;
        };

        let mismatch = fk
            .properties()
            .iter()
            .zip(principal.properties())
            .any(|(dependent, principal)| {
                let dependent = graph.property_node(*dependent).map(|p| p.kind());
                let principal = graph.property_node(*principal).map(|p| p.kind());

                dependent != principal
            });

        if mismatch {
            return Err(InternalError::model_validation(format!(
                "the types of foreign key properties {} on entity type '{}' do not match the types of principal key properties {} on entity type '{}'",
                graph.format_property_ids(fk.properties(), true),
                entity_name(graph, fk.dependent()),
                graph.format_property_ids(principal.properties(), true),
                entity_name(graph, fk.principal_entity()),
            )));
        }
    }

    Ok(())
}

fn validate_property_mappings(graph: &Graph) -> Result<(), InternalError> {
    for property in graph.properties() {
        if property.find_type_mapping().is_some() {
            continue;
        }

        let entity = property.entity_type().map_or("?", |e| e.name());
        let requested = property
            .store_type()
            .map_or_else(String::new, |s| format!(" with store type '{s}'"));

        return Err(InternalError::model_validation(format!(
            "property '{entity}.{}' of type {}{requested} could not be mapped to a store type",
            property.name(),
            property.node().value_type(),
        )));
    }

    Ok(())
}

fn validate_function_mappings(graph: &Graph) -> Result<(), InternalError> {
    for (_, function) in graph.functions() {
        if function.type_mapping().is_none() {
            return Err(InternalError::model_validation(format!(
                "return type {} of database function '{}' could not be mapped to a store type",
                function
                    .store_type()
                    .unwrap_or(function.return_kind().name()),
                function.name(),
            )));
        }

        if let Some(parameter) = function
            .parameters()
            .iter()
            .find(|p| p.type_mapping().is_none())
        {
            return Err(InternalError::model_validation(format!(
                "parameter '{}' of database function '{}' with type {} could not be mapped to a store type",
                parameter.name(),
                function.name(),
                parameter.store_type().unwrap_or(parameter.kind().name()),
            )));
        }
    }

    Ok(())
}
