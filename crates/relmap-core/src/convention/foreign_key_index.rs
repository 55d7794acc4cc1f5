use crate::{
    convention::{Convention, ConventionContext, ConventionStage},
    error::InternalError,
    metadata::{EntityTypeId, Graph, PropertyId},
    model::ModelBuilder,
};

///
/// ForeignKeyIndexConvention
///
/// Indexes the dependent properties of every foreign key unless an existing
/// index or key on the dependent entity type already starts with them.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ForeignKeyIndexConvention;

impl ForeignKeyIndexConvention {
    pub const NAME: &'static str = "foreign_key_index";

    fn is_covered(graph: &Graph, entity: EntityTypeId, properties: &[PropertyId]) -> bool {
        let Some(entity) = graph.entity_type(entity) else {
            return true;
        };

        let index_prefix = entity
            .indexes()
            .iter()
            .filter_map(|id| graph.index(*id))
            .any(|index| index.properties().starts_with(properties));
        let key_prefix = entity
            .keys()
            .iter()
            .filter_map(|id| graph.key(*id))
            .any(|key| key.properties().starts_with(properties));

        index_prefix || key_prefix
    }
}

impl Convention for ForeignKeyIndexConvention {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::Relationship
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        if !context.config().index_foreign_keys {
            return Ok(());
        }

        let graph = builder.graph();
        let uncovered: Vec<_> = graph
            .foreign_keys()
            .filter(|(_, fk)| !Self::is_covered(graph, fk.dependent(), fk.properties()))
            .map(|(_, fk)| (fk.dependent(), fk.properties().to_vec(), fk.is_unique()))
            .collect();

        for (entity, properties, unique) in uncovered {
            // two foreign keys over the same columns need only one index
            if Self::is_covered(builder.graph(), entity, &properties) {
                continue;
            }
            builder.add_index(entity, &properties, unique)?;
        }

        Ok(())
    }
}
