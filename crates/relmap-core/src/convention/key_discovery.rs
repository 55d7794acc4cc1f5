use crate::{
    convention::{Convention, ConventionContext, ConventionStage},
    error::InternalError,
    metadata::{EntityTypeId, Graph, PropertyId},
    model::ModelBuilder,
};
use tracing::trace;

///
/// KeyDiscoveryConvention
///
/// Gives every entity type without a primary key one made of the property
/// named `Id` or `<EntityType>Id`, compared case-insensitively. Nothing is
/// discovered when both names match or the property kind cannot be a key.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct KeyDiscoveryConvention;

impl KeyDiscoveryConvention {
    pub const NAME: &'static str = "key_discovery";

    fn candidate(graph: &Graph, entity: EntityTypeId) -> Option<PropertyId> {
        let name = graph.entity_type(entity)?.name();
        let typed = format!("{name}Id");

        let mut matches = graph.entity_properties(entity).filter(|p| {
            p.name().eq_ignore_ascii_case("Id") || p.name().eq_ignore_ascii_case(&typed)
        });
        let first = matches.next()?;
        if matches.next().is_some() || !first.node().kind().is_keyable() {
            return None;
        }

        Some(first.id())
    }
}

impl Convention for KeyDiscoveryConvention {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::Shape
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        if !context.config().discover_keys {
            return Ok(());
        }

        let graph = builder.graph();
        let discovered: Vec<_> = graph
            .entity_types()
            .filter(|(_, entity)| entity.primary_key().is_none())
            .filter_map(|(id, _)| Self::candidate(graph, id).map(|p| (id, p)))
            .collect();

        for (entity, property) in discovered {
            trace!(entity = %entity, property = %property, "discovered primary key");
            builder.set_primary_key(entity, &[property])?;
        }

        Ok(())
    }
}
