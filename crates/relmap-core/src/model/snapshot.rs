use crate::metadata::{EntityTypeId, Graph, KeyId, PropertyId};
use relmap_primitives::ValueKind;
use serde::{Deserialize, Serialize};

///
/// ModelSnapshot
///
/// Plain-data rendering of a graph with names instead of ids and resolved
/// store types instead of mapping handles. Used for diagnostics and for
/// comparing finalization results.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ModelSnapshot {
    pub entities: Vec<EntitySnapshot>,
    pub functions: Vec<FunctionSnapshot>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub properties: Vec<PropertySnapshot>,
    pub primary_key: Option<KeySnapshot>,
    pub alternate_keys: Vec<KeySnapshot>,
    pub foreign_keys: Vec<ForeignKeySnapshot>,
    pub indexes: Vec<IndexSnapshot>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PropertySnapshot {
    pub name: String,
    pub kind: ValueKind,
    pub nullable: bool,
    /// Store type of the resolved mapping.
    pub store_type: Option<String>,
    pub converter: Option<String>,
    pub comparer: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeySnapshot {
    pub properties: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ForeignKeySnapshot {
    pub properties: Vec<String>,
    pub principal_entity: String,
    pub principal_properties: Vec<String>,
    pub required: bool,
    pub unique: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexSnapshot {
    pub name: Option<String>,
    pub properties: Vec<String>,
    pub unique: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FunctionSnapshot {
    pub name: String,
    pub schema: Option<String>,
    pub return_kind: ValueKind,
    pub store_type: Option<String>,
    pub parameters: Vec<ParameterSnapshot>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParameterSnapshot {
    pub name: String,
    pub kind: ValueKind,
    pub store_type: Option<String>,
}

impl ModelSnapshot {
    #[must_use]
    pub fn capture(graph: &Graph) -> Self {
        let entities = graph
            .entity_types()
            .map(|(id, entity)| EntitySnapshot {
                name: entity.name().to_string(),
                properties: graph
                    .entity_properties(id)
                    .map(|p| PropertySnapshot {
                        name: p.name().to_string(),
                        kind: p.node().kind(),
                        nullable: p.node().is_nullable(),
                        store_type: p.find_type_mapping().map(|m| m.store_type.clone()),
                        converter: p.value_converter().map(|c| c.name.clone()),
                        comparer: p.value_comparer().map(|c| c.name().to_string()),
                    })
                    .collect(),
                primary_key: entity.primary_key().map(|k| key_snapshot(graph, k)),
                alternate_keys: entity
                    .keys()
                    .iter()
                    .filter(|k| Some(**k) != entity.primary_key())
                    .map(|k| key_snapshot(graph, *k))
                    .collect(),
                foreign_keys: entity
                    .foreign_keys()
                    .iter()
                    .filter_map(|fk| graph.foreign_key(*fk))
                    .map(|fk| ForeignKeySnapshot {
                        properties: names(graph, fk.properties()),
                        principal_entity: entity_name(graph, fk.principal_entity()),
                        principal_properties: graph
                            .key(fk.principal_key())
                            .map(|k| names(graph, k.properties()))
                            .unwrap_or_default(),
                        required: fk.is_required(),
                        unique: fk.is_unique(),
                    })
                    .collect(),
                indexes: entity
                    .indexes()
                    .iter()
                    .filter_map(|ix| graph.index(*ix))
                    .map(|ix| IndexSnapshot {
                        name: ix.name().map(str::to_string),
                        properties: names(graph, ix.properties()),
                        unique: ix.is_unique(),
                    })
                    .collect(),
            })
            .collect();

        let functions = graph
            .functions()
            .map(|(_, function)| FunctionSnapshot {
                name: function.name().to_string(),
                schema: function.schema().map(str::to_string),
                return_kind: function.return_kind(),
                store_type: function.type_mapping().map(|m| m.store_type.clone()),
                parameters: function
                    .parameters()
                    .iter()
                    .map(|p| ParameterSnapshot {
                        name: p.name().to_string(),
                        kind: p.kind(),
                        store_type: p.type_mapping().map(|m| m.store_type.clone()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            entities,
            functions,
        }
    }
}

fn key_snapshot(graph: &Graph, id: KeyId) -> KeySnapshot {
    KeySnapshot {
        properties: graph
            .key(id)
            .map(|k| names(graph, k.properties()))
            .unwrap_or_default(),
    }
}

fn names(graph: &Graph, ids: &[PropertyId]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| graph.property_node(*id))
        .map(|p| p.name().to_string())
        .collect()
}

fn entity_name(graph: &Graph, id: EntityTypeId) -> String {
    graph
        .entity_type(id)
        .map(|e| e.name().to_string())
        .unwrap_or_default()
}
