use proptest::prelude::*;
use relmap_core::{
    mapping::{MappingRequest, TypeMappingSource, provider::sql_server},
    metadata::PropertyId,
    model::ModelBuilder,
};
use relmap_primitives::{ALL_VALUE_KINDS, ValueKind, ValueType};
use std::sync::Arc;

fn arb_kind() -> impl Strategy<Value = ValueKind> {
    prop::sample::select(ALL_VALUE_KINDS.to_vec())
}

fn arb_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][a-z]{1,6}", 1..max)
        .prop_map(|names| names.into_iter().collect())
}

// Principal with a composite key of `arity` int properties and a dependent
// whose foreign key lists its properties in `order`.
fn composite(arity: usize, order: &[usize]) -> (ModelBuilder, Vec<PropertyId>, Vec<PropertyId>) {
    let mut builder = ModelBuilder::new();
    let principal = builder.add_entity_type("Principal").expect("principal");
    let dependent = builder.add_entity_type("Dependent").expect("dependent");

    let mut key = Vec::new();
    let mut columns = Vec::new();
    for i in 0..arity {
        key.push(
            builder
                .add_property(principal, &format!("K{i}"), ValueType::required(ValueKind::Int))
                .expect("key property"),
        );
        columns.push(
            builder
                .add_property(dependent, &format!("D{i}"), ValueType::required(ValueKind::Int))
                .expect("dependent property"),
        );
    }

    let key_id = builder.set_primary_key(principal, &key).expect("key");
    let fk_properties: Vec<_> = order.iter().map(|&i| columns[i]).collect();
    builder
        .add_foreign_key(dependent, &fk_properties, key_id)
        .expect("fk");

    (builder, key, fk_properties)
}

proptest! {
    #[test]
    fn format_keeps_input_order(names in arb_names(6), kinds in prop::collection::vec(arb_kind(), 6)) {
        let mut builder = ModelBuilder::new();
        let entity = builder.add_entity_type("Row").expect("entity");

        let mut ids = Vec::new();
        let mut expected_plain = Vec::new();
        let mut expected_typed = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let value_type = ValueType::new(kinds[i], i % 2 == 1);
            ids.push(builder.add_property(entity, name, value_type).expect("property"));
            expected_plain.push(format!("'{name}'"));
            expected_typed.push(format!("'{name}' : {value_type}"));
        }
        ids.reverse();
        expected_plain.reverse();
        expected_typed.reverse();

        prop_assert_eq!(
            builder.format_property_ids(&ids, false),
            format!("{{{}}}", expected_plain.join(", "))
        );
        prop_assert_eq!(
            builder.format_property_ids(&ids, true),
            format!("{{{}}}", expected_typed.join(", "))
        );
    }

    #[test]
    fn principal_follows_foreign_key_ordinal(
        order in (1usize..5).prop_flat_map(|arity| Just((0..arity).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let (builder, key, fk_properties) = composite(order.len(), &order);

        for (ordinal, id) in fk_properties.iter().enumerate() {
            let dependent = builder.property(*id).expect("dependent");
            let principal = dependent.find_principal().expect("principal");

            prop_assert_eq!(principal.id(), key[ordinal]);
            prop_assert!(principal.find_principal().is_none());
        }
    }

    #[test]
    fn primary_key_membership_implies_key_membership(
        order in (1usize..4).prop_flat_map(|arity| Just((0..arity).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let (builder, _, _) = composite(order.len(), &order);

        for property in builder.properties() {
            if property.is_primary_key() {
                prop_assert!(property.is_key());
            }
            prop_assert_eq!(property.is_key(), property.containing_keys().next().is_some());
            prop_assert_eq!(
                property.is_foreign_key(),
                property.containing_foreign_keys().next().is_some()
            );
        }
    }

    #[test]
    fn explicit_store_type_beats_kind(
        kind in arb_kind(),
        store_type in prop::sample::select(vec!["int", "bit", "nvarchar(40)", "decimal(10,2)", "datetime2", "uniqueidentifier"]),
    ) {
        let source = sql_server::mapping_source();
        let request = MappingRequest {
            store_type: Some(store_type),
            ..MappingRequest::for_kind(kind)
        };

        let resolved = source.find_mapping(&request);
        let direct = source.find_mapping_by_store_type(store_type);

        prop_assert!(direct.is_some());
        match (resolved, direct) {
            (Some(resolved), Some(direct)) => prop_assert!(Arc::ptr_eq(&resolved, &direct)),
            (resolved, _) => prop_assert!(false, "unresolved: {:?}", resolved),
        }
    }

    #[test]
    fn repeated_lookups_share_identity(kind in arb_kind()) {
        let source = sql_server::mapping_source();

        let first = source.find_mapping_by_kind(kind);
        let second = source.find_mapping_by_kind(kind);
        match (first, second) {
            (Some(a), Some(b)) => prop_assert!(Arc::ptr_eq(&a, &b)),
            (None, None) => {}
            _ => prop_assert!(false, "lookups disagree for {}", kind),
        }
    }
}
