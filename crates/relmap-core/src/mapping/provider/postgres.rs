use crate::mapping::{CatalogTypeMappingSource, KindRule, StoreTypeEntry, StoreTypeSizing};
use relmap_primitives::ValueKind;

/// PostgreSQL catalog. Text is always unicode, so no ANSI variants exist.
#[must_use]
pub fn mapping_source() -> CatalogTypeMappingSource {
    CatalogTypeMappingSource::new(
        "postgres",
        [
            StoreTypeEntry::new("boolean", ValueKind::Bool).aliases(&["bool"]),
            StoreTypeEntry::new("smallint", ValueKind::Short).aliases(&["int2"]),
            StoreTypeEntry::new("integer", ValueKind::Int).aliases(&["int", "int4"]),
            StoreTypeEntry::new("bigint", ValueKind::Long).aliases(&["int8"]),
            StoreTypeEntry::new("numeric", ValueKind::Decimal)
                .aliases(&["decimal"])
                .sizing(StoreTypeSizing::Precision {
                    default_precision: 18,
                    default_scale: 2,
                }),
            StoreTypeEntry::new("double precision", ValueKind::Double).aliases(&["float8"]),
            StoreTypeEntry::new("real", ValueKind::Float).aliases(&["float4"]),
            StoreTypeEntry::new("text", ValueKind::Text).unicode(),
            StoreTypeEntry::new("character varying", ValueKind::Text)
                .aliases(&["varchar"])
                .unicode()
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("character", ValueKind::Char)
                .aliases(&["char", "bpchar"])
                .unicode()
                .fixed_length()
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("bytea", ValueKind::Bytes),
            StoreTypeEntry::new("uuid", ValueKind::Guid),
            StoreTypeEntry::new("date", ValueKind::Date),
            StoreTypeEntry::new("timestamp without time zone", ValueKind::DateTime)
                .aliases(&["timestamp"])
                .sizing(StoreTypeSizing::FractionalSeconds),
            StoreTypeEntry::new("timestamp with time zone", ValueKind::DateTimeOffset)
                .aliases(&["timestamptz"])
                .sizing(StoreTypeSizing::FractionalSeconds),
            StoreTypeEntry::new("interval", ValueKind::Time),
            StoreTypeEntry::new("time without time zone", ValueKind::Time)
                .aliases(&["time"])
                .sizing(StoreTypeSizing::FractionalSeconds),
            StoreTypeEntry::new("geometry", ValueKind::Geometry),
            StoreTypeEntry::new("geography", ValueKind::Geometry),
        ],
        [
            KindRule::new(ValueKind::Bool, "boolean"),
            KindRule::new(ValueKind::Byte, "smallint"),
            KindRule::new(ValueKind::Short, "smallint"),
            KindRule::new(ValueKind::Int, "integer"),
            KindRule::new(ValueKind::Long, "bigint"),
            KindRule::new(ValueKind::Decimal, "numeric"),
            KindRule::new(ValueKind::Double, "double precision"),
            KindRule::new(ValueKind::Float, "real"),
            KindRule::new(ValueKind::Text, "text"),
            KindRule::new(ValueKind::Char, "character"),
            KindRule::new(ValueKind::Bytes, "bytea"),
            KindRule::new(ValueKind::Guid, "uuid"),
            KindRule::new(ValueKind::Date, "date"),
            KindRule::new(ValueKind::DateTime, "timestamp without time zone"),
            KindRule::new(ValueKind::DateTimeOffset, "timestamp with time zone"),
            KindRule::new(ValueKind::Time, "interval"),
            KindRule::new(ValueKind::Geometry, "geometry"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{MappingRequest, TypeMappingSource};

    #[test]
    fn bounded_text_needs_an_explicit_store_type() {
        let source = mapping_source();
        let request = MappingRequest {
            max_length: Some(20),
            ..MappingRequest::for_kind(ValueKind::Text)
        };

        // `text` is unsized; the length facet does not change the store type.
        assert_eq!(source.find_mapping(&request).unwrap().store_type, "text");
        assert_eq!(
            source
                .find_mapping_by_store_type("varchar(20)")
                .unwrap()
                .store_type,
            "character varying(20)"
        );
    }

    #[test]
    fn multi_word_store_types_resolve() {
        let source = mapping_source();

        assert_eq!(
            source
                .find_mapping_by_store_type("TIMESTAMPTZ")
                .unwrap()
                .kind,
            ValueKind::DateTimeOffset
        );
        assert_eq!(
            source
                .find_mapping_by_store_type("double   precision")
                .unwrap()
                .store_type,
            "double precision"
        );
    }

    #[test]
    fn byte_kind_widens_to_smallint() {
        let mapping = mapping_source()
            .find_mapping_by_kind(ValueKind::Byte)
            .unwrap();

        assert_eq!(mapping.store_type, "smallint");
        assert_eq!(mapping.kind, ValueKind::Byte);
    }
}
