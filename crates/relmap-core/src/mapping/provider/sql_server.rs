use crate::mapping::{CatalogTypeMappingSource, KindRule, StoreTypeEntry, StoreTypeSizing};
use relmap_primitives::ValueKind;

const DECIMAL: StoreTypeSizing = StoreTypeSizing::Precision {
    default_precision: 18,
    default_scale: 2,
};

/// SQL Server catalog.
#[must_use]
pub fn mapping_source() -> CatalogTypeMappingSource {
    CatalogTypeMappingSource::new(
        "sql_server",
        [
            StoreTypeEntry::new("bit", ValueKind::Bool),
            StoreTypeEntry::new("tinyint", ValueKind::Byte),
            StoreTypeEntry::new("smallint", ValueKind::Short),
            StoreTypeEntry::new("int", ValueKind::Int),
            StoreTypeEntry::new("bigint", ValueKind::Long),
            StoreTypeEntry::new("decimal", ValueKind::Decimal)
                .aliases(&["numeric", "dec"])
                .sizing(DECIMAL),
            StoreTypeEntry::new("money", ValueKind::Decimal),
            StoreTypeEntry::new("float", ValueKind::Double),
            StoreTypeEntry::new("real", ValueKind::Float),
            StoreTypeEntry::new("nvarchar", ValueKind::Text)
                .aliases(&["national character varying", "national char varying"])
                .unicode()
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("varchar", ValueKind::Text)
                .aliases(&["character varying", "char varying"])
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("nchar", ValueKind::Char)
                .aliases(&["national character", "national char"])
                .unicode()
                .fixed_length()
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("char", ValueKind::Char)
                .aliases(&["character"])
                .fixed_length()
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("varbinary", ValueKind::Bytes)
                .aliases(&["binary varying"])
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("binary", ValueKind::Bytes)
                .fixed_length()
                .sizing(StoreTypeSizing::Length),
            StoreTypeEntry::new("uniqueidentifier", ValueKind::Guid),
            StoreTypeEntry::new("date", ValueKind::Date),
            StoreTypeEntry::new("datetime2", ValueKind::DateTime)
                .sizing(StoreTypeSizing::FractionalSeconds),
            StoreTypeEntry::new("datetime", ValueKind::DateTime),
            StoreTypeEntry::new("datetimeoffset", ValueKind::DateTimeOffset)
                .sizing(StoreTypeSizing::FractionalSeconds),
            StoreTypeEntry::new("time", ValueKind::Time)
                .sizing(StoreTypeSizing::FractionalSeconds),
            StoreTypeEntry::new("geography", ValueKind::Geometry),
            StoreTypeEntry::new("geometry", ValueKind::Geometry),
        ],
        [
            KindRule::new(ValueKind::Bool, "bit"),
            KindRule::new(ValueKind::Byte, "tinyint"),
            KindRule::new(ValueKind::Short, "smallint"),
            KindRule::new(ValueKind::Int, "int"),
            KindRule::new(ValueKind::Long, "bigint"),
            KindRule::new(ValueKind::Decimal, "decimal"),
            KindRule::new(ValueKind::Double, "float"),
            KindRule::new(ValueKind::Float, "real"),
            KindRule::new(ValueKind::Text, "nvarchar")
                .ansi("varchar")
                .unbounded(),
            KindRule::new(ValueKind::Char, "nchar").ansi("char"),
            KindRule::new(ValueKind::Bytes, "varbinary").unbounded(),
            KindRule::new(ValueKind::Guid, "uniqueidentifier"),
            KindRule::new(ValueKind::Date, "date"),
            KindRule::new(ValueKind::DateTime, "datetime2"),
            KindRule::new(ValueKind::DateTimeOffset, "datetimeoffset"),
            KindRule::new(ValueKind::Time, "time"),
            KindRule::new(ValueKind::Geometry, "geography"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{MappingRequest, TypeMappingSource};

    #[test]
    fn text_defaults_to_unbounded_unicode() {
        let source = mapping_source();
        let mapping = source.find_mapping_by_kind(ValueKind::Text).unwrap();

        assert_eq!(mapping.store_type, "nvarchar(max)");
        assert!(mapping.unicode);
        assert_eq!(mapping.size, None);
    }

    #[test]
    fn keyed_text_uses_configured_length() {
        let source = mapping_source();
        let request = MappingRequest {
            max_length: Some(450),
            ..MappingRequest::for_kind(ValueKind::Text)
        };

        assert_eq!(
            source.find_mapping(&request).unwrap().store_type,
            "nvarchar(450)"
        );
    }

    #[test]
    fn spatial_types_are_mapped() {
        let source = mapping_source();

        assert_eq!(
            source
                .find_mapping_by_kind(ValueKind::Geometry)
                .unwrap()
                .store_type,
            "geography"
        );
        assert_eq!(
            source.find_mapping_by_store_type("GEOMETRY").unwrap().kind,
            ValueKind::Geometry
        );
    }

    #[test]
    fn bytes_use_structural_comparer() {
        let source = mapping_source();
        let mapping = source.find_mapping_by_kind(ValueKind::Bytes).unwrap();

        assert_eq!(mapping.store_type, "varbinary(max)");
        assert_eq!(mapping.comparer, crate::mapping::ValueComparer::Bytes);
    }
}
