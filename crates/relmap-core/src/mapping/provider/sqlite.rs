use crate::mapping::{CatalogTypeMappingSource, KindRule, StoreTypeEntry};
use relmap_primitives::ValueKind;

/// SQLite catalog. Storage classes are unsized; decimals, GUIDs and
/// temporal values are stored as TEXT.
#[must_use]
pub fn mapping_source() -> CatalogTypeMappingSource {
    CatalogTypeMappingSource::new(
        "sqlite",
        [
            StoreTypeEntry::new("INTEGER", ValueKind::Long).aliases(&["INT", "BIGINT"]),
            StoreTypeEntry::new("REAL", ValueKind::Double).aliases(&["DOUBLE", "FLOAT"]),
            StoreTypeEntry::new("TEXT", ValueKind::Text)
                .aliases(&["VARCHAR", "CLOB"])
                .unicode(),
            StoreTypeEntry::new("BLOB", ValueKind::Bytes),
            StoreTypeEntry::new("NUMERIC", ValueKind::Decimal),
            StoreTypeEntry::new("GEOMETRY", ValueKind::Geometry).aliases(&[
                "POINT",
                "LINESTRING",
                "POLYGON",
                "MULTIPOINT",
                "MULTILINESTRING",
                "MULTIPOLYGON",
                "GEOMETRYCOLLECTION",
            ]),
        ],
        [
            KindRule::new(ValueKind::Bool, "INTEGER"),
            KindRule::new(ValueKind::Byte, "INTEGER"),
            KindRule::new(ValueKind::Short, "INTEGER"),
            KindRule::new(ValueKind::Int, "INTEGER"),
            KindRule::new(ValueKind::Long, "INTEGER"),
            KindRule::new(ValueKind::Decimal, "TEXT"),
            KindRule::new(ValueKind::Double, "REAL"),
            KindRule::new(ValueKind::Float, "REAL"),
            KindRule::new(ValueKind::Text, "TEXT"),
            KindRule::new(ValueKind::Char, "TEXT"),
            KindRule::new(ValueKind::Bytes, "BLOB"),
            KindRule::new(ValueKind::Guid, "TEXT"),
            KindRule::new(ValueKind::Date, "TEXT"),
            KindRule::new(ValueKind::DateTime, "TEXT"),
            KindRule::new(ValueKind::DateTimeOffset, "TEXT"),
            KindRule::new(ValueKind::Time, "TEXT"),
            KindRule::new(ValueKind::Geometry, "GEOMETRY"),
        ],
    )
}
