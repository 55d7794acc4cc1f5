//! Reserved annotation keys.
//!
//! Keys under [`CORE_PREFIX`] name facets that are stored as typed fields on
//! the metadata nodes themselves. They are listed here so diagnostics and
//! snapshots can refer to them by name, and so the open annotation map can
//! refuse them.

pub const CORE_PREFIX: &str = "Core:";

pub const TYPE_MAPPING: &str = "Core:TypeMapping";
pub const MAX_LENGTH: &str = "Core:MaxLength";
pub const UNICODE: &str = "Core:Unicode";
pub const PRECISION: &str = "Core:Precision";
pub const SCALE: &str = "Core:Scale";
pub const STORE_TYPE: &str = "Core:StoreType";
pub const PROVIDER_VALUE_KIND: &str = "Core:ProviderValueKind";
pub const VALUE_CONVERTER: &str = "Core:ValueConverter";
pub const VALUE_COMPARER: &str = "Core:ValueComparer";
pub const KEY_VALUE_COMPARER: &str = "Core:KeyValueComparer";
pub const STRUCTURAL_VALUE_COMPARER: &str = "Core:StructuralValueComparer";

/// Every reserved key, in a stable order.
pub const ALL_CORE_KEYS: [&str; 11] = [
    TYPE_MAPPING,
    MAX_LENGTH,
    UNICODE,
    PRECISION,
    SCALE,
    STORE_TYPE,
    PROVIDER_VALUE_KIND,
    VALUE_CONVERTER,
    VALUE_COMPARER,
    KEY_VALUE_COMPARER,
    STRUCTURAL_VALUE_COMPARER,
];

/// Whether `key` lives in the reserved core namespace.
#[must_use]
pub fn is_core_key(key: &str) -> bool {
    key.starts_with(CORE_PREFIX)
}
