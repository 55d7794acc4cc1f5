//! Logical value kinds shared by the metadata graph, type mapping sources
//! and provider catalogs.

#[macro_use]
mod macros;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

///
/// ValueKind
///
/// Logical (model-side) kind of a property, function return value or
/// function parameter. Store representations are chosen by a type
/// mapping source; this enum only describes what the model holds.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum ValueKind {
    Bool,
    Byte,
    Bytes,
    Char,
    Date,
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Float,
    Geometry,
    Guid,
    Int,
    Long,
    Short,
    Text,
    Time,
}

impl ValueKind {
    /// Return the full metadata descriptor for one value kind.
    #[must_use]
    pub const fn metadata(self) -> ValueKindMetadata {
        value_kind_registry!(metadata_from_registry, self)
    }

    /// Canonical lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.metadata().name
    }

    #[must_use]
    pub const fn family(self) -> ValueFamily {
        self.metadata().family
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.metadata().is_numeric
    }

    /// Whether a max-length facet is meaningful for this kind.
    #[must_use]
    pub const fn supports_max_length(self) -> bool {
        self.metadata().supports_max_length
    }

    /// Whether a unicode facet is meaningful for this kind.
    #[must_use]
    pub const fn supports_unicode(self) -> bool {
        self.metadata().supports_unicode
    }

    #[must_use]
    pub const fn supports_precision(self) -> bool {
        self.metadata().supports_precision
    }

    /// Whether values of this kind may participate in keys.
    #[must_use]
    pub const fn is_keyable(self) -> bool {
        self.metadata().is_keyable
    }

    #[must_use]
    pub const fn is_spatial(self) -> bool {
        matches!(self.family(), ValueFamily::Spatial)
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = ParseValueKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();

        ALL_VALUE_KINDS
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseValueKindError(s.to_string()))
    }
}

///
/// ParseValueKindError
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseValueKindError(pub String);

impl Display for ParseValueKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value kind '{}'", self.0)
    }
}

impl std::error::Error for ParseValueKindError {}

///
/// ValueKindMetadata
///
/// Capability metadata consulted by type mapping and validation.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ValueKindMetadata {
    pub family: ValueFamily,
    pub name: &'static str,
    pub is_numeric: bool,
    pub supports_max_length: bool,
    pub supports_unicode: bool,
    pub supports_precision: bool,
    pub is_keyable: bool,
}

///
/// ValueFamily
///
/// Coarse grouping used when matching store types to value kinds.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueFamily {
    Binary,
    Bool,
    Identifier,
    Numeric,
    Spatial,
    Temporal,
    Textual,
}

///
/// ValueType
///
/// A value kind plus nullability, rendered as `int` or `int?`.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ValueType {
    pub kind: ValueKind,
    pub nullable: bool,
}

impl ValueType {
    #[must_use]
    pub const fn new(kind: ValueKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    #[must_use]
    pub const fn required(kind: ValueKind) -> Self {
        Self::new(kind, false)
    }

    #[must_use]
    pub const fn optional(kind: ValueKind) -> Self {
        Self::new(kind, true)
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Ordered list of all value kinds in registry order.
pub const ALL_VALUE_KINDS: [ValueKind; 17] = value_kind_registry!(all_kinds_from_registry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in ALL_VALUE_KINDS {
            assert_eq!(kind.name().parse::<ValueKind>(), Ok(kind));
        }
    }

    #[test]
    fn registry_names_are_unique() {
        let mut names: Vec<_> = ALL_VALUE_KINDS.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), ALL_VALUE_KINDS.len());
    }

    #[test]
    fn from_str_is_case_insensitive_and_rejects_unknown() {
        assert_eq!("INT".parse::<ValueKind>(), Ok(ValueKind::Int));
        assert_eq!(" string ".parse::<ValueKind>(), Ok(ValueKind::Text));
        assert!("varchar".parse::<ValueKind>().is_err());
    }

    #[test]
    fn value_type_renders_nullability_suffix() {
        assert_eq!(ValueType::required(ValueKind::Int).to_string(), "int");
        assert_eq!(ValueType::optional(ValueKind::Long).to_string(), "long?");
    }

    #[test]
    fn facet_capabilities_follow_family() {
        assert!(ValueKind::Text.supports_max_length());
        assert!(ValueKind::Text.supports_unicode());
        assert!(!ValueKind::Bytes.supports_unicode());
        assert!(ValueKind::Decimal.supports_precision());
        assert!(ValueKind::Geometry.is_spatial());
        assert!(!ValueKind::Geometry.is_keyable());
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&ValueKind::DateTimeOffset).unwrap();
        assert_eq!(json, "\"date_time_offset\"");
    }
}
