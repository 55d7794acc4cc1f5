use relmap_primitives::ValueKind;
use serde::Serialize;
use std::fmt::{self, Display};

///
/// ValueConverter
///
/// Describes a conversion between the model-side kind of a value and the
/// kind the store actually persists. Mapping sources pick the store type
/// from `provider_kind`.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ValueConverter {
    pub name: String,
    pub model_kind: ValueKind,
    pub provider_kind: ValueKind,
}

impl ValueConverter {
    pub fn new(name: impl Into<String>, model_kind: ValueKind, provider_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            model_kind,
            provider_kind,
        }
    }

    #[must_use]
    pub fn bool_to_int() -> Self {
        Self::new("BoolToInt", ValueKind::Bool, ValueKind::Int)
    }

    #[must_use]
    pub fn guid_to_string() -> Self {
        Self::new("GuidToString", ValueKind::Guid, ValueKind::Text)
    }

    #[must_use]
    pub fn guid_to_bytes() -> Self {
        Self::new("GuidToBytes", ValueKind::Guid, ValueKind::Bytes)
    }

    #[must_use]
    pub fn date_time_to_ticks() -> Self {
        Self::new("DateTimeToTicks", ValueKind::DateTime, ValueKind::Long)
    }

    #[must_use]
    pub fn date_time_offset_to_string() -> Self {
        Self::new(
            "DateTimeOffsetToString",
            ValueKind::DateTimeOffset,
            ValueKind::Text,
        )
    }

    /// Whether this converter accepts values of `kind` on the model side.
    #[must_use]
    pub fn accepts(&self, kind: ValueKind) -> bool {
        self.model_kind == kind
    }
}

impl Display for ValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {})",
            self.name, self.model_kind, self.provider_kind
        )
    }
}

///
/// ValueComparer
///
/// Equality strategy used by change detection and key lookups.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ValueComparer {
    #[default]
    Default,
    /// Element-wise comparison for byte arrays.
    Bytes,
    CaseInsensitive,
    Custom(String),
}

impl ValueComparer {
    /// The comparer a mapping of `kind` uses when nothing is configured.
    #[must_use]
    pub const fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bytes => Self::Bytes,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Default => "Default",
            Self::Bytes => "Bytes",
            Self::CaseInsensitive => "CaseInsensitive",
            Self::Custom(name) => name,
        }
    }
}

impl Display for ValueComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
