use crate::mapping::{
    MappingRequest, TypeMapping, TypeMappingSource, ValueComparer, ValueConverter,
    store_type::{StoreTypeFacet, StoreTypeName},
};
use relmap_primitives::ValueKind;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::trace;

/// Largest fractional-seconds precision a temporal store type accepts.
pub const MAX_FRACTIONAL_SECONDS_PRECISION: u8 = 7;

///
/// StoreTypeSizing
///
/// Which facet arguments a store type accepts.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreTypeSizing {
    Unsized,
    /// `name(n)` or `name(max)`.
    Length,
    /// `name(p,s)`; defaults apply when mapping by kind.
    Precision {
        default_precision: u8,
        default_scale: u8,
    },
    /// `name(p)` with an optional fractional-seconds precision.
    FractionalSeconds,
}

///
/// StoreTypeEntry
///
/// One store type a provider supports, with its natural value kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StoreTypeEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: ValueKind,
    pub unicode: bool,
    pub fixed_length: bool,
    pub sizing: StoreTypeSizing,
}

impl StoreTypeEntry {
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            unicode: false,
            fixed_length: false,
            sizing: StoreTypeSizing::Unsized,
        }
    }

    #[must_use]
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub const fn unicode(mut self) -> Self {
        self.unicode = true;
        self
    }

    #[must_use]
    pub const fn fixed_length(mut self) -> Self {
        self.fixed_length = true;
        self
    }

    #[must_use]
    pub const fn sizing(mut self, sizing: StoreTypeSizing) -> Self {
        self.sizing = sizing;
        self
    }

    fn matches(&self, base: &str) -> bool {
        self.name.eq_ignore_ascii_case(base)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(base))
    }
}

///
/// KindRule
///
/// Default store type for a value kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KindRule {
    pub kind: ValueKind,
    pub store_type: &'static str,
    /// Store type used when the unicode facet is explicitly off.
    pub ansi_store_type: Option<&'static str>,
    /// Render `(max)` when no length is configured.
    pub unbounded: bool,
}

impl KindRule {
    #[must_use]
    pub const fn new(kind: ValueKind, store_type: &'static str) -> Self {
        Self {
            kind,
            store_type,
            ansi_store_type: None,
            unbounded: false,
        }
    }

    #[must_use]
    pub const fn ansi(mut self, store_type: &'static str) -> Self {
        self.ansi_store_type = Some(store_type);
        self
    }

    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.unbounded = true;
        self
    }
}

///
/// CatalogTypeMappingSource
///
/// Table-driven mapping source. Every resolved mapping is cached by its
/// normalized request so repeated lookups return the same `Arc`.
///

#[derive(Debug)]
pub struct CatalogTypeMappingSource {
    provider: &'static str,
    entries: Vec<StoreTypeEntry>,
    rules: BTreeMap<ValueKind, KindRule>,
    cache: Mutex<HashMap<String, Arc<TypeMapping>>>,
}

impl CatalogTypeMappingSource {
    pub fn new(
        provider: &'static str,
        entries: impl IntoIterator<Item = StoreTypeEntry>,
        rules: impl IntoIterator<Item = KindRule>,
    ) -> Self {
        Self {
            provider,
            entries: entries.into_iter().collect(),
            rules: rules.into_iter().map(|rule| (rule.kind, rule)).collect(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a catalog entry by base name or alias.
    #[must_use]
    pub fn entry(&self, base: &str) -> Option<&StoreTypeEntry> {
        self.entries.iter().find(|entry| entry.matches(base))
    }

    #[must_use]
    pub fn rule(&self, kind: ValueKind) -> Option<&KindRule> {
        self.rules.get(&kind)
    }

    pub fn entries(&self) -> impl Iterator<Item = &StoreTypeEntry> {
        self.entries.iter()
    }

    pub fn rules(&self) -> impl Iterator<Item = &KindRule> {
        self.rules.values()
    }

    /// Number of distinct mappings handed out so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // Check a parsed facet against what the entry accepts, normalizing
    // single-argument precision types.
    fn accept_facet(entry: &StoreTypeEntry, facet: StoreTypeFacet) -> Option<StoreTypeFacet> {
        match (entry.sizing, facet) {
            (_, StoreTypeFacet::None) => Some(StoreTypeFacet::None),
            (StoreTypeSizing::Length, StoreTypeFacet::Max | StoreTypeFacet::Size(_)) => Some(facet),
            (StoreTypeSizing::Precision { .. }, StoreTypeFacet::Size(precision)) => {
                Some(StoreTypeFacet::Precision {
                    precision: u8::try_from(precision).ok()?,
                    scale: None,
                })
            }
            (StoreTypeSizing::Precision { .. }, StoreTypeFacet::Precision { .. }) => Some(facet),
            (StoreTypeSizing::FractionalSeconds, StoreTypeFacet::Size(precision))
                if precision <= u32::from(MAX_FRACTIONAL_SECONDS_PRECISION) =>
            {
                Some(facet)
            }
            _ => None,
        }
    }

    // Pick the facet a kind-based request renders with. A requested
    // precision the store type cannot hold leaves the mapping absent.
    fn facet_for_request(
        entry: &StoreTypeEntry,
        rule: &KindRule,
        request: &MappingRequest<'_>,
    ) -> Option<StoreTypeFacet> {
        let facet = match entry.sizing {
            StoreTypeSizing::Unsized => StoreTypeFacet::None,
            StoreTypeSizing::Length => match request.max_length {
                Some(length) => StoreTypeFacet::Size(length),
                None if rule.unbounded => StoreTypeFacet::Max,
                None => StoreTypeFacet::None,
            },
            StoreTypeSizing::Precision {
                default_precision,
                default_scale,
            } => {
                let precision = request.precision.unwrap_or(default_precision);
                let scale = request.scale.unwrap_or(default_scale).min(precision);

                StoreTypeFacet::Precision {
                    precision,
                    scale: Some(scale),
                }
            }
            StoreTypeSizing::FractionalSeconds => match request.precision {
                Some(p) if p > MAX_FRACTIONAL_SECONDS_PRECISION => return None,
                Some(p) => StoreTypeFacet::Size(u32::from(p)),
                None => StoreTypeFacet::None,
            },
        };

        Some(facet)
    }

    fn materialize(
        &self,
        entry: &StoreTypeEntry,
        facet: StoreTypeFacet,
        kind: ValueKind,
        converter: Option<&ValueConverter>,
    ) -> Arc<TypeMapping> {
        let parsed = StoreTypeName {
            base: entry.name.to_string(),
            facet,
        };
        let store_type = parsed.render_with_base(entry.name);
        let cache_key = match converter {
            Some(converter) => format!("{store_type}|{kind}|{converter}"),
            None => format!("{store_type}|{kind}"),
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mapping) = cache.get(&cache_key) {
            return Arc::clone(mapping);
        }

        let (size, precision, scale) = match facet {
            StoreTypeFacet::None | StoreTypeFacet::Max => (None, None, None),
            StoreTypeFacet::Size(size) if entry.sizing == StoreTypeSizing::FractionalSeconds => {
                (None, u8::try_from(size).ok(), None)
            }
            StoreTypeFacet::Size(size) => (Some(size), None, None),
            StoreTypeFacet::Precision { precision, scale } => (None, Some(precision), scale),
        };

        let mapping = Arc::new(TypeMapping {
            store_type,
            store_type_base: entry.name.to_string(),
            kind,
            size,
            precision,
            scale,
            unicode: entry.unicode,
            fixed_length: entry.fixed_length,
            converter: converter.cloned(),
            comparer: ValueComparer::for_kind(kind),
        });

        trace!(
            provider = self.provider,
            store_type = %mapping.store_type,
            kind = %kind,
            "type mapping materialized"
        );
        cache.insert(cache_key, Arc::clone(&mapping));

        mapping
    }
}

impl TypeMappingSource for CatalogTypeMappingSource {
    fn provider_name(&self) -> &str {
        self.provider
    }

    fn find_mapping_by_store_type(&self, store_type: &str) -> Option<Arc<TypeMapping>> {
        let parsed = StoreTypeName::parse(store_type)?;
        let entry = self.entry(&parsed.base)?;
        let facet = Self::accept_facet(entry, parsed.facet)?;

        Some(self.materialize(entry, facet, entry.kind, None))
    }

    fn find_mapping_by_kind(&self, kind: ValueKind) -> Option<Arc<TypeMapping>> {
        self.find_mapping(&MappingRequest::for_kind(kind))
    }

    fn find_mapping(&self, request: &MappingRequest<'_>) -> Option<Arc<TypeMapping>> {
        if let Some(store_type) = request.explicit_store_type() {
            let parsed = StoreTypeName::parse(store_type)?;
            let entry = self.entry(&parsed.base)?;
            let facet = Self::accept_facet(entry, parsed.facet)?;
            let kind = request
                .converter
                .map_or(entry.kind, |converter| converter.model_kind);

            return Some(self.materialize(entry, facet, kind, request.converter));
        }

        let model_kind = request.kind?;
        let store_kind = request.store_kind()?;
        let rule = self.rule(store_kind)?;
        let store_name = match (request.unicode, rule.ansi_store_type) {
            (Some(false), Some(ansi)) => ansi,
            _ => rule.store_type,
        };
        let entry = self.entry(store_name)?;
        let facet = Self::facet_for_request(entry, rule, request)?;

        Some(self.materialize(entry, facet, model_kind, request.converter))
    }
}
