//! Built-in provider catalogs.
//!
//! Each provider is a table of store types plus per-kind defaults fed into
//! a [`CatalogTypeMappingSource`]. Spatial store types are part of every
//! catalog.

pub mod postgres;
pub mod sql_server;
pub mod sqlite;

use crate::mapping::CatalogTypeMappingSource;
use serde::Deserialize;
use std::fmt::{self, Display};

///
/// ProviderKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Sqlite,
    Postgres,
    SqlServer,
}

impl ProviderKind {
    /// Build a fresh mapping source for this provider.
    #[must_use]
    pub fn mapping_source(self) -> CatalogTypeMappingSource {
        match self {
            Self::Sqlite => sqlite::mapping_source(),
            Self::Postgres => postgres::mapping_source(),
            Self::SqlServer => sql_server::mapping_source(),
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::SqlServer => "sql_server",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TypeMappingSource;
    use relmap_primitives::ALL_VALUE_KINDS;

    const PROVIDERS: [ProviderKind; 3] = [
        ProviderKind::Sqlite,
        ProviderKind::Postgres,
        ProviderKind::SqlServer,
    ];

    #[test]
    fn every_value_kind_has_a_default_mapping() {
        for provider in PROVIDERS {
            let source = provider.mapping_source();
            for kind in ALL_VALUE_KINDS {
                let mapping = source.find_mapping_by_kind(kind);
                assert!(mapping.is_some(), "{provider}: no mapping for {kind}");
                assert_eq!(mapping.unwrap().kind, kind);
            }
        }
    }

    #[test]
    fn every_rule_targets_a_catalog_entry() {
        for provider in PROVIDERS {
            let source = provider.mapping_source();
            for rule in source.rules() {
                assert!(
                    source.entry(rule.store_type).is_some(),
                    "{provider}: rule for {} targets unknown '{}'",
                    rule.kind,
                    rule.store_type
                );
                if let Some(ansi) = rule.ansi_store_type {
                    assert!(source.entry(ansi).is_some(), "{provider}: '{ansi}'");
                }
            }
        }
    }

    #[test]
    fn every_entry_resolves_by_its_own_name() {
        for provider in PROVIDERS {
            let source = provider.mapping_source();
            for entry in source.entries() {
                let mapping = source.find_mapping_by_store_type(entry.name);
                assert!(mapping.is_some(), "{provider}: '{}'", entry.name);
            }
        }
    }

    #[test]
    fn provider_names_match_display() {
        for provider in PROVIDERS {
            assert_eq!(
                provider.mapping_source().provider_name(),
                provider.to_string()
            );
        }
    }
}
