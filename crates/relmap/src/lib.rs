//! ## Crate layout
//! - `core`: metadata graph, type mapping sources, conventions and the
//!   finalization pipeline.
//! - `primitives`: value kinds and their capability metadata.
//! - `error`: public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module carries what model-building code needs day to day.

pub use relmap_core as core;
pub use relmap_primitives as primitives;

pub mod error;

pub use error::Error;

use relmap_core::{
    config::FinalizeConfig,
    finalize::Finalizer,
    model::{Model, ModelBuilder},
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Finalize `builder` with the built-in conventions for the provider named
/// in `config`.
pub fn finalize(builder: &mut ModelBuilder, config: FinalizeConfig) -> Result<Model, Error> {
    let finalizer = Finalizer::from_config(config)?;

    Ok(finalizer.finalize(builder)?)
}

/// Like [`finalize`], with settings read from a TOML document.
pub fn finalize_with_toml(builder: &mut ModelBuilder, settings: &str) -> Result<Model, Error> {
    let config = FinalizeConfig::from_toml_str(settings)?;

    finalize(builder, config)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        core::{config::FinalizeConfig, mapping::provider::ProviderKind, prelude::*},
        error::{ErrorKind, ErrorOrigin},
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn tagged() -> ModelBuilder {
        let mut builder = ModelBuilder::new();
        let tag = builder.add_entity_type("Tag").expect("entity");
        builder
            .add_property(tag, "TagId", ValueType::required(ValueKind::Guid))
            .expect("property");
        builder
            .add_property(tag, "Label", ValueType::required(ValueKind::Text))
            .expect("property");

        builder
    }

    #[test]
    fn finalize_discovers_keys_and_maps_properties() {
        let mut builder = tagged();
        let model = finalize(
            &mut builder,
            FinalizeConfig::default().with_provider(ProviderKind::Postgres),
        )
        .expect("finalize");

        let tag = model.find_entity_type("Tag").expect("tag");
        let id = model
            .property(model.find_property(tag, "TagId").expect("id"))
            .expect("id");

        assert!(id.is_primary_key());
        assert_eq!(
            id.find_type_mapping().map(|m| m.store_type.as_str()),
            Some("uuid")
        );
        assert_eq!(builder.state(), ModelState::Finalized);
    }

    #[test]
    fn settings_errors_map_to_invalid_argument() {
        let err = finalize_with_toml(&mut tagged(), "max_passes = 0").expect_err("zero passes");

        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.origin, ErrorOrigin::Config);
    }

    #[test]
    fn unknown_settings_are_rejected() {
        let err = finalize_with_toml(&mut tagged(), "passes = 3").expect_err("unknown key");

        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn rejected_models_report_model_validation() {
        let mut builder = ModelBuilder::new();
        let note = builder.add_entity_type("Note").expect("entity");
        builder
            .add_property(note, "Body", ValueType::required(ValueKind::Text))
            .expect("property");

        let err = finalize(&mut builder, FinalizeConfig::default()).expect_err("no key");

        assert!(err.is_model_validation());
        assert_eq!(err.message, "entity type 'Note' requires a primary key");
        assert_eq!(builder.state(), ModelState::Invalid);
    }
}
