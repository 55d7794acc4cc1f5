use crate::{
    config::FinalizeConfig,
    convention::{Convention, ConventionContext, ConventionSet, ConventionStage},
    error::{ErrorClass, ErrorOrigin, InternalError},
    finalize::{FinalizeTraceEvent, Finalizer, RecordingTraceSink},
    mapping::provider::ProviderKind,
    model::{ModelBuilder, ModelState},
};
use relmap_primitives::{ValueKind, ValueType};
use std::sync::Arc;

fn blog() -> ModelBuilder {
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    builder
        .add_property(blog, "Id", ValueType::required(ValueKind::Int))
        .expect("property");
    builder
        .add_property(blog, "Title", ValueType::optional(ValueKind::Text))
        .expect("property");

    builder
}

fn finalizer() -> Finalizer {
    Finalizer::from_config(FinalizeConfig::default().with_provider(ProviderKind::SqlServer))
        .expect("finalizer")
}

// Requests another pass forever.
struct Restless;

impl Convention for Restless {
    fn name(&self) -> &'static str {
        "restless"
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::Shape
    }

    fn apply(
        &self,
        _builder: &mut ModelBuilder,
        context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        context.request_rerun();
        Ok(())
    }
}

// Validation-stage convention that edits structure.
struct Meddler;

impl Convention for Meddler {
    fn name(&self) -> &'static str {
        "meddler"
    }

    fn stage(&self) -> ConventionStage {
        ConventionStage::Validation
    }

    fn apply(
        &self,
        builder: &mut ModelBuilder,
        _context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        builder.add_entity_type("Audit").map(|_| ())
    }
}

#[test]
fn successful_finalization_freezes_builder_and_model() {
    let mut builder = blog();
    let model = finalizer().finalize(&mut builder).expect("finalize");

    assert_eq!(builder.state(), ModelState::Finalized);
    assert!(model.properties().all(|p| p.find_type_mapping().is_some()));
    assert!(
        model
            .property(model.find_property(
                model.find_entity_type("Blog").expect("blog"),
                "Id"
            ).expect("id"))
            .expect("id")
            .is_primary_key()
    );

    let err = finalizer().finalize(&mut builder).expect_err("again");
    assert_eq!(err.class, ErrorClass::InvalidOperation);
    assert_eq!(err.origin, ErrorOrigin::Pipeline);
}

#[test]
fn trace_reports_passes_and_conventions_in_order() {
    let sink = Arc::new(RecordingTraceSink::new());
    let finalizer = finalizer().with_trace(sink.clone());
    let mut builder = blog();

    finalizer.finalize(&mut builder).expect("finalize");
    let events = sink.events();

    assert_eq!(
        events.first(),
        Some(&FinalizeTraceEvent::Start {
            conventions: 6,
            entity_types: 1,
            functions: 0,
        })
    );
    // key discovery changes structure in pass 1; pass 2 confirms
    assert!(events.contains(&FinalizeTraceEvent::ConventionApplied {
        name: "key_discovery",
        stage: ConventionStage::Shape,
        pass: 1,
        structural_change: true,
    }));
    assert!(events.contains(&FinalizeTraceEvent::PassComplete {
        pass: 2,
        structural_change: false,
    }));
    assert_eq!(
        events.last(),
        Some(&FinalizeTraceEvent::Finalized { passes: 2 })
    );

    let validation_runs = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                FinalizeTraceEvent::ConventionApplied {
                    stage: ConventionStage::Validation,
                    ..
                }
            )
        })
        .count();
    assert_eq!(validation_runs, 1);
}

#[test]
fn rejection_leaves_the_builder_graph_untouched() {
    let mut builder = ModelBuilder::new();
    let audit = builder.add_entity_type("Audit").expect("entity");
    builder
        .add_property(audit, "Id", ValueType::optional(ValueKind::Int))
        .expect("property");
    let id = builder.find_property(audit, "Id").expect("id");
    builder.set_nullable(id, true).expect("explicit");
    let version = builder.structure_version();

    let err = finalizer()
        .finalize(&mut builder)
        .expect_err("nullable key");

    assert_eq!(err.class, ErrorClass::ModelValidation);
    assert_eq!(builder.state(), ModelState::Invalid);
    assert_eq!(builder.structure_version(), version);
    assert!(
        builder
            .entity_type(audit)
            .expect("audit")
            .primary_key()
            .is_none()
    );

    // a successful edit makes the builder mutable again
    builder.set_nullable(id, false).expect("edit");
    assert_eq!(builder.state(), ModelState::Mutable);
    finalizer().finalize(&mut builder).expect("finalize");
}

#[test]
fn endless_reruns_fail_to_converge() {
    let mut conventions = ConventionSet::defaults();
    conventions.register(Restless).expect("register");
    let source = Arc::new(ProviderKind::Sqlite.mapping_source());
    let finalizer = Finalizer::new(conventions, source)
        .with_config(FinalizeConfig::default().with_max_passes(3));
    let sink = Arc::new(RecordingTraceSink::new());
    let finalizer = finalizer.with_trace(sink.clone());

    let err = finalizer.finalize(&mut blog()).expect_err("no convergence");

    assert_eq!(err.class, ErrorClass::ModelValidation);
    assert_eq!(
        err.message,
        "model did not converge after 3 convention passes"
    );
    assert!(matches!(
        sink.events().last(),
        Some(FinalizeTraceEvent::Rejected {
            pass: 3,
            convention: None,
            ..
        })
    ));
}

#[test]
fn validation_conventions_may_not_change_structure() {
    let mut conventions = ConventionSet::new();
    conventions.register(Meddler).expect("register");
    let finalizer = Finalizer::new(conventions, Arc::new(ProviderKind::Sqlite.mapping_source()));

    let mut builder = blog();
    let err = finalizer.finalize(&mut builder).expect_err("meddler");

    assert_eq!(err.class, ErrorClass::Internal);
    assert_eq!(builder.entity_type_count(), 1);
}

#[test]
fn invalid_settings_fail_before_any_state_change() {
    let finalizer = finalizer().with_config(FinalizeConfig::default().with_max_passes(0));
    let mut builder = blog();

    let err = finalizer.finalize(&mut builder).expect_err("zero passes");

    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert_eq!(err.origin, ErrorOrigin::Config);
    assert_eq!(builder.state(), ModelState::Mutable);
}
