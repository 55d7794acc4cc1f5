//! Model finalization.
//!
//! Runs the ordered convention set over a working copy of the builder's
//! graph. Shaping passes repeat until a pass makes no structural change;
//! validation conventions then run once over the converged model. The
//! builder only sees the result when every convention succeeds.

mod trace;

#[cfg(test)]
mod tests;

pub use trace::{FinalizeTraceEvent, FinalizeTraceSink, RecordingTraceSink};

use crate::{
    config::FinalizeConfig,
    convention::{Convention, ConventionContext, ConventionSet, ConventionStage},
    error::{ErrorOrigin, InternalError},
    mapping::TypeMappingSource,
    model::{Model, ModelBuilder, ModelState},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

///
/// Finalizer
///
/// Owns the convention set, the provider's type mapping source and the
/// finalize settings. One finalizer can finalize any number of builders.
///

pub struct Finalizer {
    conventions: ConventionSet,
    mapping_source: Arc<dyn TypeMappingSource>,
    config: FinalizeConfig,
    trace: Option<Arc<dyn FinalizeTraceSink>>,
}

// Where and why a finalization attempt stopped.
struct Rejection {
    pass: u32,
    convention: Option<&'static str>,
    error: InternalError,
}

impl Finalizer {
    #[must_use]
    pub fn new(conventions: ConventionSet, mapping_source: Arc<dyn TypeMappingSource>) -> Self {
        Self {
            conventions,
            mapping_source,
            config: FinalizeConfig::default(),
            trace: None,
        }
    }

    /// Built-in conventions over the configured provider's catalog.
    pub fn from_config(config: FinalizeConfig) -> Result<Self, InternalError> {
        config.validate()?;
        let source = Arc::new(config.provider.mapping_source());

        Ok(Self::new(ConventionSet::defaults(), source).with_config(config))
    }

    #[must_use]
    pub fn with_config(mut self, config: FinalizeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn FinalizeTraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &FinalizeConfig {
        &self.config
    }

    #[must_use]
    pub const fn conventions(&self) -> &ConventionSet {
        &self.conventions
    }

    #[must_use]
    pub fn mapping_source(&self) -> &dyn TypeMappingSource {
        self.mapping_source.as_ref()
    }

    /// Finalize `builder` and return the frozen model.
    ///
    /// On success the builder holds the finalized graph and refuses further
    /// edits. On failure its graph is untouched and its state is
    /// [`ModelState::Invalid`]; only the first fatal diagnostic is returned.
    pub fn finalize(&self, builder: &mut ModelBuilder) -> Result<Model, InternalError> {
        if builder.state() == ModelState::Finalized {
            return Err(InternalError::invalid_operation(
                ErrorOrigin::Pipeline,
                "the model is already finalized",
            ));
        }

        // Argument problems surface before the builder changes state.
        self.config.validate()?;
        let (shaping, validating): (Vec<_>, Vec<_>) = self
            .conventions
            .ordered()?
            .into_iter()
            .partition(|c| c.stage() < ConventionStage::Validation);

        builder.set_state(ModelState::Finalizing);
        self.emit(FinalizeTraceEvent::Start {
            conventions: count(shaping.len() + validating.len()),
            entity_types: count(builder.entity_type_count()),
            functions: count(builder.function_count()),
        });
        debug!(
            provider = self.mapping_source.provider_name(),
            conventions = shaping.len() + validating.len(),
            max_passes = self.config.max_passes,
            "finalizing model"
        );

        let mut working = ModelBuilder::from_graph(builder.graph().clone());
        working.set_state(ModelState::Finalizing);

        match self.run(&mut working, &shaping, &validating) {
            Ok(passes) => {
                let graph = working.into_graph();
                builder.replace_graph(graph.clone());
                builder.set_state(ModelState::Finalized);

                self.emit(FinalizeTraceEvent::Finalized { passes });
                info!(
                    entity_types = graph.entity_type_count(),
                    properties = graph.property_count(),
                    functions = graph.function_count(),
                    passes,
                    "model finalized"
                );

                Ok(Model::new(graph))
            }
            Err(rejection) => {
                builder.set_state(ModelState::Invalid);

                self.emit(FinalizeTraceEvent::Rejected {
                    pass: rejection.pass,
                    convention: rejection.convention,
                    class: rejection.error.class,
                    origin: rejection.error.origin,
                });
                warn!(
                    pass = rejection.pass,
                    convention = rejection.convention.unwrap_or("-"),
                    error = %rejection.error.display_with_class(),
                    "model rejected"
                );

                Err(rejection.error)
            }
        }
    }

    fn run(
        &self,
        working: &mut ModelBuilder,
        shaping: &[&dyn Convention],
        validating: &[&dyn Convention],
    ) -> Result<u32, Rejection> {
        let max_passes = self.config.max_passes;
        let mut pass = 0;

        // Phase 1: shaping passes until nothing structural moves.
        loop {
            if pass == max_passes {
                return Err(Rejection {
                    pass,
                    convention: None,
                    error: InternalError::model_validation(format!(
                        "model did not converge after {max_passes} convention passes"
                    )),
                });
            }
            pass += 1;

            let mut structural_change = false;
            for convention in shaping {
                structural_change |= self.apply(working, *convention, pass)?;
            }

            self.emit(FinalizeTraceEvent::PassComplete {
                pass,
                structural_change,
            });
            if !structural_change {
                break;
            }
        }

        // Phase 2: validation over the converged model.
        for convention in validating {
            if self.apply(working, *convention, pass)? {
                return Err(Rejection {
                    pass,
                    convention: Some(convention.name()),
                    error: InternalError::pipeline_internal(format!(
                        "validation convention '{}' changed the model structure",
                        convention.name()
                    )),
                });
            }
        }

        Ok(pass)
    }

    // Apply one convention; reports whether it changed the structure or
    // asked for another pass.
    fn apply(
        &self,
        working: &mut ModelBuilder,
        convention: &dyn Convention,
        pass: u32,
    ) -> Result<bool, Rejection> {
        let before = working.structure_version();
        let mut context = ConventionContext::new(self.mapping_source.as_ref(), &self.config, pass);

        convention
            .apply(working, &mut context)
            .map_err(|error| Rejection {
                pass,
                convention: Some(convention.name()),
                error,
            })?;

        let structural_change = working.structure_version() != before || context.rerun_requested();
        self.emit(FinalizeTraceEvent::ConventionApplied {
            name: convention.name(),
            stage: convention.stage(),
            pass,
            structural_change,
        });
        debug!(
            convention = convention.name(),
            stage = %convention.stage(),
            pass,
            structural_change,
            "convention applied"
        );

        Ok(structural_change)
    }

    fn emit(&self, event: FinalizeTraceEvent) {
        if let Some(sink) = &self.trace {
            sink.on_event(event);
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
