//! Finalization tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! finalization semantics.

use crate::{
    convention::ConventionStage,
    error::{ErrorClass, ErrorOrigin},
};
use std::sync::{Mutex, PoisonError};

///
/// FinalizeTraceSink
///

pub trait FinalizeTraceSink: Send + Sync {
    fn on_event(&self, event: FinalizeTraceEvent);
}

///
/// FinalizeTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FinalizeTraceEvent {
    Start {
        conventions: u32,
        entity_types: u32,
        functions: u32,
    },
    ConventionApplied {
        name: &'static str,
        stage: ConventionStage,
        pass: u32,
        structural_change: bool,
    },
    PassComplete {
        pass: u32,
        structural_change: bool,
    },
    Finalized {
        passes: u32,
    },
    Rejected {
        pass: u32,
        convention: Option<&'static str>,
        class: ErrorClass,
        origin: ErrorOrigin,
    },
}

///
/// RecordingTraceSink
///
/// Keeps every event in arrival order.
///

#[derive(Debug, Default)]
pub struct RecordingTraceSink {
    events: Mutex<Vec<FinalizeTraceEvent>>,
}

impl RecordingTraceSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<FinalizeTraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl FinalizeTraceSink for RecordingTraceSink {
    fn on_event(&self, event: FinalizeTraceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
