//! Model lifecycle: the mutable [`ModelBuilder`] and the frozen [`Model`]
//! produced by finalization.

mod builder;
mod snapshot;


pub use builder::ModelBuilder;
pub use snapshot::{
    EntitySnapshot, ForeignKeySnapshot, FunctionSnapshot, IndexSnapshot, KeySnapshot,
    ModelSnapshot, ParameterSnapshot, PropertySnapshot,
};

use crate::metadata::Graph;
use derive_more::Deref;
use std::{
    fmt::{self, Display},
    sync::Arc,
};

///
/// ModelState
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ModelState {
    #[default]
    Mutable,
    Finalizing,
    Finalized,
    Invalid,
}

impl Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mutable => "mutable",
            Self::Finalizing => "finalizing",
            Self::Finalized => "finalized",
            Self::Invalid => "invalid",
        };
        write!(f, "{label}")
    }
}

///
/// Model
///
/// Finalized, read-only metadata graph. Cheap to clone and safe to share
/// across threads; every property and function parameter carries the type
/// mapping resolved during finalization.
///

#[derive(Clone, Debug, Deref)]
#[deref(forward)]
pub struct Model(Arc<Graph>);

impl Model {
    pub(crate) fn new(graph: Graph) -> Self {
        Self(Arc::new(graph))
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.0
    }

    /// Copy the graph into a new mutable builder for re-finalization.
    #[must_use]
    pub fn thaw(&self) -> ModelBuilder {
        ModelBuilder::from_graph(self.0.as_ref().clone())
    }

    #[must_use]
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::capture(&self.0)
    }

    /// Whether both handles share one finalized graph.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
