use crate::convention::{
    Convention, ConventionSetError, DbFunctionTypeMappingConvention, ForeignKeyIndexConvention,
    KeyDiscoveryConvention, KeyNullabilityConvention, ModelValidationConvention,
    PropertyTypeMappingConvention,
};
use std::collections::BTreeSet;

///
/// ConventionSet
///
/// Explicitly registered conventions. The run order is a stable
/// topological sort: stage first, then declared `runs_after` edges, then
/// registration order.
///

#[derive(Default)]
pub struct ConventionSet {
    conventions: Vec<Box<dyn Convention>>,
}

impl ConventionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in convention. Each one consults the finalize config
    /// for its own switch.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            conventions: vec![
                Box::new(KeyDiscoveryConvention),
                Box::new(KeyNullabilityConvention),
                Box::new(ForeignKeyIndexConvention),
                Box::new(PropertyTypeMappingConvention),
                Box::new(DbFunctionTypeMappingConvention),
                Box::new(ModelValidationConvention),
            ],
        }
    }

    pub fn register(
        &mut self,
        convention: impl Convention + 'static,
    ) -> Result<&mut Self, ConventionSetError> {
        let name = convention.name();
        if self.contains(name) {
            return Err(ConventionSetError::DuplicateName(name));
        }

        self.conventions.push(Box::new(convention));

        Ok(self)
    }

    /// Drop a convention by name. Returns whether it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.conventions.len();
        self.conventions.retain(|c| c.name() != name);

        self.conventions.len() != before
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.conventions.iter().any(|c| c.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }

    /// Resolve the run order.
    pub fn ordered(&self) -> Result<Vec<&dyn Convention>, ConventionSetError> {
        let count = self.conventions.len();
        let position = |name: &str| self.conventions.iter().position(|c| c.name() == name);

        // Phase 1: resolve dependency edges and reject stage inversions.
        let mut dependents = vec![Vec::new(); count];
        let mut pending = vec![0_usize; count];
        for (i, convention) in self.conventions.iter().enumerate() {
            for &dependency in convention.runs_after() {
                let Some(d) = position(dependency) else {
                    return Err(ConventionSetError::UnknownDependency {
                        convention: convention.name(),
                        dependency,
                    });
                };

                let dependency_stage = self.conventions[d].stage();
                if dependency_stage > convention.stage() {
                    return Err(ConventionSetError::StageInversion {
                        convention: convention.name(),
                        stage: convention.stage(),
                        dependency,
                        dependency_stage,
                    });
                }

                dependents[d].push(i);
                pending[i] += 1;
            }
        }

        // Phase 2: Kahn's algorithm, always taking the lowest (stage, index).
        let mut ready: BTreeSet<_> = (0..count)
            .filter(|i| pending[*i] == 0)
            .map(|i| (self.conventions[i].stage(), i))
            .collect();
        let mut order = Vec::with_capacity(count);

        while let Some((_, i)) = ready.pop_first() {
            order.push(self.conventions[i].as_ref());
            for &next in &dependents[i] {
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.insert((self.conventions[next].stage(), next));
                }
            }
        }

        if order.len() < count {
            let stuck = (0..count)
                .filter(|i| pending[*i] > 0)
                .map(|i| format!("'{}'", self.conventions[i].name()))
                .collect::<Vec<_>>()
                .join(", ");

            return Err(ConventionSetError::Cycle(stuck));
        }

        Ok(order)
    }
}
