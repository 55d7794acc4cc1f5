use crate::{annotation::Annotations, mapping::TypeMapping};
use relmap_primitives::ValueKind;
use std::sync::Arc;

///
/// DbFunction
///
/// Named mapping to a store-side function. The return value and each
/// parameter carry an optional explicit store type and, once finalized,
/// a resolved type mapping.
///

#[derive(Clone, Debug)]
pub struct DbFunction {
    pub(crate) name: String,
    pub(crate) schema: Option<String>,
    pub(crate) return_kind: ValueKind,
    pub(crate) store_type: Option<String>,
    pub(crate) parameters: Vec<FunctionParameter>,
    pub(crate) type_mapping: Option<Arc<TypeMapping>>,
    pub(crate) annotations: Annotations,
}

impl DbFunction {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    #[must_use]
    pub const fn return_kind(&self) -> ValueKind {
        self.return_kind
    }

    /// Explicit store return type, if configured.
    #[must_use]
    pub fn store_type(&self) -> Option<&str> {
        self.store_type.as_deref()
    }

    #[must_use]
    pub fn parameters(&self) -> &[FunctionParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&FunctionParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn type_mapping(&self) -> Option<&Arc<TypeMapping>> {
        self.type_mapping.as_ref()
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

///
/// FunctionParameter
///

#[derive(Clone, Debug)]
pub struct FunctionParameter {
    pub(crate) name: String,
    pub(crate) kind: ValueKind,
    pub(crate) store_type: Option<String>,
    pub(crate) type_mapping: Option<Arc<TypeMapping>>,
}

impl FunctionParameter {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub fn store_type(&self) -> Option<&str> {
        self.store_type.as_deref()
    }

    #[must_use]
    pub fn type_mapping(&self) -> Option<&Arc<TypeMapping>> {
        self.type_mapping.as_ref()
    }
}
