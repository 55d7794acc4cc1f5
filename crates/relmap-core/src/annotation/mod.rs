//! Open annotation store attached to every metadata node.
//!
//! Core facets (type mapping, max length, comparers, ...) are typed fields on
//! the nodes. This map only carries provider-specific and extension values,
//! so reads never need a runtime cast beyond the [`FromAnnotation`] match.

pub mod keys;


use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// AnnotationError
///

#[derive(Debug, ThisError)]
pub enum AnnotationError {
    #[error("annotation key is empty")]
    EmptyKey,

    #[error("annotation key '{0}' is reserved for core metadata")]
    ReservedKey(String),
}

///
/// AnnotationValue
///
/// Untyped annotation slot. `Null` is a stored value and is distinct from
/// an absent key.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<Self>),
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for AnnotationValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for AnnotationValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

///
/// FromAnnotation
///
/// Typed read over an untyped slot. Returns `None` when the stored value
/// has a different shape than the caller expects.
///

pub trait FromAnnotation: Sized {
    fn from_annotation(value: &AnnotationValue) -> Option<Self>;
}

impl FromAnnotation for bool {
    fn from_annotation(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAnnotation for i64 {
    fn from_annotation(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAnnotation for u32 {
    fn from_annotation(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Int(v) => Self::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl FromAnnotation for String {
    fn from_annotation(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl<T: FromAnnotation> FromAnnotation for Vec<T> {
    fn from_annotation(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::List(items) => items.iter().map(T::from_annotation).collect(),
            _ => None,
        }
    }
}

///
/// Annotations
///
/// String-keyed annotation map. Iteration is ordered by key.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Annotations {
    entries: BTreeMap<String, AnnotationValue>,
}

impl Annotations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }

    /// Typed read; absent keys and shape mismatches both yield `None`.
    #[must_use]
    pub fn get_as<T: FromAnnotation>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(T::from_annotation)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a value under the trimmed key, returning the previous one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AnnotationValue>,
    ) -> Result<Option<AnnotationValue>, AnnotationError> {
        let key = validate_key(key.into())?;

        Ok(self.entries.insert(key, value.into()))
    }

    pub fn remove(&mut self, key: &str) -> Option<AnnotationValue> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_key(key: String) -> Result<String, AnnotationError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(AnnotationError::EmptyKey);
    }
    if keys::is_core_key(trimmed) {
        return Err(AnnotationError::ReservedKey(trimmed.to_string()));
    }
    if trimmed.len() == key.len() {
        return Ok(key);
    }

    Ok(trimmed.to_string())
}
