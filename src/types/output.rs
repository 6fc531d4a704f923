//! Unit outputs: declared exports and their resolved values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::reference::AttrRef;

/// What an output exports: a literal, or a generated attribute of a
/// resource declared in the same unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OutputValue {
    Literal(String),
    Attr(AttrRef),
}

impl From<AttrRef> for OutputValue {
    fn from(attr: AttrRef) -> Self {
        OutputValue::Attr(attr)
    }
}

impl From<&str> for OutputValue {
    fn from(literal: &str) -> Self {
        OutputValue::Literal(literal.to_string())
    }
}

/// A declared export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Output {
    name: String,
    value: OutputValue,
}

impl Output {
    pub fn new(name: impl Into<String>, value: impl Into<OutputValue>) -> Self {
        Output {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &OutputValue {
        &self.value
    }
}

/// Resolved outputs after a unit evaluation: plain string values, ready to
/// be captured into the next unit's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OutputValues(BTreeMap<String, String>);

impl OutputValues {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
