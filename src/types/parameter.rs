//! Cross-unit parameters: values captured from one unit's outputs and
//! supplied to another unit at its evaluation boundary.
//!
//! A `ParameterMap` is a snapshot, not a live binding. If the producing
//! unit's resources are replaced after capture, nothing here can tell;
//! re-capture outputs before every consuming deployment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProvisionError;

/// Named string values imported into a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, String>);

impl ParameterMap {
    pub fn new() -> Self {
        ParameterMap::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Fetch a required parameter, failing fast with the parameter's name.
    /// A present-but-blank value is as much a configuration error as an
    /// absent one.
    pub fn require(&self, name: &str) -> Result<&str, ProvisionError> {
        match self.0.get(name) {
            None => Err(ProvisionError::MissingParameter(name.to_string())),
            Some(value) if value.trim().is_empty() => {
                Err(ProvisionError::EmptyParameter(name.to_string()))
            }
            Some(value) => Ok(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ParameterMap(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_names_the_missing_parameter() {
        let params = ParameterMap::new().with("REPO_NAME", "agent-repo");
        let err = params.require("REPO_URI").unwrap_err();
        assert_eq!(err, ProvisionError::MissingParameter("REPO_URI".to_string()));
    }

    #[test]
    fn test_require_rejects_blank_values() {
        let params = ParameterMap::new().with("REPO_NAME", "  ");
        let err = params.require("REPO_NAME").unwrap_err();
        assert_eq!(err, ProvisionError::EmptyParameter("REPO_NAME".to_string()));
    }

    #[test]
    fn test_require_returns_the_value() {
        let params = ParameterMap::new().with("REPO_NAME", "agent-repo");
        assert_eq!(params.require("REPO_NAME").unwrap(), "agent-repo");
    }

    #[test]
    fn test_transparent_serialization() {
        let params = ParameterMap::new().with("A", "1").with("B", "2");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({ "A": "1", "B": "2" }));
    }
}
