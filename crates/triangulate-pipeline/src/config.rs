//! Generic key/value configuration shared by all triangulation implementations.
//!
//! A [`ConfigBlock`] is what a plugin host sees: string keys mapped to JSON
//! values, each optionally described. Implementations translate it to and from
//! their typed configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigBlock {
    values: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    descriptions: BTreeMap<String, String>,
}

impl ConfigBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from a JSON object; every entry becomes a key.
    pub fn from_json(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(entries) => Ok(Self {
                values: entries.into_iter().collect(),
                descriptions: BTreeMap::new(),
            }),
            other => Err(ConfigError::Rejected(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// All values as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone().into_iter().collect::<Map<_, _>>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set_raw(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn set_value<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|e| ConfigError::InvalidValue {
            key: key.clone(),
            message: e.to_string(),
        })?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Typed read of `key`; `Ok(None)` when the key is absent.
    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.values
            .get(key)
            .map(|v| {
                serde_json::from_value(v.clone()).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_owned(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn description(&self, key: &str) -> Option<&str> {
        self.descriptions.get(key).map(String::as_str)
    }

    pub fn set_description(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.descriptions.insert(key.into(), text.into());
    }

    /// Overlay the values (and descriptions) of `other`; its entries win.
    pub fn merge(&mut self, other: &ConfigBlock) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
        for (k, d) in &other.descriptions {
            self.descriptions.insert(k.clone(), d.clone());
        }
    }
}

/// The get/set/check configuration triad of a pluggable algorithm.
pub trait Configurable {
    /// Current parameters, including descriptions where available.
    fn get_configuration(&self) -> ConfigBlock;

    /// Apply the entries of `config`. Keys not present keep their value.
    fn set_configuration(&mut self, config: &ConfigBlock) -> Result<(), ConfigError>;

    /// Whether `config` would be accepted by [`set_configuration`](Self::set_configuration).
    fn check_configuration(&self, config: &ConfigBlock) -> bool;
}
