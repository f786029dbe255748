use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

/// A named value supplied to an evaluation from outside the instrument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Parameter {
    /// Declared but without a value; reads as `null`.
    Undefined,
    Value(Value),
    Instant(DateTime<FixedOffset>),
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        Parameter::Value(value)
    }
}

impl From<DateTime<FixedOffset>> for Parameter {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Parameter::Instant(instant)
    }
}

/// Flat table of parameters keyed by dotted name.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    entries: BTreeMap<String, Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, parameter: impl Into<Parameter>) {
        self.entries.insert(name.into(), parameter.into());
    }

    pub fn with(mut self, name: impl Into<String>, parameter: impl Into<Parameter>) -> Self {
        self.insert(name, parameter);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.get(name)
    }
}

impl<K, P> FromIterator<(K, P)> for Parameters
where
    K: Into<String>,
    P: Into<Parameter>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, parameter)| (name.into(), parameter.into()))
                .collect(),
        }
    }
}
