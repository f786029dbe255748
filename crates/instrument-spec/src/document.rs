use serde_json::Value;
use thiserror::Error;

use crate::params::Parameters;
use crate::spec::SchemaNode;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse instrument schema: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("failed to parse value tree: {0}")]
    Value(#[source] serde_json::Error),
    #[error("failed to parse parameters: {0}")]
    Parameters(#[source] serde_json::Error),
}

pub fn load_schema(json: &str) -> Result<SchemaNode, LoadError> {
    serde_json::from_str(json).map_err(LoadError::Schema)
}

pub fn load_value(json: &str) -> Result<Value, LoadError> {
    serde_json::from_str(json).map_err(LoadError::Value)
}

/// Parses a flat JSON object of parameters. Blank input is an empty table.
pub fn load_parameters(json: &str) -> Result<Parameters, LoadError> {
    if json.trim().is_empty() {
        return Ok(Parameters::default());
    }
    serde_json::from_str(json).map_err(LoadError::Parameters)
}

/// JSON Schema describing the instrument schema wire format.
pub fn schema_document() -> Value {
    schemars::schema_for!(SchemaNode).to_value()
}
