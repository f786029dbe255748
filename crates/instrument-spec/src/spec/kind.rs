use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::schema::SchemaNode;

/// Declared type of an addressable instrument field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstrumentType {
    Float,
    Integer,
    Text,
    Enumeration,
    Boolean,
    Date,
    Time,
    DateTime,
    /// Multi-select field; the value is the list of selected tags.
    EnumerationSet { enumerations: BTreeSet<String> },
    /// Repeated group; `record` describes the fields of one entry.
    RecordList { record: Box<SchemaNode> },
}

impl InstrumentType {
    pub fn enumeration_set<I, S>(enumerations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InstrumentType::EnumerationSet {
            enumerations: enumerations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn record_list(record: SchemaNode) -> Self {
        InstrumentType::RecordList {
            record: Box::new(record),
        }
    }

    /// Label matching the `kind` tag of the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Float => "float",
            InstrumentType::Integer => "integer",
            InstrumentType::Text => "text",
            InstrumentType::Enumeration => "enumeration",
            InstrumentType::Boolean => "boolean",
            InstrumentType::Date => "date",
            InstrumentType::Time => "time",
            InstrumentType::DateTime => "date_time",
            InstrumentType::EnumerationSet { .. } => "enumeration_set",
            InstrumentType::RecordList { .. } => "record_list",
        }
    }
}
