use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace_span};

use crate::identifier::Identifier;
use crate::params::Parameters;
use crate::spec::schema::VALUE_KEY;
use crate::spec::{InstrumentType, NodeContext, SchemaNode};
use crate::typed::{TypedValue, lift_declared, lift_list, lift_parameter};

static NULL: Value = Value::Null;

/// Whether a record list addressed by a sub-field expands across its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordListMode {
    /// `list.field` gathers `field` from every record into a list.
    #[default]
    Expand,
    /// Record lists are plain nodes; their sub-fields are not addressable.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    pub record_lists: RecordListMode,
}

/// Resolves identifiers against a schema, a value tree and a parameter table.
///
/// Holds configuration only. Every call reads its inputs and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// Field resolution first, then the parameter table. `None` means the
    /// identifier is unknown; a known but empty field is `Some(..)` with a
    /// `null` payload.
    pub fn resolve(
        &self,
        identifier: impl Into<Identifier>,
        schema: &SchemaNode,
        value: &Value,
        parameters: &Parameters,
    ) -> Option<TypedValue> {
        let identifier = identifier.into();
        let _span = trace_span!("resolve", identifier = %identifier).entered();
        if identifier.is_empty() {
            debug!("empty identifier");
            return None;
        }
        self.resolve_field(&identifier, schema, value)
            .or_else(|| resolve_parameter(&identifier, parameters))
    }

    pub fn resolve_field(
        &self,
        identifier: impl Into<Identifier>,
        schema: &SchemaNode,
        value: &Value,
    ) -> Option<TypedValue> {
        let identifier = identifier.into();
        descend(
            identifier.segments(),
            schema,
            value,
            self.options.record_lists,
        )
    }
}

/// Resolves with default options.
pub fn resolve(
    identifier: impl Into<Identifier>,
    schema: &SchemaNode,
    value: &Value,
    parameters: &Parameters,
) -> Option<TypedValue> {
    Resolver::default().resolve(identifier, schema, value, parameters)
}

pub fn resolve_field(
    identifier: impl Into<Identifier>,
    schema: &SchemaNode,
    value: &Value,
) -> Option<TypedValue> {
    Resolver::default().resolve_field(identifier, schema, value)
}

/// Looks the dotted name up in `parameters` and lifts it natively.
pub fn resolve_parameter(
    identifier: impl Into<Identifier>,
    parameters: &Parameters,
) -> Option<TypedValue> {
    let name = identifier.into().joined();
    match parameters.get(&name) {
        Some(parameter) => Some(lift_parameter(parameter)),
        None => {
            debug!(%name, "no field or parameter");
            None
        }
    }
}

/// Borrowed inputs of one expression evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    schema: &'a SchemaNode,
    value: &'a Value,
    parameters: &'a Parameters,
    resolver: Resolver,
}

impl<'a> Evaluation<'a> {
    pub fn new(schema: &'a SchemaNode, value: &'a Value, parameters: &'a Parameters) -> Self {
        Self {
            schema,
            value,
            parameters,
            resolver: Resolver::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.resolver = Resolver::new(options);
        self
    }

    pub fn lookup(&self, identifier: impl Into<Identifier>) -> Option<TypedValue> {
        self.resolver
            .resolve(identifier, self.schema, self.value, self.parameters)
    }
}

fn descend(
    segments: &[String],
    schema: &SchemaNode,
    value: &Value,
    mode: RecordListMode,
) -> Option<TypedValue> {
    if segments.is_empty() {
        return None;
    }

    let mut node = schema;
    let mut current = value;

    for segment in segments {
        match node.kind() {
            // Whatever follows the tag is ignored.
            Some(InstrumentType::EnumerationSet { enumerations }) => {
                return select_tag(enumerations, current, segment);
            }
            Some(InstrumentType::RecordList { record }) if mode == RecordListMode::Expand => {
                return gather_records(record, current, segment);
            }
            _ => {}
        }

        let Some(child) = node.child(segment) else {
            debug!(%segment, "no schema node for segment");
            return None;
        };
        node = child;
        current = member(current, segment);

        if node.context() == NodeContext::Field {
            let Some(inner) = node.child(VALUE_KEY) else {
                debug!(%segment, "field node without a value child");
                return None;
            };
            node = inner;
            current = member(current, VALUE_KEY);
        }
    }

    match node.kind() {
        None => {
            debug!("identifier names a structural node");
            None
        }
        Some(InstrumentType::RecordList { .. }) => {
            debug!("record list addressed without a sub-field");
            None
        }
        Some(kind) => Some(lift_declared(kind, current)),
    }
}

fn select_tag(enumerations: &BTreeSet<String>, selected: &Value, tag: &str) -> Option<TypedValue> {
    if !enumerations.contains(tag) {
        debug!(%tag, "not a declared enumeration");
        return None;
    }
    debug_assert!(
        selected.is_null() || selected.is_array(),
        "enumeration set value must be a list, got {selected}"
    );
    let chosen = selected
        .as_array()
        .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(tag)));
    Some(TypedValue::Boolean(Value::Bool(chosen)))
}

fn gather_records(record: &SchemaNode, value: &Value, field: &str) -> Option<TypedValue> {
    debug_assert!(
        value.is_null() || value.is_array() || value.is_object(),
        "record list value must be a list of records, got {value}"
    );
    let records: &[Value] = match value {
        Value::Array(items) => items,
        Value::Object(_) => std::slice::from_ref(value),
        _ => &[],
    };
    if records.is_empty() {
        return Some(TypedValue::List(None));
    }

    if record.child(field).is_none() {
        debug!(%field, "not a field of the record");
        return Some(TypedValue::List(None));
    }

    let gathered: Vec<Value> = records
        .iter()
        .map(|entry| member(entry, field).clone())
        .collect();
    Some(lift_list(&Value::Array(gathered)))
}

fn member<'v>(value: &'v Value, key: &str) -> &'v Value {
    debug_assert!(
        value.is_null() || value.is_object() || value.is_array(),
        "value tree is not shaped like the schema at `{key}`: {value}"
    );
    match value {
        Value::Array(items) => key
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .unwrap_or(&NULL),
        _ => value.get(key).unwrap_or(&NULL),
    }
}
