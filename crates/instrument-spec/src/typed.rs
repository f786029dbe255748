use serde::Serialize;
use serde_json::Value;

use crate::params::Parameter;
use crate::spec::InstrumentType;

/// Value handed to the expression evaluator once an identifier resolves.
///
/// Scalar tags carry the raw payload untouched (possibly `null`). A `List`
/// never holds an empty vector: no list and an empty list are both `List(None)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Number(Value),
    String(Value),
    Boolean(Value),
    Date(Value),
    Time(Value),
    DateTime(Value),
    List(Option<Vec<TypedValue>>),
    Untyped(Value),
}

impl TypedValue {
    pub fn tag(&self) -> &'static str {
        match self {
            TypedValue::Number(_) => "number",
            TypedValue::String(_) => "string",
            TypedValue::Boolean(_) => "boolean",
            TypedValue::Date(_) => "date",
            TypedValue::Time(_) => "time",
            TypedValue::DateTime(_) => "date_time",
            TypedValue::List(_) => "list",
            TypedValue::Untyped(_) => "untyped",
        }
    }

    /// Scalar payload; `None` for lists.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            TypedValue::Number(value)
            | TypedValue::String(value)
            | TypedValue::Boolean(value)
            | TypedValue::Date(value)
            | TypedValue::Time(value)
            | TypedValue::DateTime(value)
            | TypedValue::Untyped(value) => Some(value),
            TypedValue::List(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypedValue::List(_))
    }

    /// Builds a list, collapsing an empty one to `List(None)`.
    pub fn list(items: Vec<TypedValue>) -> Self {
        if items.is_empty() {
            TypedValue::List(None)
        } else {
            TypedValue::List(Some(items))
        }
    }

    /// Tagged JSON form, `{"type": ..., "value": ...}`.
    pub fn into_json(self) -> serde_json::Result<Value> {
        serde_json::to_value(&self)
    }
}

/// Lifts `raw` according to the field's declared type.
pub fn lift_declared(kind: &InstrumentType, raw: &Value) -> TypedValue {
    match kind {
        InstrumentType::Float | InstrumentType::Integer => TypedValue::Number(raw.clone()),
        InstrumentType::Text | InstrumentType::Enumeration => TypedValue::String(raw.clone()),
        InstrumentType::Boolean => TypedValue::Boolean(raw.clone()),
        InstrumentType::Date => TypedValue::Date(raw.clone()),
        InstrumentType::Time => TypedValue::Time(raw.clone()),
        InstrumentType::DateTime => TypedValue::DateTime(raw.clone()),
        InstrumentType::EnumerationSet { .. } | InstrumentType::RecordList { .. } => {
            lift_list(raw)
        }
    }
}

/// List lifting: each element goes through [`lift_native`].
pub fn lift_list(raw: &Value) -> TypedValue {
    match raw {
        Value::Null => TypedValue::List(None),
        Value::Array(items) => TypedValue::list(items.iter().map(lift_native).collect()),
        other => TypedValue::list(vec![lift_native(other)]),
    }
}

/// Lifts a value that carries no declared type by its runtime shape.
pub fn lift_native(raw: &Value) -> TypedValue {
    match raw {
        Value::String(_) => TypedValue::String(raw.clone()),
        Value::Number(_) => TypedValue::Number(raw.clone()),
        Value::Bool(_) => TypedValue::Boolean(raw.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => TypedValue::Untyped(raw.clone()),
    }
}

/// Native lifting for parameters, which may also hold instants.
pub fn lift_parameter(parameter: &Parameter) -> TypedValue {
    match parameter {
        Parameter::Undefined => TypedValue::Untyped(Value::Null),
        Parameter::Value(value) => lift_native(value),
        Parameter::Instant(instant) => TypedValue::DateTime(Value::String(instant.to_rfc3339())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn declared_scalars_keep_raw_payload() {
        assert_eq!(
            lift_declared(&InstrumentType::Integer, &json!("12")),
            TypedValue::Number(json!("12"))
        );
        assert_eq!(
            lift_declared(&InstrumentType::Enumeration, &Value::Null),
            TypedValue::String(Value::Null)
        );
        assert_eq!(
            lift_declared(&InstrumentType::Date, &json!("2024-02-29")),
            TypedValue::Date(json!("2024-02-29"))
        );
    }

    #[test]
    fn empty_list_collapses_to_none() {
        let kind = InstrumentType::enumeration_set(["a", "b"]);
        assert_eq!(lift_declared(&kind, &json!([])), TypedValue::List(None));
        assert_eq!(lift_declared(&kind, &Value::Null), TypedValue::List(None));
    }

    #[test]
    fn list_elements_are_lifted_natively() {
        let lifted = lift_list(&json!(["a", 1, true, null, {"x": 1}]));
        assert_eq!(
            lifted,
            TypedValue::List(Some(vec![
                TypedValue::String(json!("a")),
                TypedValue::Number(json!(1)),
                TypedValue::Boolean(json!(true)),
                TypedValue::Untyped(Value::Null),
                TypedValue::Untyped(json!({"x": 1})),
            ]))
        );
    }

    #[test]
    fn instant_parameters_lift_to_date_time() {
        let instant = DateTime::parse_from_rfc3339("2024-05-01T08:30:00+02:00").expect("instant");
        assert_eq!(
            lift_parameter(&Parameter::Instant(instant)),
            TypedValue::DateTime(json!("2024-05-01T08:30:00+02:00"))
        );
        assert_eq!(
            lift_parameter(&Parameter::Undefined),
            TypedValue::Untyped(Value::Null)
        );
    }

    #[test]
    fn serializes_with_tag_and_payload() {
        let value = TypedValue::List(None).into_json().expect("json");
        assert_eq!(value, json!({ "type": "list", "value": null }));
        let value = TypedValue::Number(json!(4.5)).into_json().expect("json");
        assert_eq!(value, json!({ "type": "number", "value": 4.5 }));
    }
}
