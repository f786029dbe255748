use instrument_spec::TypedValue;

/// One line of text output for a resolved identifier.
pub fn describe_line(name: &str, resolved: Option<&TypedValue>) -> String {
    match resolved {
        Some(value) => format!("{} = {}", name, describe(value)),
        None => format!("{}: not found", name),
    }
}

pub fn describe(value: &TypedValue) -> String {
    match value {
        TypedValue::List(None) => "list []".to_string(),
        TypedValue::List(Some(items)) => {
            let rendered = items.iter().map(describe).collect::<Vec<_>>();
            format!("list [{}]", rendered.join(", "))
        }
        scalar => match scalar.payload() {
            Some(payload) => format!("{} {}", scalar.tag(), payload),
            None => scalar.tag().to_string(),
        },
    }
}
