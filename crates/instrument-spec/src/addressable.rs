use crate::identifier::Identifier;
use crate::spec::schema::VALUE_KEY;
use crate::spec::{InstrumentType, NodeContext, SchemaNode};

/// Lists every identifier that resolves to a field of `schema` when record
/// lists expand.
///
/// Enumeration sets contribute the set itself plus one identifier per tag;
/// record lists contribute one identifier per record sub-field.
pub fn identifiers(schema: &SchemaNode) -> Vec<Identifier> {
    let mut found = Vec::new();
    collect(schema, &Identifier::from_segments(Vec::<String>::new()), &mut found);
    found
}

fn collect(node: &SchemaNode, prefix: &Identifier, found: &mut Vec<Identifier>) {
    for (id, child) in &node.children {
        let path = prefix.child(id.as_str());
        let target = match child.context() {
            NodeContext::Field => match child.child(VALUE_KEY) {
                Some(inner) => inner,
                None => continue,
            },
            NodeContext::Plain => child,
        };

        match target.kind() {
            Some(InstrumentType::EnumerationSet { enumerations }) => {
                found.push(path.clone());
                found.extend(enumerations.iter().map(|tag| path.child(tag.as_str())));
            }
            Some(InstrumentType::RecordList { record }) => {
                found.extend(record.children.keys().map(|sub| path.child(sub.as_str())));
            }
            Some(_) => {
                found.push(path.clone());
                collect(target, &path, found);
            }
            None => collect(target, &path, found),
        }
    }
}
