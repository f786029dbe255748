use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::kind::InstrumentType;

/// Key under which a `field`-context node stores its own value.
pub const VALUE_KEY: &str = "value";

/// Where a node keeps its immediate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeContext {
    /// The value sits directly at the node.
    #[default]
    Plain,
    /// The value is wrapped one level deeper under [`VALUE_KEY`].
    Field,
}

/// Field metadata attached to a schema node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    #[serde(default, skip_serializing_if = "is_plain")]
    pub context: NodeContext,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<InstrumentType>,
}

fn is_plain(context: &NodeContext) -> bool {
    matches!(context, NodeContext::Plain)
}

/// One location in the instrument's field tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaNode {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldDescriptor>,
}

impl SchemaNode {
    /// Structural node without a declared type.
    pub fn group() -> Self {
        Self::default()
    }

    /// Leaf node declaring `kind`.
    pub fn typed(kind: InstrumentType) -> Self {
        Self {
            children: BTreeMap::new(),
            field: Some(FieldDescriptor {
                context: NodeContext::Plain,
                kind: Some(kind),
            }),
        }
    }

    /// Node whose declared type sits under the implicit [`VALUE_KEY`] child.
    pub fn wrapped(kind: InstrumentType) -> Self {
        Self {
            children: BTreeMap::from([(VALUE_KEY.to_string(), Self::typed(kind))]),
            field: Some(FieldDescriptor {
                context: NodeContext::Field,
                kind: None,
            }),
        }
    }

    pub fn with_child(mut self, id: impl Into<String>, child: SchemaNode) -> Self {
        self.children.insert(id.into(), child);
        self
    }

    pub fn child(&self, id: &str) -> Option<&SchemaNode> {
        self.children.get(id)
    }

    pub fn kind(&self) -> Option<&InstrumentType> {
        self.field.as_ref().and_then(|field| field.kind.as_ref())
    }

    pub fn context(&self) -> NodeContext {
        self.field
            .as_ref()
            .map(|field| field.context)
            .unwrap_or_default()
    }
}
