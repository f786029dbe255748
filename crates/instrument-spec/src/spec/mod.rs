pub mod kind;
pub mod schema;

pub use kind::InstrumentType;
pub use schema::{FieldDescriptor, NodeContext, SchemaNode};
