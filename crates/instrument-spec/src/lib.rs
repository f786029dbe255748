#![allow(missing_docs)]

pub mod addressable;
pub mod document;
pub mod identifier;
pub mod params;
pub mod resolve;
pub mod spec;
pub mod typed;

pub use addressable::identifiers;
pub use document::{LoadError, load_parameters, load_schema, load_value, schema_document};
pub use identifier::Identifier;
pub use params::{Parameter, Parameters};
pub use resolve::{
    Evaluation, RecordListMode, ResolveOptions, Resolver, resolve, resolve_field,
    resolve_parameter,
};
pub use spec::{FieldDescriptor, InstrumentType, NodeContext, SchemaNode};
pub use typed::{TypedValue, lift_declared, lift_native};
