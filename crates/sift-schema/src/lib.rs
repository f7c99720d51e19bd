//! Backend-agnostic index schema model.
//!
//! An index schema is an immutable tree: a root composite, statically mapped
//! value and object fields, and field templates that lazily materialize
//! dynamic fields when a matching path is first resolved. A per-index
//! [`IndexModel`] mediates lookups, applies inclusion filtering, and memoizes
//! dynamically created fields in a thread-safe cache.
//!
//! Schemas are declared through [`IndexSchemaBuilder`] at bootstrap and never
//! change afterwards; models are read concurrently for the life of the
//! process.

#![warn(missing_docs)]

mod build;
mod error;
mod inclusion;
mod model;
mod node;
pub mod path;
mod template;
mod types;

pub use build::{
    CompositeContext, IndexModelCollector, IndexSchemaBuilder, ObjectFieldContext,
    TemplateContext, ValueFieldContext,
};
pub use error::SchemaError;
pub use inclusion::FieldInclusion;
pub use model::{FieldFilter, IndexModel};
pub use node::{IndexComposite, IndexField, IndexRoot, ObjectField, ValueField};
pub use template::{FieldTemplate, TemplateFieldType};
pub use types::{
    AnalysisDescriptor, AnalysisDescriptorRegistry, DocumentIdentifier, FieldProjection,
    IndexFieldReference, ObjectFieldType, ObjectStructure, ValueFieldType, ValueKind,
};
