//! Error types for the index schema model.

use thiserror::Error;

/// Errors that can occur while building or querying an index schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field or template was declared with an empty relative name.
    #[error("field declared with an empty name under '{parent}'")]
    EmptyFieldName {
        /// Absolute path of the declaring composite, `<root>` for the root.
        parent: String,
    },

    /// An empty absolute path was passed to a lookup.
    #[error("field path must not be empty")]
    EmptyFieldPath,

    /// Two fields were declared with the same relative name under one composite.
    #[error("duplicate field '{name}' under '{parent}'")]
    DuplicateField {
        /// The conflicting relative name.
        name: String,
        /// Absolute path of the declaring composite, `<root>` for the root.
        parent: String,
    },

    /// Two field templates were declared with the same name.
    #[error("duplicate field template '{name}'")]
    DuplicateTemplate {
        /// The conflicting template name.
        name: String,
    },

    /// A field template pattern failed to compile.
    #[error("invalid field template pattern '{pattern}': {source}")]
    InvalidTemplateGlob {
        /// The pattern that failed to compile, prefixed with its scope path.
        pattern: String,
        /// Underlying glob error.
        source: globset::Error,
    },

    /// A node was asked to act as a kind it is not.
    #[error("field '{path}' cannot be used as {expected}: it is {actual}")]
    FieldKindMismatch {
        /// Absolute path of the offending field.
        path: String,
        /// What the caller asked the field to act as.
        expected: &'static str,
        /// What the field actually is.
        actual: &'static str,
    },

    /// An absolute path does not resolve to any field.
    #[error("unknown field '{path}' in index '{index}'")]
    UnknownField {
        /// The path that could not be resolved.
        path: String,
        /// Name of the index that was searched.
        index: String,
    },

    /// A failure occurred while resolving an absolute path.
    #[error("unable to resolve field '{path}' in index '{index}': {source}")]
    FieldResolution {
        /// The path whose resolution failed.
        path: String,
        /// Name of the index that was searched.
        index: String,
        /// The underlying failure.
        source: Box<SchemaError>,
    },
}
