//! Error types for analysis configuration.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The kind of an analysis component, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// An analyzer.
    Analyzer,
    /// A normalizer.
    Normalizer,
    /// A tokenizer.
    Tokenizer,
    /// A character filter.
    CharFilter,
    /// A token filter.
    TokenFilter,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Analyzer => "analyzer",
            Self::Normalizer => "normalizer",
            Self::Tokenizer => "tokenizer",
            Self::CharFilter => "char filter",
            Self::TokenFilter => "token filter",
        };
        write!(f, "{label}")
    }
}

/// Errors raised while declaring or contributing analysis definitions.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A parameter was set twice on the same component.
    ///
    /// Two configuration sources silently clobbering each other is a
    /// configuration bug, not a valid override, so the duplicate is rejected
    /// with both values for the author to locate.
    #[error("parameter '{name}' is already set (previous value: {previous}, new value: {new})")]
    ParameterConflict {
        /// The parameter name set twice.
        name: String,
        /// The value already in place.
        previous: Value,
        /// The value of the rejected second write.
        new: Value,
    },

    /// A custom analyzer was contributed without a tokenizer reference.
    #[error("invalid analyzer definition '{analyzer}': a custom analyzer requires a tokenizer")]
    MissingTokenizer {
        /// Name of the offending analyzer.
        analyzer: String,
    },

    /// A typed component was contributed without a type name.
    #[error("invalid {kind} definition '{name}': missing type name")]
    MissingType {
        /// Kind of the offending component.
        kind: ComponentKind,
        /// Name of the offending component.
        name: String,
    },

    /// A component was declared but never given a definition.
    #[error("{kind} '{name}' was declared but never configured")]
    Unconfigured {
        /// Kind of the offending component.
        kind: ComponentKind,
        /// Name of the offending component.
        name: String,
    },

    /// Two definitions of the same kind were registered under one name.
    #[error("multiple {kind} definitions registered with the name '{name}'")]
    DuplicateDefinition {
        /// Kind of the conflicting definitions.
        kind: ComponentKind,
        /// The name registered twice.
        name: String,
    },
}
