//! Analysis definition DSL and registry.
//!
//! Analyzers, normalizers, tokenizers, char filters and token filters are
//! declared by name through an [`AnalysisConfigurationContext`], configured
//! through per-component fluent contexts, and contributed to an
//! [`AnalysisDefinitionRegistry`]. Validation is deferred to contribution
//! time, and the registry's definitions serialize to Elasticsearch-style
//! index settings JSON.
//!
//! The registry also implements [`sift_schema::AnalysisDescriptorRegistry`],
//! so a built registry can back descriptor lookups on an index model.

#![warn(missing_docs)]

mod component;
mod context;
mod definition;
mod error;
mod params;
mod registry;

pub use component::{
    AnalyzerContext, CharFilterContext, CustomCompositionContext, NormalizerContext,
    TokenFilterContext, TokenizerContext, TypedComponentContext,
};
pub use context::AnalysisConfigurationContext;
pub use definition::{
    AnalyzerDefinition, CharFilterDefinition, NormalizerDefinition, ParameterMap,
    TokenFilterDefinition, TokenizerDefinition,
};
pub use error::{AnalysisError, ComponentKind};
pub use params::Parameters;
pub use registry::{AnalysisDefinitionCollector, AnalysisDefinitionRegistry};
