//! Definition collection and the resulting registry.

use std::collections::HashMap;

use sift_schema::{AnalysisDescriptor, AnalysisDescriptorRegistry};

use crate::{
    definition::{
        AnalyzerDefinition, CharFilterDefinition, NormalizerDefinition, TokenFilterDefinition,
        TokenizerDefinition,
    },
    error::{AnalysisError, ComponentKind},
};

/// Receiver for validated analysis definitions.
///
/// Configuration contexts call exactly one `collect_*` method per contributed
/// component, and only after the component has passed validation.
pub trait AnalysisDefinitionCollector {
    /// Registers a named analyzer definition.
    fn collect_analyzer(
        &mut self,
        name: &str,
        definition: AnalyzerDefinition,
    ) -> Result<(), AnalysisError>;

    /// Registers a named normalizer definition.
    fn collect_normalizer(
        &mut self,
        name: &str,
        definition: NormalizerDefinition,
    ) -> Result<(), AnalysisError>;

    /// Registers a named tokenizer definition.
    fn collect_tokenizer(
        &mut self,
        name: &str,
        definition: TokenizerDefinition,
    ) -> Result<(), AnalysisError>;

    /// Registers a named char filter definition.
    fn collect_char_filter(
        &mut self,
        name: &str,
        definition: CharFilterDefinition,
    ) -> Result<(), AnalysisError>;

    /// Registers a named token filter definition.
    fn collect_token_filter(
        &mut self,
        name: &str,
        definition: TokenFilterDefinition,
    ) -> Result<(), AnalysisError>;
}

/// Inserts into one kind's map, rejecting a second definition under one name.
fn insert_unique<D>(
    map: &mut HashMap<String, D>,
    kind: ComponentKind,
    name: &str,
    definition: D,
) -> Result<(), AnalysisError> {
    if map.contains_key(name) {
        return Err(AnalysisError::DuplicateDefinition {
            kind,
            name: name.to_string(),
        });
    }
    map.insert(name.to_string(), definition);
    Ok(())
}

/// All collected analysis definitions for one index, keyed by name per kind.
///
/// Names are scoped per kind: a tokenizer and a token filter may share a name,
/// but two analyzers may not.
#[derive(Debug, Default)]
pub struct AnalysisDefinitionRegistry {
    /// Analyzer definitions by name.
    analyzers: HashMap<String, AnalyzerDefinition>,
    /// Normalizer definitions by name.
    normalizers: HashMap<String, NormalizerDefinition>,
    /// Tokenizer definitions by name.
    tokenizers: HashMap<String, TokenizerDefinition>,
    /// Char filter definitions by name.
    char_filters: HashMap<String, CharFilterDefinition>,
    /// Token filter definitions by name.
    token_filters: HashMap<String, TokenFilterDefinition>,
}

impl AnalysisDefinitionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the analyzer definition registered under a name, if any.
    pub fn analyzer_definition(&self, name: &str) -> Option<&AnalyzerDefinition> {
        self.analyzers.get(name)
    }

    /// Returns the normalizer definition registered under a name, if any.
    pub fn normalizer_definition(&self, name: &str) -> Option<&NormalizerDefinition> {
        self.normalizers.get(name)
    }

    /// Returns the tokenizer definition registered under a name, if any.
    pub fn tokenizer_definition(&self, name: &str) -> Option<&TokenizerDefinition> {
        self.tokenizers.get(name)
    }

    /// Returns the char filter definition registered under a name, if any.
    pub fn char_filter_definition(&self, name: &str) -> Option<&CharFilterDefinition> {
        self.char_filters.get(name)
    }

    /// Returns the token filter definition registered under a name, if any.
    pub fn token_filter_definition(&self, name: &str) -> Option<&TokenFilterDefinition> {
        self.token_filters.get(name)
    }

    /// Total number of registered definitions across all kinds.
    pub fn len(&self) -> usize {
        self.analyzers.len()
            + self.normalizers.len()
            + self.tokenizers.len()
            + self.char_filters.len()
            + self.token_filters.len()
    }

    /// True when no definition has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalysisDefinitionCollector for AnalysisDefinitionRegistry {
    fn collect_analyzer(
        &mut self,
        name: &str,
        definition: AnalyzerDefinition,
    ) -> Result<(), AnalysisError> {
        insert_unique(&mut self.analyzers, ComponentKind::Analyzer, name, definition)
    }

    fn collect_normalizer(
        &mut self,
        name: &str,
        definition: NormalizerDefinition,
    ) -> Result<(), AnalysisError> {
        insert_unique(
            &mut self.normalizers,
            ComponentKind::Normalizer,
            name,
            definition,
        )
    }

    fn collect_tokenizer(
        &mut self,
        name: &str,
        definition: TokenizerDefinition,
    ) -> Result<(), AnalysisError> {
        insert_unique(
            &mut self.tokenizers,
            ComponentKind::Tokenizer,
            name,
            definition,
        )
    }

    fn collect_char_filter(
        &mut self,
        name: &str,
        definition: CharFilterDefinition,
    ) -> Result<(), AnalysisError> {
        insert_unique(
            &mut self.char_filters,
            ComponentKind::CharFilter,
            name,
            definition,
        )
    }

    fn collect_token_filter(
        &mut self,
        name: &str,
        definition: TokenFilterDefinition,
    ) -> Result<(), AnalysisError> {
        insert_unique(
            &mut self.token_filters,
            ComponentKind::TokenFilter,
            name,
            definition,
        )
    }
}

impl AnalysisDescriptorRegistry for AnalysisDefinitionRegistry {
    fn analyzer_descriptor(&self, name: &str) -> Option<AnalysisDescriptor> {
        self.analyzers
            .contains_key(name)
            .then(|| AnalysisDescriptor::new(name))
    }

    fn normalizer_descriptor(&self, name: &str) -> Option<AnalysisDescriptor> {
        self.normalizers
            .contains_key(name)
            .then(|| AnalysisDescriptor::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ParameterMap;

    fn tokenizer(type_name: &str) -> TokenizerDefinition {
        TokenizerDefinition {
            type_name: type_name.to_string(),
            parameters: ParameterMap::new(),
        }
    }

    #[test]
    fn test_duplicate_name_within_a_kind_is_rejected() {
        let mut registry = AnalysisDefinitionRegistry::new();
        registry
            .collect_tokenizer("tok", tokenizer("standard"))
            .expect("first registration");
        let err = registry
            .collect_tokenizer("tok", tokenizer("keyword"))
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DuplicateDefinition { kind: ComponentKind::Tokenizer, ref name }
                if name == "tok"
        ));
        // The first registration survives.
        assert_eq!(
            registry.tokenizer_definition("tok").expect("kept").type_name,
            "standard"
        );
    }

    #[test]
    fn test_names_are_scoped_per_kind() {
        let mut registry = AnalysisDefinitionRegistry::new();
        registry
            .collect_tokenizer("shared", tokenizer("standard"))
            .expect("tokenizer");
        registry
            .collect_token_filter(
                "shared",
                TokenFilterDefinition {
                    type_name: "lowercase".to_string(),
                    parameters: ParameterMap::new(),
                },
            )
            .expect("token filter under the same name");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_descriptor_lookup_reflects_registered_analyzers() {
        let mut registry = AnalysisDefinitionRegistry::new();
        registry
            .collect_analyzer(
                "english",
                AnalyzerDefinition {
                    type_name: "english".to_string(),
                    tokenizer: None,
                    char_filter: Vec::new(),
                    filter: Vec::new(),
                    parameters: ParameterMap::new(),
                },
            )
            .expect("analyzer");
        let descriptor = registry.analyzer_descriptor("english").expect("defined");
        assert_eq!(descriptor.name(), "english");
        assert!(registry.analyzer_descriptor("missing").is_none());
        assert!(registry.normalizer_descriptor("english").is_none());
    }
}
