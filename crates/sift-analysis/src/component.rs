//! Per-component fluent definition contexts.
//!
//! Each context follows the same state machine: a component is declared by
//! name, then configured through exactly one of two mutually exclusive
//! branches (custom composition, or a native type plus parameters), and
//! finally contributed. Validation is deferred to contribution time, so a
//! partially configured and abandoned builder never fails spuriously.

use serde_json::Value;

use crate::{
    definition::{
        AnalyzerDefinition, CharFilterDefinition, NormalizerDefinition, ParameterMap,
        TokenFilterDefinition, TokenizerDefinition,
    },
    error::{AnalysisError, ComponentKind},
    params::Parameters,
    registry::AnalysisDefinitionCollector,
};

/// Shared state for components configured by native type plus parameters.
#[derive(Debug, Default)]
pub struct TypedComponentContext {
    /// Native type discriminator; unlike parameters, the last call wins.
    type_name: String,
    /// Accumulated native parameters.
    parameters: Parameters,
}

impl TypedComponentContext {
    /// Sets the native type; repeated calls replace the previous value.
    pub fn type_name(&mut self, name: &str) -> &mut Self {
        self.type_name = name.to_string();
        self
    }

    /// Sets a native parameter, rejecting duplicates.
    pub fn param(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, AnalysisError> {
        self.parameters.set(name, value)?;
        Ok(self)
    }

    /// Sets a native parameter to an ordered list, rejecting duplicates.
    pub fn param_list<V>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, AnalysisError>
    where
        V: Into<Value>,
    {
        self.parameters.set_list(name, values)?;
        Ok(self)
    }

    /// The native type, validated non-empty at contribution time.
    fn checked_type_name(&self, kind: ComponentKind, name: &str) -> Result<String, AnalysisError> {
        if self.type_name.is_empty() {
            return Err(AnalysisError::MissingType {
                kind,
                name: name.to_string(),
            });
        }
        Ok(self.type_name.clone())
    }
}

/// Builder for the filter lists of a custom analyzer or normalizer.
///
/// Each setter replaces any previously set list wholesale: repeated calls are
/// idempotent-replacing, not additive.
#[derive(Debug, Default)]
pub struct CustomCompositionContext {
    /// Referenced tokenizer name (analyzers only).
    tokenizer: Option<String>,
    /// Referenced char filter names, in application order.
    char_filters: Vec<String>,
    /// Referenced token filter names, in application order.
    token_filters: Vec<String>,
}

impl CustomCompositionContext {
    /// References the tokenizer by name.
    pub fn tokenizer(&mut self, name: &str) -> &mut Self {
        self.tokenizer = Some(name.to_string());
        self
    }

    /// Replaces the char filter list with the given names.
    pub fn char_filters<S>(&mut self, names: impl IntoIterator<Item = S>) -> &mut Self
    where
        S: Into<String>,
    {
        self.char_filters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the token filter list with the given names.
    pub fn token_filters<S>(&mut self, names: impl IntoIterator<Item = S>) -> &mut Self
    where
        S: Into<String>,
    {
        self.token_filters = names.into_iter().map(Into::into).collect();
        self
    }
}

/// The mutually exclusive configuration branches of an analyzer or normalizer.
#[derive(Debug, Default)]
enum CompositionState {
    /// Declared but not yet configured.
    #[default]
    Unconfigured,
    /// Composed from named component references.
    Custom(CustomCompositionContext),
    /// A single native type plus parameters.
    Typed(TypedComponentContext),
}

/// Fluent context for one named analyzer.
#[derive(Debug)]
pub struct AnalyzerContext {
    /// Analyzer name, fixed at declaration.
    name: String,
    /// Configuration branch taken so far.
    state: CompositionState,
}

impl AnalyzerContext {
    /// Declares an analyzer with the given name.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: CompositionState::Unconfigured,
        }
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Switches to the custom branch, replacing any previous configuration.
    pub fn custom(&mut self) -> &mut CustomCompositionContext {
        self.state = CompositionState::Custom(CustomCompositionContext::default());
        let CompositionState::Custom(context) = &mut self.state else {
            unreachable!("state was just set to custom");
        };
        context
    }

    /// Switches to the typed branch with the given native type.
    pub fn typed(&mut self, type_name: &str) -> &mut TypedComponentContext {
        let mut context = TypedComponentContext::default();
        context.type_name(type_name);
        self.state = CompositionState::Typed(context);
        let CompositionState::Typed(context) = &mut self.state else {
            unreachable!("state was just set to typed");
        };
        context
    }

    /// Validates this analyzer and registers its definition.
    ///
    /// A custom analyzer must reference a non-empty tokenizer name; a typed
    /// one must have a non-empty type. The collector is only reached after
    /// validation passes.
    pub(crate) fn contribute(
        &self,
        collector: &mut dyn AnalysisDefinitionCollector,
    ) -> Result<(), AnalysisError> {
        match &self.state {
            CompositionState::Unconfigured => Err(AnalysisError::Unconfigured {
                kind: ComponentKind::Analyzer,
                name: self.name.clone(),
            }),
            CompositionState::Custom(custom) => {
                let tokenizer = custom
                    .tokenizer
                    .as_deref()
                    .filter(|tokenizer| !tokenizer.is_empty())
                    .ok_or_else(|| AnalysisError::MissingTokenizer {
                        analyzer: self.name.clone(),
                    })?;
                collector.collect_analyzer(
                    &self.name,
                    AnalyzerDefinition {
                        type_name: "custom".to_string(),
                        tokenizer: Some(tokenizer.to_string()),
                        char_filter: custom.char_filters.clone(),
                        filter: custom.token_filters.clone(),
                        parameters: ParameterMap::new(),
                    },
                )
            }
            CompositionState::Typed(typed) => {
                let type_name = typed.checked_type_name(ComponentKind::Analyzer, &self.name)?;
                collector.collect_analyzer(
                    &self.name,
                    AnalyzerDefinition {
                        type_name,
                        tokenizer: None,
                        char_filter: Vec::new(),
                        filter: Vec::new(),
                        parameters: typed.parameters.to_map(),
                    },
                )
            }
        }
    }
}

/// Fluent context for one named normalizer.
///
/// Normalizers have no tokenizer: a custom normalizer composed only of char
/// filters and token filters is always valid once named.
#[derive(Debug)]
pub struct NormalizerContext {
    /// Normalizer name, fixed at declaration.
    name: String,
    /// Configuration branch taken so far.
    state: CompositionState,
}

impl NormalizerContext {
    /// Declares a normalizer with the given name.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: CompositionState::Unconfigured,
        }
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Switches to the custom branch, replacing any previous configuration.
    pub fn custom(&mut self) -> &mut CustomCompositionContext {
        self.state = CompositionState::Custom(CustomCompositionContext::default());
        let CompositionState::Custom(context) = &mut self.state else {
            unreachable!("state was just set to custom");
        };
        context
    }

    /// Switches to the typed branch with the given native type.
    pub fn typed(&mut self, type_name: &str) -> &mut TypedComponentContext {
        let mut context = TypedComponentContext::default();
        context.type_name(type_name);
        self.state = CompositionState::Typed(context);
        let CompositionState::Typed(context) = &mut self.state else {
            unreachable!("state was just set to typed");
        };
        context
    }

    /// Validates this normalizer and registers its definition.
    pub(crate) fn contribute(
        &self,
        collector: &mut dyn AnalysisDefinitionCollector,
    ) -> Result<(), AnalysisError> {
        match &self.state {
            CompositionState::Unconfigured => Err(AnalysisError::Unconfigured {
                kind: ComponentKind::Normalizer,
                name: self.name.clone(),
            }),
            CompositionState::Custom(custom) => collector.collect_normalizer(
                &self.name,
                NormalizerDefinition {
                    type_name: "custom".to_string(),
                    char_filter: custom.char_filters.clone(),
                    filter: custom.token_filters.clone(),
                    parameters: ParameterMap::new(),
                },
            ),
            CompositionState::Typed(typed) => {
                let type_name = typed.checked_type_name(ComponentKind::Normalizer, &self.name)?;
                collector.collect_normalizer(
                    &self.name,
                    NormalizerDefinition {
                        type_name,
                        char_filter: Vec::new(),
                        filter: Vec::new(),
                        parameters: typed.parameters.to_map(),
                    },
                )
            }
        }
    }
}

/// Fluent context for one named tokenizer (typed-only).
#[derive(Debug)]
pub struct TokenizerContext {
    /// Tokenizer name, fixed at declaration.
    name: String,
    /// Native type and parameters.
    component: TypedComponentContext,
}

impl TokenizerContext {
    /// Declares a tokenizer with the given name.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            component: TypedComponentContext::default(),
        }
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the native type; repeated calls replace the previous value.
    pub fn type_name(&mut self, name: &str) -> &mut Self {
        self.component.type_name(name);
        self
    }

    /// Sets a native parameter, rejecting duplicates.
    pub fn param(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, AnalysisError> {
        self.component.param(name, value)?;
        Ok(self)
    }

    /// Sets a native parameter to an ordered list, rejecting duplicates.
    pub fn param_list<V>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, AnalysisError>
    where
        V: Into<Value>,
    {
        self.component.param_list(name, values)?;
        Ok(self)
    }

    /// Validates this tokenizer and registers its definition.
    pub(crate) fn contribute(
        &self,
        collector: &mut dyn AnalysisDefinitionCollector,
    ) -> Result<(), AnalysisError> {
        let type_name = self
            .component
            .checked_type_name(ComponentKind::Tokenizer, &self.name)?;
        collector.collect_tokenizer(
            &self.name,
            TokenizerDefinition {
                type_name,
                parameters: self.component.parameters.to_map(),
            },
        )
    }
}

/// Fluent context for one named character filter (typed-only).
#[derive(Debug)]
pub struct CharFilterContext {
    /// Char filter name, fixed at declaration.
    name: String,
    /// Native type and parameters.
    component: TypedComponentContext,
}

impl CharFilterContext {
    /// Declares a char filter with the given name.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            component: TypedComponentContext::default(),
        }
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the native type; repeated calls replace the previous value.
    pub fn type_name(&mut self, name: &str) -> &mut Self {
        self.component.type_name(name);
        self
    }

    /// Sets a native parameter, rejecting duplicates.
    pub fn param(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, AnalysisError> {
        self.component.param(name, value)?;
        Ok(self)
    }

    /// Sets a native parameter to an ordered list, rejecting duplicates.
    pub fn param_list<V>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, AnalysisError>
    where
        V: Into<Value>,
    {
        self.component.param_list(name, values)?;
        Ok(self)
    }

    /// Validates this char filter and registers its definition.
    pub(crate) fn contribute(
        &self,
        collector: &mut dyn AnalysisDefinitionCollector,
    ) -> Result<(), AnalysisError> {
        let type_name = self
            .component
            .checked_type_name(ComponentKind::CharFilter, &self.name)?;
        collector.collect_char_filter(
            &self.name,
            CharFilterDefinition {
                type_name,
                parameters: self.component.parameters.to_map(),
            },
        )
    }
}

/// Fluent context for one named token filter (typed-only).
#[derive(Debug)]
pub struct TokenFilterContext {
    /// Token filter name, fixed at declaration.
    name: String,
    /// Native type and parameters.
    component: TypedComponentContext,
}

impl TokenFilterContext {
    /// Declares a token filter with the given name.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            component: TypedComponentContext::default(),
        }
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the native type; repeated calls replace the previous value.
    pub fn type_name(&mut self, name: &str) -> &mut Self {
        self.component.type_name(name);
        self
    }

    /// Sets a native parameter, rejecting duplicates.
    pub fn param(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, AnalysisError> {
        self.component.param(name, value)?;
        Ok(self)
    }

    /// Sets a native parameter to an ordered list, rejecting duplicates.
    pub fn param_list<V>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, AnalysisError>
    where
        V: Into<Value>,
    {
        self.component.param_list(name, values)?;
        Ok(self)
    }

    /// Validates this token filter and registers its definition.
    pub(crate) fn contribute(
        &self,
        collector: &mut dyn AnalysisDefinitionCollector,
    ) -> Result<(), AnalysisError> {
        let type_name = self
            .component
            .checked_type_name(ComponentKind::TokenFilter, &self.name)?;
        collector.collect_token_filter(
            &self.name,
            TokenFilterDefinition {
                type_name,
                parameters: self.component.parameters.to_map(),
            },
        )
    }
}
