//! The top-level analysis configuration container.

use crate::{
    component::{
        AnalyzerContext, CharFilterContext, NormalizerContext, TokenFilterContext,
        TokenizerContext,
    },
    error::AnalysisError,
    registry::AnalysisDefinitionCollector,
};

/// One declared component, preserving declaration order.
#[derive(Debug)]
enum Component {
    /// A named analyzer.
    Analyzer(AnalyzerContext),
    /// A named normalizer.
    Normalizer(NormalizerContext),
    /// A named tokenizer.
    Tokenizer(TokenizerContext),
    /// A named char filter.
    CharFilter(CharFilterContext),
    /// A named token filter.
    TokenFilter(TokenFilterContext),
    /// A nested container, replayed inline.
    Container(AnalysisConfigurationContext),
}

/// Collects analysis component declarations and replays them in order.
///
/// Declarations accumulate without validation; [`contribute`] replays them in
/// declaration order, validating each component before it reaches the
/// collector. Nested containers let independent configurers each fill in
/// their own scope while the whole tree still replays as one sequence.
///
/// [`contribute`]: AnalysisConfigurationContext::contribute
#[derive(Debug, Default)]
pub struct AnalysisConfigurationContext {
    /// Declared components in declaration order.
    components: Vec<Component>,
}

impl AnalysisConfigurationContext {
    /// Creates an empty configuration context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an analyzer with the given name.
    pub fn analyzer(&mut self, name: &str) -> &mut AnalyzerContext {
        self.components
            .push(Component::Analyzer(AnalyzerContext::new(name)));
        let Some(Component::Analyzer(context)) = self.components.last_mut() else {
            unreachable!("an analyzer was just appended");
        };
        context
    }

    /// Declares a normalizer with the given name.
    pub fn normalizer(&mut self, name: &str) -> &mut NormalizerContext {
        self.components
            .push(Component::Normalizer(NormalizerContext::new(name)));
        let Some(Component::Normalizer(context)) = self.components.last_mut() else {
            unreachable!("a normalizer was just appended");
        };
        context
    }

    /// Declares a tokenizer with the given name.
    pub fn tokenizer(&mut self, name: &str) -> &mut TokenizerContext {
        self.components
            .push(Component::Tokenizer(TokenizerContext::new(name)));
        let Some(Component::Tokenizer(context)) = self.components.last_mut() else {
            unreachable!("a tokenizer was just appended");
        };
        context
    }

    /// Declares a char filter with the given name.
    pub fn char_filter(&mut self, name: &str) -> &mut CharFilterContext {
        self.components
            .push(Component::CharFilter(CharFilterContext::new(name)));
        let Some(Component::CharFilter(context)) = self.components.last_mut() else {
            unreachable!("a char filter was just appended");
        };
        context
    }

    /// Declares a token filter with the given name.
    pub fn token_filter(&mut self, name: &str) -> &mut TokenFilterContext {
        self.components
            .push(Component::TokenFilter(TokenFilterContext::new(name)));
        let Some(Component::TokenFilter(context)) = self.components.last_mut() else {
            unreachable!("a token filter was just appended");
        };
        context
    }

    /// Opens a nested container scope.
    pub fn container(&mut self) -> &mut AnalysisConfigurationContext {
        self.components
            .push(Component::Container(AnalysisConfigurationContext::new()));
        let Some(Component::Container(context)) = self.components.last_mut() else {
            unreachable!("a container was just appended");
        };
        context
    }

    /// True when nothing has been declared in this scope.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Validates every declared component and registers its definition.
    ///
    /// Components are replayed in declaration order, nested containers
    /// inline. The first invalid component aborts the replay; anything
    /// already collected stays collected.
    pub fn contribute(
        &self,
        collector: &mut dyn AnalysisDefinitionCollector,
    ) -> Result<(), AnalysisError> {
        for component in &self.components {
            match component {
                Component::Analyzer(context) => context.contribute(collector)?,
                Component::Normalizer(context) => context.contribute(collector)?,
                Component::Tokenizer(context) => context.contribute(collector)?,
                Component::CharFilter(context) => context.contribute(collector)?,
                Component::TokenFilter(context) => context.contribute(collector)?,
                Component::Container(nested) => nested.contribute(collector)?,
            }
        }
        Ok(())
    }
}
