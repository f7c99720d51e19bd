//! End-to-end tests for the analysis configuration DSL.

use std::sync::Arc;

use serde_json::json;
use sift_analysis::{
    AnalysisConfigurationContext, AnalysisDefinitionRegistry, AnalysisError,
};
use sift_schema::{IndexModelCollector, IndexSchemaBuilder, ValueFieldType, ValueKind};

#[test]
fn declare_configure_and_collect_a_full_configuration() {
    let mut context = AnalysisConfigurationContext::new();
    context
        .tokenizer("my_tok")
        .type_name("standard")
        .param("max_token_length", 128)
        .expect("distinct parameter");
    context
        .analyzer("my_analyzer")
        .custom()
        .tokenizer("my_tok")
        .token_filters(["lowercase"]);
    context
        .normalizer("my_normalizer")
        .custom()
        .token_filters(["lowercase", "asciifolding"]);
    context
        .char_filter("strip_html")
        .type_name("html_strip");

    let mut registry = AnalysisDefinitionRegistry::new();
    context.contribute(&mut registry).expect("valid configuration");

    assert_eq!(registry.len(), 4);
    let analyzer = registry
        .analyzer_definition("my_analyzer")
        .expect("registered");
    assert_eq!(analyzer.type_name, "custom");
    assert_eq!(analyzer.tokenizer.as_deref(), Some("my_tok"));
    assert_eq!(analyzer.filter, ["lowercase"]);
    let tokenizer = registry.tokenizer_definition("my_tok").expect("registered");
    assert_eq!(tokenizer.type_name, "standard");
    assert_eq!(tokenizer.parameters["max_token_length"], json!(128));
}

#[test]
fn definitions_serialize_to_index_settings_json() {
    let mut context = AnalysisConfigurationContext::new();
    context
        .tokenizer("edge")
        .type_name("edge_ngram")
        .param("min_gram", 1)
        .expect("distinct parameter")
        .param("max_gram", 10)
        .expect("distinct parameter");
    context
        .analyzer("autocomplete")
        .custom()
        .tokenizer("edge")
        .token_filters(["lowercase"]);

    let mut registry = AnalysisDefinitionRegistry::new();
    context.contribute(&mut registry).expect("valid configuration");

    let tokenizer = registry.tokenizer_definition("edge").expect("registered");
    assert_eq!(
        serde_json::to_value(tokenizer).expect("serializable"),
        json!({
            "type": "edge_ngram",
            "min_gram": 1,
            "max_gram": 10,
        })
    );
    let analyzer = registry
        .analyzer_definition("autocomplete")
        .expect("registered");
    assert_eq!(
        serde_json::to_value(analyzer).expect("serializable"),
        json!({
            "type": "custom",
            "tokenizer": "edge",
            "filter": ["lowercase"],
        })
    );
}

#[test]
fn invalid_component_leaves_collector_untouched() {
    let mut context = AnalysisConfigurationContext::new();
    // Custom analyzer declared first, missing its tokenizer.
    context.analyzer("broken").custom().token_filters(["lowercase"]);
    context.tokenizer("tok").type_name("standard");

    let mut registry = AnalysisDefinitionRegistry::new();
    let err = context.contribute(&mut registry).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::MissingTokenizer { ref analyzer } if analyzer == "broken"
    ));
    // The failure happened before anything was collected.
    assert!(registry.is_empty());
}

#[test]
fn registry_backs_descriptor_lookups_on_an_index_model() {
    let mut context = AnalysisConfigurationContext::new();
    context.tokenizer("tok").type_name("standard");
    context
        .analyzer("english")
        .custom()
        .tokenizer("tok")
        .token_filters(["lowercase", "porter_stem"]);
    context
        .normalizer("sort_key")
        .custom()
        .token_filters(["lowercase"]);

    let mut registry = AnalysisDefinitionRegistry::new();
    context.contribute(&mut registry).expect("valid configuration");

    let mut builder = IndexSchemaBuilder::new("catalog", "Book");
    builder.analysis_registry(Arc::new(registry));
    builder
        .root()
        .field(
            "title",
            ValueFieldType::new(ValueKind::Text).with_analyzer("english"),
        )
        .expect("valid field");
    let model = builder.build().expect("valid schema");

    let descriptor = model.analyzer_descriptor("english").expect("defined");
    assert_eq!(descriptor.name(), "english");
    assert!(model.analyzer_descriptor("missing").is_none());
    let normalizer = model.normalizer_descriptor("sort_key").expect("defined");
    assert_eq!(normalizer.name(), "sort_key");
}
