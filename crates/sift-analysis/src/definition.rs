//! Native analysis definitions, shaped like Elasticsearch index settings.
//!
//! Definitions serialize to the JSON objects that go under `analysis.analyzer`,
//! `analysis.normalizer`, `analysis.tokenizer`, `analysis.char_filter` and
//! `analysis.filter` in index settings. Parameter maps are insertion-ordered
//! so settings serialize the way they were declared.

use serde::Serialize;
use serde_json::{Map, Value};

/// Insertion-ordered map of native component parameters.
pub type ParameterMap = Map<String, Value>;

/// A named analyzer definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerDefinition {
    /// Native analyzer type; `"custom"` for composed analyzers.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Name of the referenced tokenizer (custom analyzers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    /// Referenced char filter names, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub char_filter: Vec<String>,
    /// Referenced token filter names, applied in order.
    #[serde(rename = "filter", skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
    /// Additional native parameters, flattened into the object.
    #[serde(flatten)]
    pub parameters: ParameterMap,
}

/// A named normalizer definition.
///
/// Normalizers have no tokenizer: they are composed of char filters and token
/// filters only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizerDefinition {
    /// Native normalizer type; `"custom"` for composed normalizers.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Referenced char filter names, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub char_filter: Vec<String>,
    /// Referenced token filter names, applied in order.
    #[serde(rename = "filter", skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
    /// Additional native parameters, flattened into the object.
    #[serde(flatten)]
    pub parameters: ParameterMap,
}

/// A named tokenizer definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenizerDefinition {
    /// Native tokenizer type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Additional native parameters, flattened into the object.
    #[serde(flatten)]
    pub parameters: ParameterMap,
}

/// A named character filter definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharFilterDefinition {
    /// Native char filter type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Additional native parameters, flattened into the object.
    #[serde(flatten)]
    pub parameters: ParameterMap,
}

/// A named token filter definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenFilterDefinition {
    /// Native token filter type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Additional native parameters, flattened into the object.
    #[serde(flatten)]
    pub parameters: ParameterMap,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_custom_analyzer_serialization_shape() {
        let definition = AnalyzerDefinition {
            type_name: "custom".to_string(),
            tokenizer: Some("standard".to_string()),
            char_filter: vec!["html_strip".to_string()],
            filter: vec!["lowercase".to_string(), "asciifolding".to_string()],
            parameters: ParameterMap::new(),
        };
        let value = serde_json::to_value(&definition).expect("serializable");
        assert_eq!(
            value,
            json!({
                "type": "custom",
                "tokenizer": "standard",
                "char_filter": ["html_strip"],
                "filter": ["lowercase", "asciifolding"],
            })
        );
    }

    #[test]
    fn test_typed_tokenizer_flattens_parameters() {
        let mut parameters = ParameterMap::new();
        parameters.insert("max_gram".to_string(), json!(3));
        parameters.insert("min_gram".to_string(), json!(1));
        let definition = TokenizerDefinition {
            type_name: "ngram".to_string(),
            parameters,
        };
        let value = serde_json::to_value(&definition).expect("serializable");
        assert_eq!(
            value,
            json!({
                "type": "ngram",
                "max_gram": 3,
                "min_gram": 1,
            })
        );
    }

    #[test]
    fn test_empty_collections_are_skipped() {
        let definition = NormalizerDefinition {
            type_name: "custom".to_string(),
            char_filter: Vec::new(),
            filter: Vec::new(),
            parameters: ParameterMap::new(),
        };
        let value = serde_json::to_value(&definition).expect("serializable");
        assert_eq!(value, json!({ "type": "custom" }));
    }
}
