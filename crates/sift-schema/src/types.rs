//! Field-type descriptors and the contracts exchanged with the mapper layer.
//!
//! The schema model treats field types as opaque descriptors supplied at
//! construction: beyond the `nested()` flag on object types, their content
//! only matters to the backend that dispatches query elements on them.

use std::fmt;

/// Storage structure of an object field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectStructure {
    /// Children are flattened into the enclosing document.
    Flattened,
    /// Children are stored as separate nested documents.
    Nested,
}

/// Backend descriptor for an object (composite) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectFieldType {
    /// How the object's children are stored.
    structure: ObjectStructure,
}

impl ObjectFieldType {
    /// Creates an object type with the given storage structure.
    pub fn new(structure: ObjectStructure) -> Self {
        Self { structure }
    }

    /// Returns the storage structure.
    pub fn structure(&self) -> ObjectStructure {
        self.structure
    }

    /// True when children are stored as separate nested documents.
    pub fn nested(&self) -> bool {
        self.structure == ObjectStructure::Nested
    }
}

/// Semantic kind of a value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Analyzed full-text.
    Text,
    /// Non-analyzed (optionally normalized) string.
    Keyword,
    /// Integer number.
    Integer,
    /// Floating-point number.
    Float,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
}

/// Backend descriptor for a value field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFieldType {
    /// Semantic kind of the values.
    kind: ValueKind,
    /// Name of the analyzer applied to the field, if any.
    analyzer: Option<String>,
    /// Name of the normalizer applied to the field, if any.
    normalizer: Option<String>,
}

impl ValueFieldType {
    /// Creates a value type of the given kind with no analysis attached.
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            analyzer: None,
            normalizer: None,
        }
    }

    /// Attaches a named analyzer to this type.
    #[must_use]
    pub fn with_analyzer(mut self, name: impl Into<String>) -> Self {
        self.analyzer = Some(name.into());
        self
    }

    /// Attaches a named normalizer to this type.
    #[must_use]
    pub fn with_normalizer(mut self, name: impl Into<String>) -> Self {
        self.normalizer = Some(name.into());
        self
    }

    /// Returns the semantic kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the attached analyzer name, if any.
    pub fn analyzer(&self) -> Option<&str> {
        self.analyzer.as_deref()
    }

    /// Returns the attached normalizer name, if any.
    pub fn normalizer(&self) -> Option<&str> {
        self.normalizer.as_deref()
    }
}

/// Document-id serialization contract owned by an index model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentIdentifier {
    /// Name of the mapped property backing the document id, if any.
    mapped_property: Option<String>,
}

impl DocumentIdentifier {
    /// Creates an identifier contract backed by the given mapped property.
    pub fn new(mapped_property: impl Into<String>) -> Self {
        Self {
            mapped_property: Some(mapped_property.into()),
        }
    }

    /// Returns the mapped property name, if any.
    pub fn mapped_property(&self) -> Option<&str> {
        self.mapped_property.as_deref()
    }
}

/// Opaque handle to a declared field, usable by the indexing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFieldReference {
    /// Absolute path of the referenced field; `None` for the root.
    absolute_path: Option<String>,
}

impl IndexFieldReference {
    /// Creates a reference to the field at the given absolute path.
    pub(crate) fn new(absolute_path: Option<String>) -> Self {
        Self { absolute_path }
    }

    /// Returns the absolute path of the referenced field, `None` for the root.
    pub fn absolute_path(&self) -> Option<&str> {
        self.absolute_path.as_deref()
    }
}

/// A reconstruction mapping registered for projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProjection {
    /// Absolute path of the projected field.
    pub absolute_path: String,
    /// Whether the projection yields multiple values.
    pub multi_valued: bool,
}

/// Descriptor for a named analyzer or normalizer.
///
/// Used for introspection and metamodel purposes only, never for index-time
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDescriptor {
    /// The component's declared name.
    name: String,
}

impl AnalysisDescriptor {
    /// Creates a descriptor for the given component name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the component name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lookup of analyzer/normalizer descriptors by name.
///
/// Implemented by the backend's analysis configuration; the index model
/// delegates descriptor lookups here.
pub trait AnalysisDescriptorRegistry: fmt::Debug + Send + Sync {
    /// Returns the descriptor for a named analyzer, if one is defined.
    fn analyzer_descriptor(&self, name: &str) -> Option<AnalysisDescriptor>;

    /// Returns the descriptor for a named normalizer, if one is defined.
    fn normalizer_descriptor(&self, name: &str) -> Option<AnalysisDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_nested_flag() {
        assert!(ObjectFieldType::new(ObjectStructure::Nested).nested());
        assert!(!ObjectFieldType::new(ObjectStructure::Flattened).nested());
    }

    #[test]
    fn test_value_type_analysis_attachment() {
        let field_type = ValueFieldType::new(ValueKind::Text).with_analyzer("english");
        assert_eq!(field_type.kind(), ValueKind::Text);
        assert_eq!(field_type.analyzer(), Some("english"));
        assert!(field_type.normalizer().is_none());
    }

    #[test]
    fn test_identifier_mapped_property() {
        assert_eq!(
            DocumentIdentifier::new("id").mapped_property(),
            Some("id")
        );
        assert!(DocumentIdentifier::default().mapped_property().is_none());
    }
}
