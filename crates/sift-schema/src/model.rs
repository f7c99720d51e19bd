//! The per-index model: lookup, inclusion filtering, and the dynamic cache.
//!
//! An [`IndexModel`] is built once at bootstrap and read concurrently for the
//! life of the process. Everything in it is immutable except the
//! dynamic-field cache, whose correctness rests entirely on an atomic
//! insert-if-absent: racing resolvers may each construct a candidate field,
//! but only one becomes the canonical entry and the loser is discarded.

use std::{collections::HashMap, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};

use crate::{
    error::SchemaError,
    node::{IndexField, IndexRoot},
    template::FieldTemplate,
    types::{
        AnalysisDescriptor, AnalysisDescriptorRegistry, DocumentIdentifier, FieldProjection,
    },
};

/// Controls whether lookups see fields pruned by embedding filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter {
    /// Return every existing field, ignoring inclusion.
    All,
    /// Hide fields whose inclusion is excluded.
    IncludedOnly,
}

/// An immutable per-index schema with thread-safe dynamic-field resolution.
#[derive(Debug)]
pub struct IndexModel {
    /// Index name, used in error contexts.
    index_name: String,
    /// Name of the mapped domain type this index covers.
    mapped_type_name: String,
    /// Document-id serialization contract.
    identifier: DocumentIdentifier,
    /// Root composite of the static schema tree.
    root: Arc<IndexRoot>,
    /// Every statically declared field at any depth, keyed by absolute path.
    static_fields: HashMap<String, Arc<IndexField>>,
    /// Precomputed view of `static_fields` restricted to included fields.
    ///
    /// Enumerating the visible static schema is common enough that the filter
    /// is applied once at construction, never recomputed.
    included_static_fields: HashMap<String, Arc<IndexField>>,
    /// Field templates in declaration order.
    templates: Vec<FieldTemplate>,
    /// Lazily materialized dynamic fields.
    ///
    /// Grows monotonically over the model's lifetime and is never cleared.
    dynamic_fields: DashMap<String, Arc<IndexField>>,
    /// Reconstruction mappings registered during building.
    projections: Vec<FieldProjection>,
    /// Analyzer/normalizer descriptor lookup, when analysis is configured.
    analysis_registry: Option<Arc<dyn AnalysisDescriptorRegistry>>,
}

impl IndexModel {
    /// Assembles a model from the builder's output.
    pub(crate) fn new(
        index_name: String,
        mapped_type_name: String,
        identifier: DocumentIdentifier,
        root: IndexRoot,
        static_fields: HashMap<String, Arc<IndexField>>,
        templates: Vec<FieldTemplate>,
        projections: Vec<FieldProjection>,
        analysis_registry: Option<Arc<dyn AnalysisDescriptorRegistry>>,
    ) -> Self {
        let included_static_fields = static_fields
            .iter()
            .filter(|(_, field)| field.inclusion().is_included())
            .map(|(p, f)| (p.clone(), Arc::clone(f)))
            .collect();
        Self {
            index_name,
            mapped_type_name,
            identifier,
            root: Arc::new(root),
            static_fields,
            included_static_fields,
            templates,
            dynamic_fields: DashMap::new(),
            projections,
            analysis_registry,
        }
    }

    /// Returns the index name.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Returns the name of the mapped domain type.
    pub fn mapped_type_name(&self) -> &str {
        &self.mapped_type_name
    }

    /// Returns the document-id serialization contract.
    pub fn identifier(&self) -> &DocumentIdentifier {
        &self.identifier
    }

    /// Returns the root composite.
    pub fn root(&self) -> &IndexRoot {
        &self.root
    }

    /// Returns the reconstruction mappings registered during building.
    pub fn projections(&self) -> &[FieldProjection] {
        &self.projections
    }

    /// Resolves an absolute path to a field, applying the inclusion filter.
    ///
    /// Returns `Ok(None)` when no static field, cached dynamic field, or
    /// template covers the path, or when the field exists but is excluded and
    /// the filter is [`FieldFilter::IncludedOnly`]. Any failure raised during
    /// resolution is wrapped with the path and the index's identity.
    pub fn field_or_none(
        &self,
        absolute_path: &str,
        filter: FieldFilter,
    ) -> Result<Option<Arc<IndexField>>, SchemaError> {
        let field = self
            .field_or_none_ignoring_inclusion(absolute_path)
            .map_err(|source| SchemaError::FieldResolution {
                path: absolute_path.to_string(),
                index: self.index_name.clone(),
                source: Box::new(source),
            })?;
        Ok(field.filter(|field| match filter {
            FieldFilter::All => true,
            FieldFilter::IncludedOnly => field.inclusion().is_included(),
        }))
    }

    /// Resolves an absolute path to a field, failing when it does not exist.
    pub fn field(
        &self,
        absolute_path: &str,
        filter: FieldFilter,
    ) -> Result<Arc<IndexField>, SchemaError> {
        self.field_or_none(absolute_path, filter)?
            .ok_or_else(|| SchemaError::UnknownField {
                path: absolute_path.to_string(),
                index: self.index_name.clone(),
            })
    }

    /// Resolves an absolute path without applying any inclusion filter.
    ///
    /// Lookup order: static fields, then the dynamic cache, then templates in
    /// declaration order. The first matching template creates the field, which
    /// is inserted with put-if-absent semantics: if a concurrent resolver won
    /// the race for the same path, the freshly built node is discarded and the
    /// winner returned. Concurrently created nodes for one path are defined to
    /// be behaviorally interchangeable, so losing the race is safe.
    pub fn field_or_none_ignoring_inclusion(
        &self,
        absolute_path: &str,
    ) -> Result<Option<Arc<IndexField>>, SchemaError> {
        if absolute_path.is_empty() {
            return Err(SchemaError::EmptyFieldPath);
        }
        if let Some(field) = self.static_fields.get(absolute_path) {
            return Ok(Some(Arc::clone(field)));
        }
        if let Some(field) = self.dynamic_fields.get(absolute_path) {
            return Ok(Some(Arc::clone(field.value())));
        }
        for template in &self.templates {
            if let Some(created) = template.create_node_if_matching(self, absolute_path)? {
                let created = Arc::new(created);
                let canonical = match self.dynamic_fields.entry(absolute_path.to_string()) {
                    Entry::Occupied(entry) => Arc::clone(entry.get()),
                    Entry::Vacant(entry) => {
                        let inserted = entry.insert(created);
                        Arc::clone(inserted.value())
                    }
                };
                // First matching template wins; later templates are never tried.
                return Ok(Some(canonical));
            }
        }
        Ok(None)
    }

    /// The included static fields, keyed by absolute path.
    pub fn static_fields(&self) -> &HashMap<String, Arc<IndexField>> {
        &self.included_static_fields
    }

    /// Every static field regardless of inclusion, keyed by absolute path.
    pub fn all_static_fields(&self) -> &HashMap<String, Arc<IndexField>> {
        &self.static_fields
    }

    /// Number of entries in the dynamic-field cache.
    pub fn dynamic_field_count(&self) -> usize {
        self.dynamic_fields.len()
    }

    /// Looks up the descriptor of a named analyzer, if analysis is configured.
    pub fn analyzer_descriptor(&self, name: &str) -> Option<AnalysisDescriptor> {
        self.analysis_registry
            .as_ref()
            .and_then(|registry| registry.analyzer_descriptor(name))
    }

    /// Looks up the descriptor of a named normalizer, if analysis is configured.
    pub fn normalizer_descriptor(&self, name: &str) -> Option<AnalysisDescriptor> {
        self.analysis_registry
            .as_ref()
            .and_then(|registry| registry.normalizer_descriptor(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        build::{IndexModelCollector, IndexSchemaBuilder},
        inclusion::FieldInclusion,
        template::TemplateFieldType,
        types::{ObjectFieldType, ObjectStructure, ValueFieldType, ValueKind},
    };

    fn keyword() -> ValueFieldType {
        ValueFieldType::new(ValueKind::Keyword)
    }

    fn build_model() -> IndexModel {
        let mut builder = IndexSchemaBuilder::new("books-index", "Book");
        {
            let root = builder.root();
            root.field("title", ValueFieldType::new(ValueKind::Text))
                .expect("valid field");
            let authors = root
                .child_object("authors", ObjectFieldType::new(ObjectStructure::Nested))
                .expect("valid object");
            authors.multi_valued();
            authors.field("name", keyword()).expect("valid field");
            let hidden = root
                .child_object("internal", ObjectFieldType::new(ObjectStructure::Flattened))
                .expect("valid object");
            hidden.excluded();
            hidden.field("note", keyword()).expect("valid field");
            root.field_template("metadata", "metadata_*", TemplateFieldType::Value(keyword()))
                .expect("valid template");
        }
        builder.build().expect("valid schema")
    }

    #[test]
    fn test_static_lookup() {
        let model = build_model();
        let field = model
            .field_or_none("authors.name", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("field exists");
        assert_eq!(field.relative_name(), "name");
        assert_eq!(field.closest_multi_valued_parent_path(), Some("authors"));
    }

    #[test]
    fn test_included_only_filter_hides_excluded_fields() {
        let model = build_model();
        // The field exists when inclusion is ignored.
        let field = model
            .field_or_none("internal.note", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("field exists");
        assert_eq!(field.inclusion(), FieldInclusion::Excluded);
        // ...but is invisible to filtered lookups.
        let filtered = model
            .field_or_none("internal.note", FieldFilter::IncludedOnly)
            .expect("resolution succeeds");
        assert!(filtered.is_none());
    }

    #[test]
    fn test_static_fields_view_is_prefiltered() {
        let model = build_model();
        assert!(model.static_fields().contains_key("title"));
        assert!(model.static_fields().contains_key("authors.name"));
        assert!(!model.static_fields().contains_key("internal.note"));
        assert!(model.all_static_fields().contains_key("internal.note"));
    }

    #[test]
    fn test_dynamic_field_created_and_cached() {
        let model = build_model();
        let first = model
            .field_or_none("metadata_color", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("template matches");
        let second = model
            .field_or_none("metadata_color", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("cached field");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(model.dynamic_field_count(), 1);
    }

    #[test]
    fn test_unmatched_path_resolves_to_none() {
        let model = build_model();
        let missing = model
            .field_or_none("no_such_field", FieldFilter::All)
            .expect("resolution succeeds");
        assert!(missing.is_none());
        let err = model.field("no_such_field", FieldFilter::All).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownField { ref path, ref index }
                if path == "no_such_field" && index == "books-index"
        ));
    }

    #[test]
    fn test_empty_path_is_a_resolution_failure() {
        let model = build_model();
        let err = model.field_or_none("", FieldFilter::All).unwrap_err();
        assert!(matches!(err, SchemaError::FieldResolution { .. }));
    }

    #[test]
    fn test_template_declaration_order_wins() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            root.field_template(
                "first",
                "dyn_*",
                TemplateFieldType::Value(ValueFieldType::new(ValueKind::Keyword)),
            )
            .expect("valid template");
            root.field_template(
                "second",
                "dyn_*",
                TemplateFieldType::Value(ValueFieldType::new(ValueKind::Text)),
            )
            .expect("valid template");
        }
        let model = builder.build().expect("valid schema");
        let field = model
            .field_or_none("dyn_a", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("template matches");
        let value = field.to_value().expect("value field");
        // Both templates match; the first declared one must win.
        assert_eq!(value.field_type().kind(), ValueKind::Keyword);
    }

    #[test]
    fn test_dynamic_object_parent_materialized_recursively() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            // The value template comes first: its glob requires a dot, so it
            // never claims the bare object paths the second template covers.
            root.field_template(
                "attr-values",
                "attrs_*.*",
                TemplateFieldType::Value(ValueFieldType::new(ValueKind::Keyword)),
            )
            .expect("valid template");
            root.field_template(
                "attr-objects",
                "attrs_*",
                TemplateFieldType::Object(ObjectFieldType::new(ObjectStructure::Nested)),
            )
            .expect("valid template");
        }
        let model = builder.build().expect("valid schema");
        let leaf = model
            .field_or_none("attrs_size.value", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("template matches");
        assert_eq!(leaf.nested_path_hierarchy(), ["attrs_size"]);
        // Resolving the leaf materialized its dynamic parent too.
        assert_eq!(model.dynamic_field_count(), 2);
        let parent = model
            .field_or_none("attrs_size", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("cached parent");
        assert!(parent.as_object().is_some());
    }

    #[test]
    fn test_template_under_value_field_parent_fails_typed() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            root.field("title", ValueFieldType::new(ValueKind::Text))
                .expect("valid field");
            root.field_template(
                "anything",
                "title.*",
                TemplateFieldType::Value(ValueFieldType::new(ValueKind::Keyword)),
            )
            .expect("valid template");
        }
        let model = builder.build().expect("valid schema");
        let err = model
            .field_or_none("title.sub", FieldFilter::All)
            .unwrap_err();
        // The parent path resolves to a value field, which is not a composite.
        assert!(matches!(err, SchemaError::FieldResolution { .. }));
    }
}
