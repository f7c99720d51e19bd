//! Dynamic field templates: glob-matched factories for lazily created fields.

use std::collections::HashMap;

use globset::GlobMatcher;

use crate::{
    error::SchemaError,
    inclusion::FieldInclusion,
    model::IndexModel,
    node::{IndexComposite, IndexField, ObjectField, ValueField},
    path,
    types::{ObjectFieldType, ValueFieldType},
};

/// The kind of field a template materializes.
#[derive(Debug, Clone)]
pub enum TemplateFieldType {
    /// The template creates leaf value fields.
    Value(ValueFieldType),
    /// The template creates childless dynamic object fields.
    Object(ObjectFieldType),
}

/// A dynamic-field factory bound to a glob over absolute paths.
///
/// Templates are not field instances: they materialize a field the first time
/// a matching path is resolved. The model tries them in declaration order and
/// the first match wins, so ordering is an observable contract.
#[derive(Debug)]
pub struct FieldTemplate {
    /// Template name, unique across the index; used in diagnostics.
    name: String,
    /// Compiled glob over absolute field paths.
    glob: GlobMatcher,
    /// Type given to every field this template creates.
    field_type: TemplateFieldType,
    /// Inclusion already composed with the declaring scope's inclusion.
    inclusion: FieldInclusion,
    /// Whether created fields are multi-valued.
    multi_valued: bool,
}

impl FieldTemplate {
    /// Creates a compiled template.
    pub(crate) fn new(
        name: String,
        glob: GlobMatcher,
        field_type: TemplateFieldType,
        inclusion: FieldInclusion,
        multi_valued: bool,
    ) -> Self {
        Self {
            name,
            glob,
            field_type,
            inclusion,
            multi_valued,
        }
    }

    /// Returns the template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a field for `absolute_path` if it matches this template's glob.
    ///
    /// Returns `Ok(None)` when the path does not match, so the caller can try
    /// the next template in declaration order. On a match, the path is
    /// relativized and its parent resolved through the model ignoring
    /// inclusion, which may recursively materialize dynamic object fields; a
    /// missing or non-composite parent is a typed resolution failure.
    pub(crate) fn create_node_if_matching(
        &self,
        model: &IndexModel,
        absolute_path: &str,
    ) -> Result<Option<IndexField>, SchemaError> {
        if !self.glob.is_match(absolute_path) {
            return Ok(None);
        }

        let relativized = path::relativize(absolute_path);
        let parent_context = match &relativized.parent {
            None => IndexComposite::Root(model.root()).parent_context(),
            Some(parent_path) => {
                let parent = model
                    .field_or_none_ignoring_inclusion(parent_path)?
                    .ok_or_else(|| SchemaError::UnknownField {
                        path: parent_path.clone(),
                        index: model.index_name().to_string(),
                    })?;
                parent.to_composite()?.parent_context()
            }
        };

        let field = match &self.field_type {
            TemplateFieldType::Value(field_type) => IndexField::Value(ValueField::new(
                &parent_context,
                &relativized.relative,
                field_type.clone(),
                self.inclusion,
                self.multi_valued,
            )),
            TemplateFieldType::Object(field_type) => IndexField::Object(ObjectField::new(
                &parent_context,
                &relativized.relative,
                *field_type,
                self.inclusion,
                self.multi_valued,
                HashMap::new(),
            )),
        };
        Ok(Some(field))
    }
}
