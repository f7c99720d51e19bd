//! Schema construction: builder scopes, the collector surface, and assembly.
//!
//! Mapping-time code declares fields against mutable scope contexts; `build`
//! then produces the immutable node tree bottom-up. Each child receives its
//! parent's derived context before any node exists, so no node is ever
//! published half-populated.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use globset::Glob;

use crate::{
    error::SchemaError,
    inclusion::FieldInclusion,
    model::IndexModel,
    node::{IndexField, IndexRoot, ObjectField, ParentContext, ValueField},
    path,
    template::{FieldTemplate, TemplateFieldType},
    types::{
        AnalysisDescriptorRegistry, DocumentIdentifier, FieldProjection, IndexFieldReference,
        ObjectFieldType, ValueFieldType,
    },
};

/// Collector interface through which mapping code declares an index schema.
///
/// Implemented by the root scope and by every object scope, so declarations
/// nest the same way the schema does.
pub trait IndexModelCollector {
    /// Declares a value field under this scope and returns its context.
    fn field(
        &mut self,
        relative_name: &str,
        field_type: ValueFieldType,
    ) -> Result<&mut ValueFieldContext, SchemaError>;

    /// Declares an object field under this scope and returns its context.
    fn child_object(
        &mut self,
        relative_name: &str,
        field_type: ObjectFieldType,
    ) -> Result<&mut ObjectFieldContext, SchemaError>;

    /// Declares a dynamic field template scoped to this composite.
    ///
    /// The pattern is a glob over the remainder of the path below this scope;
    /// it is prefixed with the scope's absolute path when the schema is built.
    fn field_template(
        &mut self,
        name: &str,
        pattern: &str,
        field_type: TemplateFieldType,
    ) -> Result<&mut TemplateContext, SchemaError>;

    /// Registers a reconstruction mapping for projections.
    fn projection(&mut self, projection: FieldProjection);

    /// Returns an opaque handle to this scope for the indexing layer.
    fn as_reference(&self) -> IndexFieldReference;
}

/// A declared child, in declaration order.
#[derive(Debug)]
enum ChildDecl {
    /// A value field declaration.
    Value(ValueFieldContext),
    /// An object field declaration with its nested scope.
    Object(ObjectFieldContext),
}

impl ChildDecl {
    /// The declared relative name.
    fn relative_name(&self) -> &str {
        match self {
            ChildDecl::Value(value) => &value.relative_name,
            ChildDecl::Object(object) => &object.relative_name,
        }
    }
}

/// A declared value field, mutable until the schema is built.
#[derive(Debug)]
pub struct ValueFieldContext {
    /// Relative name within the parent scope.
    relative_name: String,
    /// Absolute path, known at declaration time.
    absolute_path: String,
    /// Backend type descriptor.
    field_type: ValueFieldType,
    /// Declared inclusion, composed with ancestors at build time.
    inclusion: FieldInclusion,
    /// Whether the field holds multiple values.
    multi_valued: bool,
}

impl ValueFieldContext {
    /// Marks the field as holding multiple values.
    pub fn multi_valued(&mut self) -> &mut Self {
        self.multi_valued = true;
        self
    }

    /// Marks the field as pruned by an embedding filter.
    pub fn excluded(&mut self) -> &mut Self {
        self.inclusion = FieldInclusion::Excluded;
        self
    }

    /// Returns an opaque handle to this field for the indexing layer.
    pub fn as_reference(&self) -> IndexFieldReference {
        IndexFieldReference::new(Some(self.absolute_path.clone()))
    }
}

/// A declared field template, mutable until the schema is built.
#[derive(Debug)]
pub struct TemplateContext {
    /// Template name, unique across the whole index.
    name: String,
    /// Glob pattern relative to the declaring scope.
    pattern: String,
    /// Kind and type of the fields this template creates.
    field_type: TemplateFieldType,
    /// Declared inclusion, composed with the scope at build time.
    inclusion: FieldInclusion,
    /// Whether created fields are multi-valued.
    multi_valued: bool,
}

impl TemplateContext {
    /// Marks created fields as holding multiple values.
    pub fn multi_valued(&mut self) -> &mut Self {
        self.multi_valued = true;
        self
    }

    /// Marks created fields as pruned by an embedding filter.
    pub fn excluded(&mut self) -> &mut Self {
        self.inclusion = FieldInclusion::Excluded;
        self
    }
}

/// A declared object field together with its nested scope.
#[derive(Debug)]
pub struct ObjectFieldContext {
    /// Relative name within the parent scope.
    relative_name: String,
    /// Backend type descriptor.
    field_type: ObjectFieldType,
    /// Declared inclusion, composed with ancestors at build time.
    inclusion: FieldInclusion,
    /// Whether the object holds multiple values.
    multi_valued: bool,
    /// Scope for declaring the object's own children.
    scope: CompositeContext,
}

impl ObjectFieldContext {
    /// Marks the object as holding multiple values.
    pub fn multi_valued(&mut self) -> &mut Self {
        self.multi_valued = true;
        self
    }

    /// Marks the object as pruned by an embedding filter.
    pub fn excluded(&mut self) -> &mut Self {
        self.inclusion = FieldInclusion::Excluded;
        self
    }
}

impl IndexModelCollector for ObjectFieldContext {
    fn field(
        &mut self,
        relative_name: &str,
        field_type: ValueFieldType,
    ) -> Result<&mut ValueFieldContext, SchemaError> {
        self.scope.field(relative_name, field_type)
    }

    fn child_object(
        &mut self,
        relative_name: &str,
        field_type: ObjectFieldType,
    ) -> Result<&mut ObjectFieldContext, SchemaError> {
        self.scope.child_object(relative_name, field_type)
    }

    fn field_template(
        &mut self,
        name: &str,
        pattern: &str,
        field_type: TemplateFieldType,
    ) -> Result<&mut TemplateContext, SchemaError> {
        self.scope.field_template(name, pattern, field_type)
    }

    fn projection(&mut self, projection: FieldProjection) {
        self.scope.projection(projection);
    }

    fn as_reference(&self) -> IndexFieldReference {
        self.scope.as_reference()
    }
}

/// A builder scope for one composite node: the root or an object field.
#[derive(Debug)]
pub struct CompositeContext {
    /// Absolute path of this scope; `None` for the root scope.
    absolute_path: Option<String>,
    /// Child declarations in declaration order.
    children: Vec<ChildDecl>,
    /// Template declarations in declaration order.
    templates: Vec<TemplateContext>,
    /// Projection mappings registered in this scope.
    projections: Vec<FieldProjection>,
}

impl CompositeContext {
    /// Creates an empty scope with the given absolute path.
    fn new(absolute_path: Option<String>) -> Self {
        Self {
            absolute_path,
            children: Vec::new(),
            templates: Vec::new(),
            projections: Vec::new(),
        }
    }

    /// The scope path used in declaration-time error contexts.
    fn parent_label(&self) -> String {
        self.absolute_path
            .clone()
            .unwrap_or_else(|| "<root>".to_string())
    }

    /// Rejects empty and duplicate relative names before any declaration.
    fn check_relative_name(&self, relative_name: &str) -> Result<(), SchemaError> {
        if relative_name.is_empty() {
            return Err(SchemaError::EmptyFieldName {
                parent: self.parent_label(),
            });
        }
        if self
            .children
            .iter()
            .any(|child| child.relative_name() == relative_name)
        {
            return Err(SchemaError::DuplicateField {
                name: relative_name.to_string(),
                parent: self.parent_label(),
            });
        }
        Ok(())
    }
}

impl IndexModelCollector for CompositeContext {
    fn field(
        &mut self,
        relative_name: &str,
        field_type: ValueFieldType,
    ) -> Result<&mut ValueFieldContext, SchemaError> {
        self.check_relative_name(relative_name)?;
        let absolute_path = path::compose(self.absolute_path.as_deref(), relative_name);
        self.children.push(ChildDecl::Value(ValueFieldContext {
            relative_name: relative_name.to_string(),
            absolute_path,
            field_type,
            inclusion: FieldInclusion::Included,
            multi_valued: false,
        }));
        let Some(ChildDecl::Value(context)) = self.children.last_mut() else {
            unreachable!("a value field was just appended");
        };
        Ok(context)
    }

    fn child_object(
        &mut self,
        relative_name: &str,
        field_type: ObjectFieldType,
    ) -> Result<&mut ObjectFieldContext, SchemaError> {
        self.check_relative_name(relative_name)?;
        let absolute_path = path::compose(self.absolute_path.as_deref(), relative_name);
        self.children.push(ChildDecl::Object(ObjectFieldContext {
            relative_name: relative_name.to_string(),
            field_type,
            inclusion: FieldInclusion::Included,
            multi_valued: false,
            scope: CompositeContext::new(Some(absolute_path)),
        }));
        let Some(ChildDecl::Object(context)) = self.children.last_mut() else {
            unreachable!("an object field was just appended");
        };
        Ok(context)
    }

    fn field_template(
        &mut self,
        name: &str,
        pattern: &str,
        field_type: TemplateFieldType,
    ) -> Result<&mut TemplateContext, SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::EmptyFieldName {
                parent: self.parent_label(),
            });
        }
        self.templates.push(TemplateContext {
            name: name.to_string(),
            pattern: pattern.to_string(),
            field_type,
            inclusion: FieldInclusion::Included,
            multi_valued: false,
        });
        let Some(context) = self.templates.last_mut() else {
            unreachable!("a template was just appended");
        };
        Ok(context)
    }

    fn projection(&mut self, projection: FieldProjection) {
        self.projections.push(projection);
    }

    fn as_reference(&self) -> IndexFieldReference {
        IndexFieldReference::new(self.absolute_path.clone())
    }
}

/// Builds an immutable [`IndexModel`] from mapping-time declarations.
pub struct IndexSchemaBuilder {
    /// Index name used in error contexts.
    index_name: String,
    /// Name of the mapped domain type this index covers.
    mapped_type_name: String,
    /// Document-id serialization contract.
    identifier: DocumentIdentifier,
    /// Analyzer/normalizer descriptor lookup, when analysis is configured.
    analysis_registry: Option<Arc<dyn AnalysisDescriptorRegistry>>,
    /// The root scope.
    root: CompositeContext,
}

impl IndexSchemaBuilder {
    /// Creates a builder for the given index and mapped type.
    pub fn new(index_name: impl Into<String>, mapped_type_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            mapped_type_name: mapped_type_name.into(),
            identifier: DocumentIdentifier::default(),
            analysis_registry: None,
            root: CompositeContext::new(None),
        }
    }

    /// Sets the document-id serialization contract.
    pub fn identifier(&mut self, identifier: DocumentIdentifier) -> &mut Self {
        self.identifier = identifier;
        self
    }

    /// Attaches the analysis descriptor registry the model delegates to.
    pub fn analysis_registry(
        &mut self,
        registry: Arc<dyn AnalysisDescriptorRegistry>,
    ) -> &mut Self {
        self.analysis_registry = Some(registry);
        self
    }

    /// Returns the root scope for declaring fields and templates.
    pub fn root(&mut self) -> &mut CompositeContext {
        &mut self.root
    }

    /// Produces the immutable model.
    ///
    /// Nodes are constructed bottom-up; templates are collected in pre-order
    /// declaration order, their patterns prefixed with the declaring scope's
    /// path and their inclusion composed with the scope's.
    pub fn build(self) -> Result<IndexModel, SchemaError> {
        let mut static_fields = HashMap::new();
        let mut templates = Vec::new();
        let mut template_names = HashSet::new();
        let mut projections = Vec::new();

        let root_children = build_scope(
            self.root,
            &ParentContext::root(),
            &mut static_fields,
            &mut templates,
            &mut template_names,
            &mut projections,
        )?;

        Ok(IndexModel::new(
            self.index_name,
            self.mapped_type_name,
            self.identifier,
            IndexRoot::new(root_children),
            static_fields,
            templates,
            projections,
            self.analysis_registry,
        ))
    }
}

/// Builds the children of one scope given the scope's own derived context.
fn build_scope(
    scope: CompositeContext,
    context: &ParentContext,
    static_fields: &mut HashMap<String, Arc<IndexField>>,
    templates: &mut Vec<FieldTemplate>,
    template_names: &mut HashSet<String>,
    projections: &mut Vec<FieldProjection>,
) -> Result<HashMap<String, Arc<IndexField>>, SchemaError> {
    for declaration in scope.templates {
        if !template_names.insert(declaration.name.clone()) {
            return Err(SchemaError::DuplicateTemplate {
                name: declaration.name,
            });
        }
        let pattern = path::compose(context.absolute_path.as_deref(), &declaration.pattern);
        let glob = Glob::new(&pattern)
            .map_err(|source| SchemaError::InvalidTemplateGlob {
                pattern: pattern.clone(),
                source,
            })?
            .compile_matcher();
        templates.push(FieldTemplate::new(
            declaration.name,
            glob,
            declaration.field_type,
            context.inclusion.compose(declaration.inclusion),
            declaration.multi_valued,
        ));
    }
    projections.extend(scope.projections);

    let mut children = HashMap::with_capacity(scope.children.len());
    for declaration in scope.children {
        match declaration {
            ChildDecl::Value(value) => {
                let field = Arc::new(IndexField::Value(ValueField::new(
                    context,
                    &value.relative_name,
                    value.field_type,
                    value.inclusion,
                    value.multi_valued,
                )));
                static_fields.insert(field.absolute_path().to_string(), Arc::clone(&field));
                children.insert(value.relative_name, field);
            }
            ChildDecl::Object(object) => {
                let child_context = context.child_scope(
                    &object.relative_name,
                    &object.field_type,
                    object.inclusion,
                    object.multi_valued,
                );
                let grandchildren = build_scope(
                    object.scope,
                    &child_context,
                    static_fields,
                    templates,
                    template_names,
                    projections,
                )?;
                let field = Arc::new(IndexField::Object(ObjectField::new(
                    context,
                    &object.relative_name,
                    object.field_type,
                    object.inclusion,
                    object.multi_valued,
                    grandchildren,
                )));
                static_fields.insert(field.absolute_path().to_string(), Arc::clone(&field));
                children.insert(object.relative_name, field);
            }
        }
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::FieldFilter,
        types::{ObjectStructure, ValueKind},
    };

    fn text() -> ValueFieldType {
        ValueFieldType::new(ValueKind::Text)
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        let err = builder.root().field("", text()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::EmptyFieldName { ref parent } if parent == "<root>"
        ));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        let root = builder.root();
        root.field("title", text()).expect("valid field");
        let err = root.field("title", text()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateField { ref name, .. } if name == "title"
        ));
    }

    #[test]
    fn test_duplicate_name_across_kinds_rejected() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        let root = builder.root();
        root.field("user", text()).expect("valid field");
        let err = root
            .child_object("user", ObjectFieldType::new(ObjectStructure::Flattened))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_duplicate_template_name_rejected_at_build() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            root.field_template("t", "a_*", TemplateFieldType::Value(text()))
                .expect("valid template");
            root.field_template("t", "b_*", TemplateFieldType::Value(text()))
                .expect("valid template");
        }
        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateTemplate { ref name } if name == "t"
        ));
    }

    #[test]
    fn test_invalid_template_glob_rejected_at_build() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        builder
            .root()
            .field_template("bad", "a[", TemplateFieldType::Value(text()))
            .expect("declaration itself succeeds");
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidTemplateGlob { .. }));
    }

    #[test]
    fn test_references_carry_absolute_paths() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        let root = builder.root();
        assert!(root.as_reference().absolute_path().is_none());
        let user = root
            .child_object("user", ObjectFieldType::new(ObjectStructure::Flattened))
            .expect("valid object");
        assert_eq!(user.as_reference().absolute_path(), Some("user"));
        let name = user.field("name", text()).expect("valid field");
        assert_eq!(name.as_reference().absolute_path(), Some("user.name"));
    }

    #[test]
    fn test_scoped_template_pattern_is_prefixed() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            let user = root
                .child_object("user", ObjectFieldType::new(ObjectStructure::Flattened))
                .expect("valid object");
            user.field_template("user-attrs", "attr_*", TemplateFieldType::Value(text()))
                .expect("valid template");
        }
        let model = builder.build().expect("valid schema");
        let field = model
            .field_or_none("user.attr_color", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("template matches");
        assert_eq!(field.absolute_path(), "user.attr_color");
        // The scoped pattern does not leak to paths outside the scope.
        assert!(
            model
                .field_or_none("attr_color", FieldFilter::All)
                .expect("resolution succeeds")
                .is_none()
        );
    }

    #[test]
    fn test_template_inclusion_composes_with_declaring_scope() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            let hidden = root
                .child_object("hidden", ObjectFieldType::new(ObjectStructure::Flattened))
                .expect("valid object");
            hidden.excluded();
            hidden
                .field_template("hidden-attrs", "attr_*", TemplateFieldType::Value(text()))
                .expect("valid template");
        }
        let model = builder.build().expect("valid schema");
        let field = model
            .field_or_none("hidden.attr_a", FieldFilter::All)
            .expect("resolution succeeds")
            .expect("template matches");
        assert!(!field.inclusion().is_included());
        assert!(
            model
                .field_or_none("hidden.attr_a", FieldFilter::IncludedOnly)
                .expect("resolution succeeds")
                .is_none()
        );
    }

    #[test]
    fn test_projections_collected() {
        let mut builder = IndexSchemaBuilder::new("idx", "Doc");
        {
            let root = builder.root();
            let user = root
                .child_object("user", ObjectFieldType::new(ObjectStructure::Nested))
                .expect("valid object");
            user.projection(FieldProjection {
                absolute_path: "user".to_string(),
                multi_valued: true,
            });
        }
        let model = builder.build().expect("valid schema");
        assert_eq!(model.projections().len(), 1);
        assert_eq!(model.projections()[0].absolute_path, "user");
    }
}
