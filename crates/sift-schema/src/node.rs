//! The static schema tree: root, object fields, and value fields.
//!
//! Nodes are immutable once constructed. Every derived attribute (absolute
//! path, composed inclusion, nested-path hierarchy, multi-valued ancestry) is
//! computed exactly once at construction from the parent's already-known data,
//! so the tree carries no upward references and no cycles.

use std::{collections::HashMap, sync::Arc};

use crate::{
    error::SchemaError,
    inclusion::FieldInclusion,
    path,
    types::{ObjectFieldType, ValueFieldType},
};

/// A field in the schema tree: either a composite object or a leaf value.
#[derive(Debug)]
pub enum IndexField {
    /// A composite field owning child fields.
    Object(ObjectField),
    /// A leaf field holding values of a single type.
    Value(ValueField),
}

impl IndexField {
    /// Returns the data shared by both field kinds.
    fn core(&self) -> &FieldCore {
        match self {
            IndexField::Object(field) => &field.core,
            IndexField::Value(field) => &field.core,
        }
    }

    /// Full dot-composed path from the root.
    pub fn absolute_path(&self) -> &str {
        &self.core().absolute_path
    }

    /// The absolute path split into components, cached at construction.
    pub fn absolute_path_components(&self) -> &[String] {
        &self.core().absolute_path_components
    }

    /// The field's own name within its parent.
    pub fn relative_name(&self) -> &str {
        &self.core().relative_name
    }

    /// Whether this field is present in the schema or pruned by a filter.
    pub fn inclusion(&self) -> FieldInclusion {
        self.core().inclusion
    }

    /// Whether this single field holds multiple values.
    pub fn multi_valued(&self) -> bool {
        self.core().multi_valued
    }

    /// True when this field or any ancestor up to the root is multi-valued.
    ///
    /// Answers whether there can be more than one instance of this field's
    /// enclosing context.
    pub fn multi_valued_in_root(&self) -> bool {
        self.core().multi_valued_in_root
    }

    /// Absolute path of the nearest multi-valued ancestor (including the
    /// direct parent), or `None` when all ancestors are single-valued.
    pub fn closest_multi_valued_parent_path(&self) -> Option<&str> {
        self.core().closest_multi_valued_parent_path.as_deref()
    }

    /// Absolute paths of all ancestor nested object fields, innermost last.
    ///
    /// For object fields this includes the field itself when its own type is
    /// nested; for value fields it is the parent's hierarchy.
    pub fn nested_path_hierarchy(&self) -> &[String] {
        match self {
            IndexField::Object(field) => &field.nested_path_hierarchy,
            IndexField::Value(field) => &field.nested_path_hierarchy,
        }
    }

    /// Human-readable kind label used in diagnostics.
    fn kind_label(&self) -> &'static str {
        match self {
            IndexField::Object(_) => "an object field",
            IndexField::Value(_) => "a value field",
        }
    }

    /// Returns the object field, or `None` for a value field.
    pub fn as_object(&self) -> Option<&ObjectField> {
        match self {
            IndexField::Object(field) => Some(field),
            IndexField::Value(_) => None,
        }
    }

    /// Returns the value field, or `None` for an object field.
    pub fn as_value(&self) -> Option<&ValueField> {
        match self {
            IndexField::Object(_) => None,
            IndexField::Value(field) => Some(field),
        }
    }

    /// Returns the object field, failing descriptively for a value field.
    pub fn to_object(&self) -> Result<&ObjectField, SchemaError> {
        self.as_object().ok_or_else(|| SchemaError::FieldKindMismatch {
            path: self.absolute_path().to_string(),
            expected: "an object field",
            actual: self.kind_label(),
        })
    }

    /// Returns the value field, failing descriptively for an object field.
    pub fn to_value(&self) -> Result<&ValueField, SchemaError> {
        self.as_value().ok_or_else(|| SchemaError::FieldKindMismatch {
            path: self.absolute_path().to_string(),
            expected: "a value field",
            actual: self.kind_label(),
        })
    }

    /// Returns a composite view of this field, failing for a value field.
    pub fn to_composite(&self) -> Result<IndexComposite<'_>, SchemaError> {
        match self {
            IndexField::Object(field) => Ok(IndexComposite::Object(field)),
            IndexField::Value(_) => Err(SchemaError::FieldKindMismatch {
                path: self.absolute_path().to_string(),
                expected: "a composite",
                actual: self.kind_label(),
            }),
        }
    }
}

/// Data shared by both field kinds, derived once at construction.
#[derive(Debug)]
struct FieldCore {
    /// Full dot-composed path from the root.
    absolute_path: String,
    /// `absolute_path` split into components, cached for repeated traversal.
    absolute_path_components: Vec<String>,
    /// The field's own name within its parent.
    relative_name: String,
    /// Inclusion composed with every ancestor's inclusion.
    inclusion: FieldInclusion,
    /// Whether this single field holds multiple values.
    multi_valued: bool,
    /// True when this field or any ancestor is multi-valued.
    multi_valued_in_root: bool,
    /// Absolute path of the nearest multi-valued ancestor, if any.
    closest_multi_valued_parent_path: Option<String>,
}

impl FieldCore {
    /// Derives the shared field data from the parent's context.
    fn new(
        parent: &ParentContext,
        relative_name: &str,
        declared_inclusion: FieldInclusion,
        multi_valued: bool,
    ) -> Self {
        let absolute_path = path::compose(parent.absolute_path.as_deref(), relative_name);
        Self {
            absolute_path_components: path::split(&absolute_path),
            absolute_path,
            relative_name: relative_name.to_string(),
            inclusion: parent.inclusion.compose(declared_inclusion),
            multi_valued,
            multi_valued_in_root: parent.multi_valued_in_root || multi_valued,
            closest_multi_valued_parent_path: parent.child_multi_valued_path.clone(),
        }
    }
}

/// A leaf field holding one or more values of a single type.
#[derive(Debug)]
pub struct ValueField {
    /// Data shared by both field kinds.
    core: FieldCore,
    /// Nested-object ancestry inherited from the parent composite.
    nested_path_hierarchy: Vec<String>,
    /// Backend type descriptor.
    field_type: ValueFieldType,
}

impl ValueField {
    /// Constructs a value field under the given parent context.
    pub(crate) fn new(
        parent: &ParentContext,
        relative_name: &str,
        field_type: ValueFieldType,
        declared_inclusion: FieldInclusion,
        multi_valued: bool,
    ) -> Self {
        Self {
            core: FieldCore::new(parent, relative_name, declared_inclusion, multi_valued),
            nested_path_hierarchy: parent.nested_path_hierarchy.clone(),
            field_type,
        }
    }

    /// Returns the backend type descriptor.
    pub fn field_type(&self) -> &ValueFieldType {
        &self.field_type
    }

    /// Full dot-composed path from the root.
    pub fn absolute_path(&self) -> &str {
        &self.core.absolute_path
    }
}

/// A composite field owning statically declared children.
#[derive(Debug)]
pub struct ObjectField {
    /// Data shared by both field kinds.
    core: FieldCore,
    /// Ancestor nested paths, including this field when its type is nested.
    nested_path_hierarchy: Vec<String>,
    /// Backend type descriptor.
    field_type: ObjectFieldType,
    /// Statically declared children by relative name, immutable after build.
    children: HashMap<String, Arc<IndexField>>,
}

impl ObjectField {
    /// Constructs an object field under the given parent context.
    ///
    /// The children must already be constructed: the builder works bottom-up,
    /// supplying each child the parent's derived context without needing the
    /// parent node itself.
    pub(crate) fn new(
        parent: &ParentContext,
        relative_name: &str,
        field_type: ObjectFieldType,
        declared_inclusion: FieldInclusion,
        multi_valued: bool,
        children: HashMap<String, Arc<IndexField>>,
    ) -> Self {
        let core = FieldCore::new(parent, relative_name, declared_inclusion, multi_valued);
        let mut nested_path_hierarchy = parent.nested_path_hierarchy.clone();
        if field_type.nested() {
            nested_path_hierarchy.push(core.absolute_path.clone());
        }
        Self {
            core,
            nested_path_hierarchy,
            field_type,
            children,
        }
    }

    /// Returns the backend type descriptor.
    pub fn field_type(&self) -> &ObjectFieldType {
        &self.field_type
    }

    /// Full dot-composed path from the root.
    pub fn absolute_path(&self) -> &str {
        &self.core.absolute_path
    }

    /// Statically declared children by relative name.
    pub fn static_children(&self) -> &HashMap<String, Arc<IndexField>> {
        &self.children
    }

    /// The context this field supplies to its children.
    pub(crate) fn parent_context(&self) -> ParentContext {
        ParentContext {
            absolute_path: Some(self.core.absolute_path.clone()),
            inclusion: self.core.inclusion,
            nested_path_hierarchy: self.nested_path_hierarchy.clone(),
            multi_valued_in_root: self.core.multi_valued_in_root,
            child_multi_valued_path: if self.core.multi_valued {
                Some(self.core.absolute_path.clone())
            } else {
                self.core.closest_multi_valued_parent_path.clone()
            },
        }
    }
}

/// The schema root: a degenerate composite with no parent.
///
/// Its absolute path is `None`, it is always included, and it is never
/// multi-valued.
#[derive(Debug, Default)]
pub struct IndexRoot {
    /// Statically declared top-level fields by relative name.
    children: HashMap<String, Arc<IndexField>>,
}

impl IndexRoot {
    /// Creates a root owning the given top-level fields.
    pub(crate) fn new(children: HashMap<String, Arc<IndexField>>) -> Self {
        Self { children }
    }

    /// Statically declared top-level fields by relative name.
    pub fn static_children(&self) -> &HashMap<String, Arc<IndexField>> {
        &self.children
    }
}

/// Borrowed view over a composite node: the root or an object field.
#[derive(Debug, Clone, Copy)]
pub enum IndexComposite<'a> {
    /// The schema root.
    Root(&'a IndexRoot),
    /// An object field.
    Object(&'a ObjectField),
}

/// Empty hierarchy returned for the root.
const EMPTY_HIERARCHY: &[String] = &[];

impl<'a> IndexComposite<'a> {
    /// Absolute path of this composite; `None` for the root.
    pub fn absolute_path(&self) -> Option<&str> {
        match self {
            IndexComposite::Root(_) => None,
            IndexComposite::Object(field) => Some(field.absolute_path()),
        }
    }

    /// Absolute path of a child with the given relative name.
    pub fn absolute_path_of(&self, relative_name: &str) -> String {
        path::compose(self.absolute_path(), relative_name)
    }

    /// Composed inclusion of this composite; the root is always included.
    pub fn inclusion(&self) -> FieldInclusion {
        match self {
            IndexComposite::Root(_) => FieldInclusion::Included,
            IndexComposite::Object(field) => field.core.inclusion,
        }
    }

    /// Nested-object ancestry of this composite; empty for the root.
    pub fn nested_path_hierarchy(&self) -> &[String] {
        match self {
            IndexComposite::Root(_) => EMPTY_HIERARCHY,
            IndexComposite::Object(field) => &field.nested_path_hierarchy,
        }
    }

    /// True when any level of this composite's context is multi-valued.
    pub fn multi_valued_in_root(&self) -> bool {
        match self {
            IndexComposite::Root(_) => false,
            IndexComposite::Object(field) => field.core.multi_valued_in_root,
        }
    }

    /// Statically declared children of this composite.
    pub fn static_children(&self) -> &HashMap<String, Arc<IndexField>> {
        match self {
            IndexComposite::Root(root) => root.static_children(),
            IndexComposite::Object(field) => field.static_children(),
        }
    }

    /// The context this composite supplies to newly created children.
    pub(crate) fn parent_context(&self) -> ParentContext {
        match self {
            IndexComposite::Root(_) => ParentContext::root(),
            IndexComposite::Object(field) => field.parent_context(),
        }
    }
}

/// Derived data a parent composite supplies to its children at construction.
///
/// The builder computes one of these per scope before any child node exists,
/// which replaces the original two-phase construct-then-populate protocol.
#[derive(Debug, Clone)]
pub(crate) struct ParentContext {
    /// Absolute path of the parent; `None` for the root.
    pub(crate) absolute_path: Option<String>,
    /// Composed inclusion of the parent.
    pub(crate) inclusion: FieldInclusion,
    /// Nested-object ancestry of the parent.
    pub(crate) nested_path_hierarchy: Vec<String>,
    /// True when any level of the parent's context is multi-valued.
    pub(crate) multi_valued_in_root: bool,
    /// Nearest multi-valued ancestor path as seen by the children.
    pub(crate) child_multi_valued_path: Option<String>,
}

impl ParentContext {
    /// The context supplied by the schema root.
    pub(crate) fn root() -> Self {
        Self {
            absolute_path: None,
            inclusion: FieldInclusion::Included,
            nested_path_hierarchy: Vec::new(),
            multi_valued_in_root: false,
            child_multi_valued_path: None,
        }
    }

    /// Derives the context a child object scope supplies to its own children.
    pub(crate) fn child_scope(
        &self,
        relative_name: &str,
        field_type: &ObjectFieldType,
        declared_inclusion: FieldInclusion,
        multi_valued: bool,
    ) -> Self {
        let absolute_path = path::compose(self.absolute_path.as_deref(), relative_name);
        let mut nested_path_hierarchy = self.nested_path_hierarchy.clone();
        if field_type.nested() {
            nested_path_hierarchy.push(absolute_path.clone());
        }
        Self {
            inclusion: self.inclusion.compose(declared_inclusion),
            nested_path_hierarchy,
            multi_valued_in_root: self.multi_valued_in_root || multi_valued,
            child_multi_valued_path: if multi_valued {
                Some(absolute_path.clone())
            } else {
                self.child_multi_valued_path.clone()
            },
            absolute_path: Some(absolute_path),
        }
    }
}
