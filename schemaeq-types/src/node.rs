use crate::object::ObjectSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Value type of a schema attribute.
///
/// Primitive kinds describe a single value; collection kinds (`list`, `set`, `map`) wrap an
/// [`Element`] describing their members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    List,
    Set,
    Map,
}

impl ValueKind {
    pub fn is_collection(self) -> bool {
        matches!(self, ValueKind::List | ValueKind::Set | ValueKind::Map)
    }

    pub fn is_primitive(self) -> bool {
        !self.is_collection()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a callback attached to an attribute (e.g. `"validation.StringLenBetween(1, 64)"`).
///
/// Callbacks cannot be compared meaningfully, so they only ever appear as opaque labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackRef(pub String);

impl CallbackRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallbackRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Behavioural hooks attached to an attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Callbacks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<CallbackRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_diag: Option<CallbackRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_suppress: Option<CallbackRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<CallbackRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_func: Option<CallbackRef>,
}

impl Callbacks {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// How an attribute is written in configuration (nested block or attribute syntax).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigMode {
    #[default]
    Auto,
    Block,
    Attr,
}

impl ConfigMode {
    pub fn is_auto(&self) -> bool {
        matches!(self, ConfigMode::Auto)
    }
}

/// Member description of a collection attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Homogeneous collection of primitives or nested collections.
    Node(Box<SchemaNode>),
    /// Collection of structured records.
    Object(ObjectSchema),
}

impl Element {
    pub fn node(node: SchemaNode) -> Self {
        Element::Node(Box::new(node))
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Element::Object(schema)
    }

    pub fn as_node(&self) -> Option<&SchemaNode> {
        match self {
            Element::Node(node) => Some(node),
            Element::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Element::Node(_) => None,
            Element::Object(schema) => Some(schema),
        }
    }
}

/// Violation of the element/kind pairing on a single node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{kind} attribute has no element schema")]
    MissingElement { kind: ValueKind },

    #[error("{kind} attribute must not carry an element schema")]
    UnexpectedElement { kind: ValueKind },
}

/// One configuration attribute.
///
/// The first block of fields is structural and takes part in equivalence. Everything after
/// `element` is behaviour or documentation and is reset by normalization; those fields are
/// omitted from serialized output while at their zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: ValueKind,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub computed: bool,

    #[serde(default)]
    pub force_new: bool,

    #[serde(default, rename = "elem", skip_serializing_if = "Option::is_none")]
    pub element: Option<Element>,

    #[serde(default, skip_serializing_if = "Callbacks::is_empty")]
    pub callbacks: Callbacks,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub input_default: String,

    #[serde(default, skip_serializing_if = "ConfigMode::is_auto")]
    pub config_mode: ConfigMode,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub min_items: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_items: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exactly_one_of: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub at_least_one_of: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_with: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deprecated: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub sensitive: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub computed_when: Vec<String>,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl SchemaNode {
    /// A bare attribute of the given kind with every flag unset.
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            element: None,
            callbacks: Callbacks::default(),
            default: None,
            description: String::new(),
            input_default: String::new(),
            config_mode: ConfigMode::Auto,
            min_items: 0,
            max_items: 0,
            conflicts_with: Vec::new(),
            exactly_one_of: Vec::new(),
            at_least_one_of: Vec::new(),
            required_with: Vec::new(),
            deprecated: String::new(),
            sensitive: false,
            computed_when: Vec::new(),
        }
    }

    pub fn bool() -> Self {
        Self::new(ValueKind::Bool)
    }

    pub fn int() -> Self {
        Self::new(ValueKind::Int)
    }

    pub fn float() -> Self {
        Self::new(ValueKind::Float)
    }

    pub fn string() -> Self {
        Self::new(ValueKind::String)
    }

    pub fn list_of(element: Element) -> Self {
        Self::new(ValueKind::List).with_element(element)
    }

    pub fn set_of(element: Element) -> Self {
        Self::new(ValueKind::Set).with_element(element)
    }

    pub fn map_of(element: Element) -> Self {
        Self::new(ValueKind::Map).with_element(element)
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = message.into();
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_item_bounds(mut self, min_items: u64, max_items: u64) -> Self {
        self.min_items = min_items;
        self.max_items = max_items;
        self
    }

    pub fn with_validate(mut self, name: impl Into<String>) -> Self {
        self.callbacks.validate = Some(CallbackRef::new(name));
        self
    }

    pub fn with_validate_diag(mut self, name: impl Into<String>) -> Self {
        self.callbacks.validate_diag = Some(CallbackRef::new(name));
        self
    }

    pub fn with_diff_suppress(mut self, name: impl Into<String>) -> Self {
        self.callbacks.diff_suppress = Some(CallbackRef::new(name));
        self
    }

    pub fn with_state_func(mut self, name: impl Into<String>) -> Self {
        self.callbacks.state = Some(CallbackRef::new(name));
        self
    }

    pub fn with_default_func(mut self, name: impl Into<String>) -> Self {
        self.callbacks.default_func = Some(CallbackRef::new(name));
        self
    }

    /// Nested object schema, if this is a collection of records.
    pub fn object_element(&self) -> Option<&ObjectSchema> {
        self.element.as_ref().and_then(Element::as_object)
    }

    /// Check that `element` is present exactly when `kind` is a collection.
    ///
    /// Only this node is inspected; nested elements are not visited.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        match (self.kind.is_collection(), self.element.is_some()) {
            (true, false) => Err(ShapeError::MissingElement { kind: self.kind }),
            (false, true) => Err(ShapeError::UnexpectedElement { kind: self.kind }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_kinds_are_classified() {
        assert!(ValueKind::List.is_collection());
        assert!(ValueKind::Set.is_collection());
        assert!(ValueKind::Map.is_collection());
        assert!(ValueKind::Int.is_primitive());
        assert!(ValueKind::String.is_primitive());
    }

    #[test]
    fn check_shape_rejects_collection_without_element() {
        let node = SchemaNode::new(ValueKind::List);
        assert_eq!(
            node.check_shape(),
            Err(ShapeError::MissingElement {
                kind: ValueKind::List
            })
        );
    }

    #[test]
    fn check_shape_rejects_primitive_with_element() {
        let node = SchemaNode::int().with_element(Element::node(SchemaNode::int()));
        let err = node.check_shape().expect_err("primitive with element");
        assert_eq!(err.to_string(), "int attribute must not carry an element schema");
    }

    #[test]
    fn check_shape_accepts_well_formed_nodes() {
        assert!(SchemaNode::string().check_shape().is_ok());
        assert!(
            SchemaNode::set_of(Element::node(SchemaNode::string()))
                .check_shape()
                .is_ok()
        );
    }

    #[test]
    fn callbacks_is_empty_tracks_any_set_hook() {
        let mut callbacks = Callbacks::default();
        assert!(callbacks.is_empty());
        callbacks.state = Some("strings.ToLower".into());
        assert!(!callbacks.is_empty());
    }
}
