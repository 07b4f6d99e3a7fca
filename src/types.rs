//! Core types: schema nodes and identifier paths.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Type name that marks an ObjectId field in a schema definition.
pub const OBJECT_ID_TYPE: &str = "objectid";

/// Pattern that replaces `objectid` in derived JSON Schemas.
pub const OBJECT_ID_PATTERN: &str = "^[a-fA-F0-9]{24}$";

/// Segment text used for "every element of the array".
pub const WILDCARD: &str = "*";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Leaf types that carry no ObjectIds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Any,
}

impl PrimitiveType {
    /// Parse a primitive type name.
    ///
    /// Returns `None` for unknown names and for the structural types
    /// (`object`, `array`, `objectid`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "integer" => Some(PrimitiveType::Integer),
            "boolean" => Some(PrimitiveType::Boolean),
            "null" => Some(PrimitiveType::Null),
            "any" => Some(PrimitiveType::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
            PrimitiveType::Any => "any",
        }
    }
}

/// A named child of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: SchemaNode,
}

/// What a schema node describes. Decides which children exist.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `type: "object"`, properties in declaration order.
    Object(Vec<Property>),
    /// `type: "array"`, one schema for every element.
    Array(Box<SchemaNode>),
    /// `type: "objectid"`.
    ObjectId,
    /// Any other type, or a union of primitive types.
    Primitive(Vec<PrimitiveType>),
}

/// One node of a schema definition.
///
/// Keys other than `type`, `required`, `properties` and `items` are kept
/// in `keywords` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct SchemaNode {
    pub kind: NodeKind,
    /// Declared requiredness. `None` means nothing was declared.
    pub required: Option<bool>,
    pub keywords: Map<String, Value>,
}

impl SchemaNode {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            required: None,
            keywords: Map::new(),
        }
    }

    /// An object node with the given `(name, schema)` properties.
    pub fn object<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = (S, SchemaNode)>,
        S: Into<String>,
    {
        Self::with_kind(NodeKind::Object(
            properties
                .into_iter()
                .map(|(name, schema)| Property {
                    name: name.into(),
                    schema,
                })
                .collect(),
        ))
    }

    /// An array node whose elements all match `items`.
    pub fn array(items: SchemaNode) -> Self {
        Self::with_kind(NodeKind::Array(Box::new(items)))
    }

    /// An ObjectId leaf.
    pub fn object_id() -> Self {
        Self::with_kind(NodeKind::ObjectId)
    }

    /// A primitive leaf of a single type.
    pub fn primitive(kind: PrimitiveType) -> Self {
        Self::with_kind(NodeKind::Primitive(vec![kind]))
    }

    /// Set the declared requiredness.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Add a pass-through keyword such as `pattern` or `minimum`.
    pub fn keyword(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(key.into(), value.into());
        self
    }

    /// True when the node declares `required: true`.
    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }

    /// Build a node tree from a JSON definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if a node has no `type`, names an unknown type,
    /// or has malformed `required`, `properties` or `items`.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        parse_node(value, "#")
    }

    /// Render the node tree back to its JSON definition.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), self.type_value());

        match &self.kind {
            NodeKind::Object(properties) => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|p| (p.name.clone(), p.schema.to_value()))
                    .collect();
                map.insert("properties".to_string(), Value::Object(props));
            }
            NodeKind::Array(items) => {
                map.insert("items".to_string(), items.to_value());
            }
            NodeKind::ObjectId | NodeKind::Primitive(_) => {}
        }

        for (key, value) in &self.keywords {
            map.insert(key.clone(), value.clone());
        }
        if let Some(required) = self.required {
            map.insert("required".to_string(), Value::Bool(required));
        }

        Value::Object(map)
    }

    pub(crate) fn type_value(&self) -> Value {
        match &self.kind {
            NodeKind::Object(_) => Value::from("object"),
            NodeKind::Array(_) => Value::from("array"),
            NodeKind::ObjectId => Value::from(OBJECT_ID_TYPE),
            NodeKind::Primitive(types) if types.len() == 1 => Value::from(types[0].as_str()),
            NodeKind::Primitive(types) => {
                Value::Array(types.iter().map(|t| Value::from(t.as_str())).collect())
            }
        }
    }
}

impl TryFrom<Value> for SchemaNode {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        SchemaNode::from_value(&value)
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        node.to_value()
    }
}

/// One step of an identifier path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named object property.
    Property(String),
    /// Every element of an array.
    Wildcard,
}

impl PathSegment {
    pub fn as_str(&self) -> &str {
        match self {
            PathSegment::Property(name) => name,
            PathSegment::Wildcard => WILDCARD,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        if s == WILDCARD {
            PathSegment::Wildcard
        } else {
            PathSegment::Property(s.to_string())
        }
    }
}

/// Location of an ObjectId within a schema, relative to the document root.
///
/// Serializes as an array of strings with `"*"` for wildcards. `Display`
/// uses dotted notation (`participants.*.subarr.*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path: the document root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn prepend(mut self, segment: PathSegment) -> Self {
        self.0.insert(0, segment);
        self
    }
}

impl<S: AsRef<str>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|s| PathSegment::from(s.as_ref()))
                .collect(),
        )
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(PathSegment::as_str))
    }
}

// --- Definition parsing ---

fn parse_node(value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    let Some(map) = value.as_object() else {
        return Err(invalid(
            path,
            format!("expected object, got {}", json_type_name(value)),
        ));
    };

    let Some(type_value) = map.get("type") else {
        return Err(invalid(path, "missing \"type\""));
    };

    let required = match map.get("required") {
        None => None,
        Some(Value::Bool(required)) => Some(*required),
        Some(other) => {
            return Err(invalid(
                &format!("{}/required", path),
                format!("expected boolean, got {}", json_type_name(other)),
            ))
        }
    };

    let (kind, structural_key) = match type_value {
        Value::String(name) => match name.as_str() {
            "object" => (
                NodeKind::Object(parse_properties(map.get("properties"), path)?),
                Some("properties"),
            ),
            "array" => (
                NodeKind::Array(Box::new(parse_items(map.get("items"), path)?)),
                Some("items"),
            ),
            OBJECT_ID_TYPE => (NodeKind::ObjectId, None),
            other => (NodeKind::Primitive(vec![parse_primitive(other, path)?]), None),
        },
        Value::Array(names) => (NodeKind::Primitive(parse_type_union(names, path)?), None),
        other => {
            return Err(invalid(
                &format!("{}/type", path),
                format!("expected string or array, got {}", json_type_name(other)),
            ))
        }
    };

    let keywords = map
        .iter()
        .filter(|(key, _)| {
            let key = key.as_str();
            key != "type" && key != "required" && Some(key) != structural_key
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(SchemaNode {
        kind,
        required,
        keywords,
    })
}

fn parse_properties(value: Option<&Value>, path: &str) -> Result<Vec<Property>, SchemaError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let props_path = format!("{}/properties", path);
    let Some(props) = value.as_object() else {
        return Err(invalid(
            &props_path,
            format!("expected object, got {}", json_type_name(value)),
        ));
    };

    props
        .iter()
        .map(|(name, child)| {
            let child_path = format!("{}/{}", props_path, escape_pointer(name));
            Ok(Property {
                name: name.clone(),
                schema: parse_node(child, &child_path)?,
            })
        })
        .collect()
}

fn parse_items(value: Option<&Value>, path: &str) -> Result<SchemaNode, SchemaError> {
    match value {
        None => Err(SchemaError::MissingItems {
            path: path.to_string(),
        }),
        Some(Value::Array(_)) => Err(invalid(
            &format!("{}/items", path),
            "tuple-form items are not supported",
        )),
        Some(items) => parse_node(items, &format!("{}/items", path)),
    }
}

fn parse_primitive(name: &str, path: &str) -> Result<PrimitiveType, SchemaError> {
    PrimitiveType::parse(name).ok_or_else(|| SchemaError::UnknownType {
        path: path.to_string(),
        name: name.to_string(),
    })
}

fn parse_type_union(names: &[Value], path: &str) -> Result<Vec<PrimitiveType>, SchemaError> {
    let type_path = format!("{}/type", path);
    if names.is_empty() {
        return Err(invalid(&type_path, "type array is empty"));
    }

    names
        .iter()
        .map(|name| match name.as_str() {
            Some("object" | "array" | OBJECT_ID_TYPE) => Err(invalid(
                &type_path,
                "type arrays may only name primitive types",
            )),
            Some(name) => parse_primitive(name, path),
            None => Err(invalid(
                &type_path,
                format!("expected type name, got {}", json_type_name(name)),
            )),
        })
        .collect()
}

fn invalid(path: &str, message: impl Into<String>) -> SchemaError {
    SchemaError::InvalidDefinition {
        path: path.to_string(),
        message: message.into(),
    }
}

/// Escape a key for use in a JSON Pointer (~ as ~0, / as ~1).
pub(crate) fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
