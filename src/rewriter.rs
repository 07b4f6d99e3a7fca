//! Schema rewriting - derives plain JSON Schemas from ObjectId schemas.

use serde_json::{Map, Value};

use crate::fold::{fold, SchemaFold};
use crate::types::{NodeKind, PrimitiveType, Property, SchemaNode, OBJECT_ID_PATTERN};

/// Replace every `objectid` node with a hex-pattern string node.
///
/// The replacement keeps the source node's `required` flag and keywords.
/// Every other node is copied unchanged.
pub fn to_json_schema(schema: &SchemaNode) -> SchemaNode {
    fold(schema, &mut Rewrite { keep_required: true })
}

/// Copy of `schema` with every `required` flag cleared, at every level.
pub fn without_required(schema: &SchemaNode) -> SchemaNode {
    fold(schema, &mut Rewrite {
        keep_required: false,
    })
}

/// Dialect of a lowered schema.
const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// Lower a schema to standard JSON Schema for the validator.
///
/// Per-property `required: true` flags become a `required` array on the
/// enclosing object; boolean `required` keys are dropped. ObjectId nodes are
/// lowered the same way [`to_json_schema`] rewrites them. A root `$schema`
/// naming draft-03 is replaced with draft-04, the dialect of the result.
pub fn to_standard_schema(schema: &SchemaNode) -> Value {
    let mut lowered = fold(schema, &mut Lower);
    if let Some(map) = lowered.as_object_mut() {
        let declares_draft_03 = map
            .get("$schema")
            .and_then(Value::as_str)
            .is_some_and(|uri| uri.contains("draft-03"));
        if declares_draft_03 {
            map.insert("$schema".to_string(), Value::from(DRAFT_04));
        }
    }
    lowered
}

fn object_id_as_string(node: &SchemaNode) -> SchemaNode {
    let mut keywords = node.keywords.clone();
    keywords.insert(
        "pattern".to_string(),
        Value::String(OBJECT_ID_PATTERN.to_string()),
    );
    SchemaNode {
        kind: NodeKind::Primitive(vec![PrimitiveType::String]),
        required: node.required,
        keywords,
    }
}

struct Rewrite {
    keep_required: bool,
}

impl Rewrite {
    fn required(&self, node: &SchemaNode) -> Option<bool> {
        if self.keep_required {
            node.required
        } else {
            None
        }
    }
}

impl SchemaFold for Rewrite {
    type Output = SchemaNode;

    fn object_id(&mut self, node: &SchemaNode) -> SchemaNode {
        SchemaNode {
            required: self.required(node),
            ..object_id_as_string(node)
        }
    }

    fn primitive(&mut self, node: &SchemaNode, types: &[PrimitiveType]) -> SchemaNode {
        SchemaNode {
            kind: NodeKind::Primitive(types.to_vec()),
            required: self.required(node),
            keywords: node.keywords.clone(),
        }
    }

    fn object(&mut self, node: &SchemaNode, properties: Vec<(&str, SchemaNode)>) -> SchemaNode {
        SchemaNode {
            kind: NodeKind::Object(
                properties
                    .into_iter()
                    .map(|(name, schema)| Property {
                        name: name.to_string(),
                        schema,
                    })
                    .collect(),
            ),
            required: self.required(node),
            keywords: node.keywords.clone(),
        }
    }

    fn array(&mut self, node: &SchemaNode, items: SchemaNode) -> SchemaNode {
        SchemaNode {
            kind: NodeKind::Array(Box::new(items)),
            required: self.required(node),
            keywords: node.keywords.clone(),
        }
    }
}

struct Lower;

impl Lower {
    fn leaf(node: &SchemaNode) -> Value {
        let mut map = Map::new();
        // "any" is not a JSON Schema type; an absent type accepts everything.
        match &node.kind {
            NodeKind::Primitive(types) if types.contains(&PrimitiveType::Any) => {}
            _ => {
                map.insert("type".to_string(), node.type_value());
            }
        }
        extend_keywords(&mut map, node);
        Value::Object(map)
    }
}

fn extend_keywords(map: &mut Map<String, Value>, node: &SchemaNode) {
    for (key, value) in &node.keywords {
        map.insert(key.clone(), value.clone());
    }
}

impl SchemaFold for Lower {
    type Output = Value;

    fn object_id(&mut self, node: &SchemaNode) -> Value {
        Lower::leaf(&object_id_as_string(node))
    }

    fn primitive(&mut self, node: &SchemaNode, _types: &[PrimitiveType]) -> Value {
        Lower::leaf(node)
    }

    fn object(&mut self, node: &SchemaNode, properties: Vec<(&str, Value)>) -> Value {
        let required: Vec<Value> = match &node.kind {
            NodeKind::Object(declared) => declared
                .iter()
                .filter(|p| p.schema.is_required())
                .map(|p| Value::String(p.name.clone()))
                .collect(),
            _ => Vec::new(),
        };

        let mut map = Map::new();
        map.insert("type".to_string(), Value::from("object"));
        map.insert(
            "properties".to_string(),
            Value::Object(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
        );
        extend_keywords(&mut map, node);
        if !required.is_empty() {
            map.insert("required".to_string(), Value::Array(required));
        }
        Value::Object(map)
    }

    fn array(&mut self, node: &SchemaNode, items: Value) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::from("array"));
        map.insert("items".to_string(), items);
        extend_keywords(&mut map, node);
        Value::Object(map)
    }
}
