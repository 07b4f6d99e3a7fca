//! Data documents that may hold native ObjectIds.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

use crate::object_id::ObjectId;

/// Key of the Extended JSON form of an ObjectId, `{"$oid": "<hex>"}`.
pub const OID_KEY: &str = "$oid";

/// A JSON-like document tree with a native ObjectId leaf.
///
/// Plain hex strings stay strings until
/// [`Schema::strings_to_ids`](crate::Schema::strings_to_ids) converts them at
/// schema-declared locations. Native ObjectIds are read from and written as
/// Extended JSON `{"$oid": "<hex>"}`. Object keys keep their input order.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    ObjectId(ObjectId),
    Array(Vec<Document>),
    Object(IndexMap<String, Document>),
}

impl Document {
    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::ObjectId(_) => "objectid",
            Document::Array(_) => "array",
            Document::Object(_) => "object",
        }
    }

    /// Look up a key on an object document.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Document::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render as plain JSON, ObjectIds as lowercase hex strings.
    ///
    /// This is the view the validator checks. It does not round-trip: use
    /// `Value::from` for the Extended JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Number(n) => Value::Number(n.clone()),
            Document::String(s) => Value::String(s.clone()),
            Document::ObjectId(id) => Value::String(id.to_hex()),
            Document::Array(items) => Value::Array(items.iter().map(Document::to_json).collect()),
            Document::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// The id held by an Extended JSON `{"$oid": "<hex>"}` object, if `map` is one.
fn extended_object_id(map: &Map<String, Value>) -> Option<ObjectId> {
    if map.len() != 1 {
        return None;
    }
    map.get(OID_KEY)?.as_str()?.parse().ok()
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Bool(b) => serializer.serialize_bool(*b),
            Document::Number(n) => n.serialize(serializer),
            Document::String(s) => serializer.serialize_str(s),
            Document::ObjectId(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(OID_KEY, id)?;
                map.end()
            }
            Document::Array(items) => serializer.collect_seq(items),
            Document::Object(map) => serializer.collect_map(map),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => Document::Number(n),
            Value::String(s) => Document::String(s),
            Value::Array(items) => Document::Array(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => match extended_object_id(&map) {
                Some(id) => Document::ObjectId(id),
                None => Document::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, Document::from(value)))
                        .collect(),
                ),
            },
        }
    }
}

impl From<&Document> for Value {
    fn from(doc: &Document) -> Self {
        match doc {
            Document::ObjectId(id) => {
                let mut map = Map::new();
                map.insert(OID_KEY.to_string(), Value::String(id.to_hex()));
                Value::Object(map)
            }
            Document::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Document::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
            scalar => scalar.to_json(),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::from(&doc)
    }
}

impl From<ObjectId> for Document {
    fn from(id: ObjectId) -> Self {
        Document::ObjectId(id)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.to_string())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Document::String(s)
    }
}

impl<const N: usize> From<[(&str, Document); N]> for Document {
    fn from(entries: [(&str, Document); N]) -> Self {
        Document::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Document::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HEX: &str = "52f044dee2896a8264d7ec2f";

    #[test]
    fn from_json_keeps_hex_strings_as_strings() {
        let doc = Document::from(json!({ "_id": HEX, "count": 42 }));
        assert_eq!(doc.get("_id"), Some(&Document::String(HEX.to_string())));
        assert_eq!(doc.get("count").map(Document::type_name), Some("number"));
    }

    #[test]
    fn from_json_reads_extended_object_ids() {
        let doc = Document::from(json!({ "_id": { "$oid": HEX.to_uppercase() } }));
        assert_eq!(doc.get("_id"), Some(&Document::ObjectId(ObjectId::parse_str(HEX).unwrap())));
    }

    #[test]
    fn near_extended_objects_stay_objects() {
        let bad_hex = Document::from(json!({ "$oid": "nope" }));
        assert_eq!(bad_hex.type_name(), "object");

        let extra_key = Document::from(json!({ "$oid": HEX, "other": 1 }));
        assert_eq!(extra_key.get("$oid"), Some(&Document::from(HEX)));
    }

    #[test]
    fn to_json_renders_object_ids_as_hex() {
        let id = ObjectId::parse_str(HEX).unwrap();
        let doc = Document::from([
            ("_id", Document::from(id)),
            ("tags", Document::from(vec![Document::from("a"), Document::Null])),
        ]);
        assert_eq!(doc.to_json(), json!({ "_id": HEX, "tags": ["a", null] }));
    }

    #[test]
    fn serializes_object_ids_as_extended_json() {
        let id = ObjectId::parse_str(HEX).unwrap();
        let doc = Document::from([("_id", Document::from(id)), ("n", Document::from(json!(1)))]);
        let expected = json!({ "_id": { "$oid": HEX }, "n": 1 });
        assert_eq!(serde_json::to_value(&doc).unwrap(), expected);
        assert_eq!(Value::from(&doc), expected);
        assert_eq!(Document::from(expected), doc);
    }

    #[test]
    fn keeps_key_order() {
        let doc = Document::from(json!({ "b": 1, "a": { "z": true, "y": null } }));
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"b":1,"a":{"z":true,"y":null}}"#
        );
        assert_eq!(doc.to_json().to_string(), r#"{"b":1,"a":{"z":true,"y":null}}"#);
    }

    #[test]
    fn accessors() {
        let id = ObjectId::parse_str(HEX).unwrap();
        assert_eq!(Document::from(id).as_object_id(), Some(id));
        assert_eq!(Document::from("x").as_str(), Some("x"));
        assert_eq!(Document::Null.as_object_id(), None);
        assert_eq!(Document::Null.get("x"), None);
        assert_eq!(Document::from(id).type_name(), "objectid");
    }
}
