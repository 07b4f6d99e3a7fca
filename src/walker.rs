//! Document walker - converts ObjectId fields in lockstep with the schema.

use std::convert::Infallible;

use tracing::trace;

use crate::document::Document;
use crate::error::ConvertError;
use crate::fold::{fold, SchemaFold};
use crate::object_id::ObjectId;
use crate::types::{escape_pointer, PrimitiveType, SchemaNode};

/// Replace native ObjectIds with their hex strings wherever `schema`
/// declares an ObjectId. Anything else at those locations is kept.
pub fn ids_to_strings(schema: &SchemaNode, doc: &Document) -> Document {
    let layout = fold(schema, &mut LayoutBuilder);
    let mut pointer = Vec::new();
    walk(&layout, doc, &mut pointer, &|value: &Document, _: &str| {
        Ok::<_, Infallible>(match value {
            Document::ObjectId(id) => Document::String(id.to_hex()),
            other => other.clone(),
        })
    })
    .unwrap_or_else(|never| match never {})
}

/// Replace hex strings with native ObjectIds wherever `schema` declares an
/// ObjectId. ObjectIds and nulls at those locations are kept.
///
/// # Errors
///
/// Returns `ConvertError` for any other value at an ObjectId location,
/// including strings that are not 24 hex characters.
pub fn strings_to_ids(schema: &SchemaNode, doc: &Document) -> Result<Document, ConvertError> {
    let layout = fold(schema, &mut LayoutBuilder);
    let mut pointer = Vec::new();
    walk(&layout, doc, &mut pointer, &|value: &Document, path: &str| match value {
        Document::String(s) => ObjectId::parse_str(s)
            .map(Document::ObjectId)
            .map_err(|source| ConvertError::InvalidObjectId {
                path: path.to_string(),
                value: s.clone(),
                source,
            }),
        Document::ObjectId(_) | Document::Null => Ok(value.clone()),
        other => Err(ConvertError::UnexpectedType {
            path: path.to_string(),
            actual: other.type_name().to_string(),
        }),
    })
}

/// The parts of a schema the walker has to descend into.
///
/// Subtrees without ObjectIds collapse to `Copy`, so their data is cloned
/// without being inspected.
#[derive(Debug, PartialEq)]
enum Layout {
    Copy,
    ObjectId,
    Object(Vec<(String, Layout)>),
    Array(Box<Layout>),
}

struct LayoutBuilder;

impl SchemaFold for LayoutBuilder {
    type Output = Layout;

    fn object_id(&mut self, _node: &SchemaNode) -> Layout {
        Layout::ObjectId
    }

    fn primitive(&mut self, _node: &SchemaNode, _types: &[PrimitiveType]) -> Layout {
        Layout::Copy
    }

    fn object(&mut self, _node: &SchemaNode, properties: Vec<(&str, Layout)>) -> Layout {
        let properties: Vec<(String, Layout)> = properties
            .into_iter()
            .filter(|(_, layout)| *layout != Layout::Copy)
            .map(|(name, layout)| (name.to_string(), layout))
            .collect();
        if properties.is_empty() {
            Layout::Copy
        } else {
            Layout::Object(properties)
        }
    }

    fn array(&mut self, _node: &SchemaNode, items: Layout) -> Layout {
        match items {
            Layout::Copy => Layout::Copy,
            items => Layout::Array(Box::new(items)),
        }
    }
}

fn walk<E, F>(
    layout: &Layout,
    doc: &Document,
    pointer: &mut Vec<String>,
    convert: &F,
) -> Result<Document, E>
where
    F: Fn(&Document, &str) -> Result<Document, E>,
{
    match (layout, doc) {
        (Layout::Copy, _) => Ok(doc.clone()),
        (Layout::ObjectId, value) => {
            let path = render_pointer(pointer);
            trace!(path = %path, "converting identifier");
            convert(value, &path)
        }
        (Layout::Object(properties), Document::Object(map)) => {
            let mut result = map.clone();
            for (name, child) in properties {
                // Properties missing from the data stay missing.
                let Some(value) = map.get(name) else {
                    continue;
                };
                pointer.push(escape_pointer(name));
                let converted = walk(child, value, pointer, convert);
                pointer.pop();
                result.insert(name.clone(), converted?);
            }
            Ok(Document::Object(result))
        }
        (Layout::Array(items), Document::Array(values)) => {
            let mut result = Vec::with_capacity(values.len());
            for (i, value) in values.iter().enumerate() {
                pointer.push(i.to_string());
                let converted = walk(items, value, pointer, convert);
                pointer.pop();
                result.push(converted?);
            }
            Ok(Document::Array(result))
        }
        // Data shaped differently from the schema passes through.
        (Layout::Object(_) | Layout::Array(_), other) => Ok(other.clone()),
    }
}

fn render_pointer(pointer: &[String]) -> String {
    pointer.iter().map(|segment| format!("/{}", segment)).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn schema() -> SchemaNode {
        SchemaNode::object([
            ("_id", SchemaNode::object_id().required(true)),
            ("label", SchemaNode::primitive(PrimitiveType::String)),
            (
                "groups",
                SchemaNode::array(SchemaNode::object([
                    ("owner", SchemaNode::object_id()),
                    ("members", SchemaNode::array(SchemaNode::object_id())),
                ])),
            ),
        ])
    }

    fn object_id() -> impl Strategy<Value = ObjectId> {
        any::<[u8; 12]>().prop_map(ObjectId::from_bytes)
    }

    /// Documents shaped like `schema()` with native ObjectIds.
    fn native_document() -> impl Strategy<Value = Document> {
        let group = (object_id(), prop::collection::vec(object_id(), 0..4)).prop_map(
            |(owner, members)| {
                Document::from([
                    ("owner", Document::from(owner)),
                    (
                        "members",
                        Document::Array(members.into_iter().map(Document::from).collect()),
                    ),
                ])
            },
        );
        (
            object_id(),
            "[a-zA-Z0-9 ]{0,24}",
            prop::collection::vec(group, 0..4),
        )
            .prop_map(|(id, label, groups)| {
                Document::from([
                    ("_id", Document::from(id)),
                    ("label", Document::from(label)),
                    ("groups", Document::Array(groups)),
                ])
            })
    }

    proptest! {
        /// ids -> strings -> ids is the identity.
        #[test]
        fn ids_round_trip(doc in native_document()) {
            let strings = ids_to_strings(&schema(), &doc);
            let back = strings_to_ids(&schema(), &strings).unwrap();
            prop_assert_eq!(back, doc);
        }

        /// strings -> ids -> strings is the identity for lowercase hex.
        #[test]
        fn strings_round_trip(doc in native_document()) {
            let strings = ids_to_strings(&schema(), &doc);
            let ids = strings_to_ids(&schema(), &strings).unwrap();
            prop_assert_eq!(ids_to_strings(&schema(), &ids), strings);
        }

        /// Label strings are never touched, even when they look like ids.
        #[test]
        fn non_identifier_fields_untouched(doc in native_document()) {
            let strings = ids_to_strings(&schema(), &doc);
            prop_assert_eq!(strings.get("label"), doc.get("label"));
        }
    }
}
