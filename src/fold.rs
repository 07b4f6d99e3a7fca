//! The one traversal every schema pass is built on.
//!
//! Children are folded before their parent: object properties in
//! declaration order, then the single `items` schema of an array. Each pass
//! only decides how to combine child results, so the path finder, the
//! rewriter and the document walker always agree on order and on what an
//! array level means.

use crate::types::{NodeKind, PrimitiveType, SchemaNode};

/// Per-kind callbacks for [`fold`].
pub(crate) trait SchemaFold {
    type Output;

    fn object_id(&mut self, node: &SchemaNode) -> Self::Output;

    fn primitive(&mut self, node: &SchemaNode, types: &[PrimitiveType]) -> Self::Output;

    /// `properties` holds one folded result per declared property, in order.
    fn object(&mut self, node: &SchemaNode, properties: Vec<(&str, Self::Output)>)
        -> Self::Output;

    fn array(&mut self, node: &SchemaNode, items: Self::Output) -> Self::Output;
}

/// Fold `node` bottom-up with `folder`.
pub(crate) fn fold<F: SchemaFold>(node: &SchemaNode, folder: &mut F) -> F::Output {
    match &node.kind {
        NodeKind::ObjectId => folder.object_id(node),
        NodeKind::Primitive(types) => folder.primitive(node, types),
        NodeKind::Object(properties) => {
            let folded = properties
                .iter()
                .map(|p| (p.name.as_str(), fold(&p.schema, folder)))
                .collect();
            folder.object(node, folded)
        }
        NodeKind::Array(items) => {
            let folded = fold(items, folder);
            folder.array(node, folded)
        }
    }
}
