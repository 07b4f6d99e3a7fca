//! Path finder - lists where a schema declares ObjectIds.

use crate::fold::{fold, SchemaFold};
use crate::types::{Path, PathSegment, PrimitiveType, SchemaNode};

/// Every path at which `schema` declares an ObjectId.
///
/// Paths are relative to `schema` and ordered depth-first by property
/// declaration order. An array contributes one wildcard segment per level,
/// and only when its items hold an ObjectId somewhere.
pub fn object_id_paths(schema: &SchemaNode) -> Vec<Path> {
    fold(schema, &mut PathCollector)
}

struct PathCollector;

impl SchemaFold for PathCollector {
    type Output = Vec<Path>;

    fn object_id(&mut self, _node: &SchemaNode) -> Vec<Path> {
        vec![Path::root()]
    }

    fn primitive(&mut self, _node: &SchemaNode, _types: &[PrimitiveType]) -> Vec<Path> {
        Vec::new()
    }

    fn object(&mut self, _node: &SchemaNode, properties: Vec<(&str, Vec<Path>)>) -> Vec<Path> {
        properties
            .into_iter()
            .flat_map(|(name, paths)| {
                paths
                    .into_iter()
                    .map(move |path| path.prepend(PathSegment::Property(name.to_string())))
            })
            .collect()
    }

    fn array(&mut self, _node: &SchemaNode, items: Vec<Path>) -> Vec<Path> {
        items
            .into_iter()
            .map(|path| path.prepend(PathSegment::Wildcard))
            .collect()
    }
}
