//! The public `Schema` wrapper.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document::Document;
use crate::error::{ConvertError, SchemaError, ValidateError};
use crate::paths::object_id_paths;
use crate::rewriter::to_json_schema;
use crate::types::{Path, SchemaNode};
use crate::validator::{validate, Mode};
use crate::walker::{ids_to_strings, strings_to_ids};

/// An immutable ObjectId-aware schema.
///
/// Every operation derives what it needs from the definition on each call;
/// nothing is cached, so a `Schema` can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    root: SchemaNode,
}

impl Schema {
    pub fn new(root: SchemaNode) -> Self {
        Self { root }
    }

    /// Build a schema from its JSON definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the definition is malformed.
    pub fn from_value(definition: &Value) -> Result<Self, SchemaError> {
        SchemaNode::from_value(definition).map(Self::new)
    }

    /// The definition this schema was built from.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Paths of every ObjectId the schema declares, in declaration order.
    pub fn object_id_paths(&self) -> Vec<Path> {
        object_id_paths(&self.root)
    }

    /// Copy of `doc` with native ObjectIds rendered as hex strings.
    pub fn ids_to_strings(&self, doc: &Document) -> Document {
        debug!("converting ObjectIds to strings");
        ids_to_strings(&self.root, doc)
    }

    /// Copy of `doc` with hex strings parsed into native ObjectIds.
    ///
    /// Native ObjectIds are kept. A `null` at an ObjectId location is kept as
    /// `null` rather than rejected, so optional identifiers may be unset.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError` if an ObjectId location holds anything other
    /// than a 24-character hex string, an ObjectId, or null.
    pub fn strings_to_ids(&self, doc: &Document) -> Result<Document, ConvertError> {
        debug!("converting strings to ObjectIds");
        strings_to_ids(&self.root, doc)
    }

    /// The definition with every ObjectId replaced by a hex-pattern string.
    pub fn json_schema(&self) -> SchemaNode {
        to_json_schema(&self.root)
    }

    /// Validate `doc`, enforcing required properties.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Invalid` carrying every violation.
    pub fn validate(&self, doc: &Document) -> Result<(), ValidateError> {
        validate(&self.root, doc, Mode::Full)
    }

    /// Validate `doc` without required-property checks.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Invalid` if a present field is malformed.
    pub fn partial_validate(&self, doc: &Document) -> Result<(), ValidateError> {
        validate(&self.root, doc, Mode::Partial)
    }
}

impl From<SchemaNode> for Schema {
    fn from(root: SchemaNode) -> Self {
        Self::new(root)
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Schema::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }

    #[test]
    fn deserializes_inside_config() {
        #[derive(Deserialize)]
        struct CollectionConfig {
            name: String,
            schema: Schema,
        }

        let config: CollectionConfig = serde_json::from_value(json!({
            "name": "users",
            "schema": {
                "type": "object",
                "properties": { "_id": { "type": "objectid", "required": true } }
            }
        }))
        .unwrap();

        assert_eq!(config.name, "users");
        assert_eq!(config.schema.object_id_paths().len(), 1);
    }

    #[test]
    fn bad_definition_fails_to_deserialize() {
        let result: Result<Schema, _> = serde_json::from_value(json!({ "type": "uuid" }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_to_definition() {
        let definition = json!({
            "type": "array",
            "items": { "type": "objectid" }
        });
        let schema = Schema::from_value(&definition).unwrap();
        assert_eq!(serde_json::to_value(&schema).unwrap(), definition);
    }
}
