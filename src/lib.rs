//! MongoDB JSON Schema
//!
//! Validation and ObjectId conversion for document schemas that extend
//! JSON Schema with an `objectid` type.
//!
//! A [`Schema`] finds every ObjectId location in a schema definition,
//! converts documents between native [`ObjectId`]s and their hex strings at
//! those locations, and validates documents with the `objectid` nodes
//! rewritten to 24-character hex pattern strings.
//!
//! Documents read from JSON carry native ObjectIds in MongoDB Extended JSON
//! form, `{"$oid": "<hex>"}`, and are written back the same way.
//!
//! # Example
//!
//! ```
//! use mongo_json_schema::{Document, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "type": "object",
//!     "properties": {
//!         "_id": { "type": "objectid", "required": true },
//!         "participants": {
//!             "type": "array",
//!             "items": { "type": "objectid" }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let paths: Vec<String> = schema.object_id_paths().iter().map(|p| p.to_string()).collect();
//! assert_eq!(paths, ["_id", "participants.*"]);
//!
//! let doc = Document::from(json!({ "_id": "52f044dee2896a8264d7ec2f" }));
//! assert!(schema.validate(&doc).is_ok());
//!
//! let converted = schema.strings_to_ids(&doc).unwrap();
//! assert!(converted.get("_id").and_then(Document::as_object_id).is_some());
//! ```
//!
//! # Requiredness
//!
//! | Declaration | `validate` | `partial_validate` |
//! |-------------|------------|--------------------|
//! | `"required": true` | Must be present | May be absent |
//! | `"required": false` | May be absent | May be absent |
//! | (none) | May be absent | May be absent |

mod document;
mod error;
mod fold;
mod loader;
mod object_id;
mod paths;
mod rewriter;
mod schema;
mod types;
mod validator;
mod walker;

pub use document::{Document, OID_KEY};
pub use error::{ConvertError, ObjectIdError, SchemaError, ValidateError, Violation};
pub use loader::{is_url, load_document, load_json, load_schema, load_schema_auto, load_schema_str};
pub use object_id::ObjectId;
pub use rewriter::{to_json_schema, to_standard_schema, without_required};
pub use schema::Schema;
pub use types::{
    json_type_name, NodeKind, Path, PathSegment, PrimitiveType, Property, SchemaNode,
    OBJECT_ID_PATTERN, OBJECT_ID_TYPE, WILDCARD,
};
pub use validator::{validate_against_schema, Mode, PATTERN_MISMATCH, PROPERTY_REQUIRED};

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
