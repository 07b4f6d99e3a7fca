//! Schema and document loading from various sources.
//!
//! Handles loading definitions from files, strings, and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::document::Document;
use crate::error::SchemaError;
use crate::schema::Schema;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Read a JSON file.
///
/// # Errors
///
/// Returns `SchemaError::FileNotFound` if the file doesn't exist,
/// or `SchemaError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| SchemaError::InvalidJson { source })
}

/// Load a schema definition from a file path.
///
/// # Errors
///
/// Returns the errors of [`load_json`], or a definition error if the JSON
/// isn't a valid schema.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaError> {
    Schema::from_value(&load_json(path)?)
}

/// Load a schema definition from a JSON string.
///
/// # Errors
///
/// Returns `SchemaError::InvalidJson` if the string isn't valid JSON, or a
/// definition error if it isn't a valid schema.
pub fn load_schema_str(content: &str) -> Result<Schema, SchemaError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| SchemaError::InvalidJson { source })?;
    Schema::from_value(&value)
}

/// Load a data document from a JSON file.
///
/// Extended JSON `{"$oid": "<hex>"}` values load as native ObjectIds.
pub fn load_document(path: &Path) -> Result<Document, SchemaError> {
    load_json(path).map(Document::from)
}

/// Load a schema definition from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `SchemaError::NetworkError` if the request fails or the body
/// isn't JSON, or a definition error if it isn't a valid schema.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str) -> Result<Schema, SchemaError> {
    let network_error = |source: reqwest::Error| SchemaError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    // Check for HTTP errors before parsing
    let value: Value = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)?;

    Schema::from_value(&value)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a schema from a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_schema_auto(source: &str) -> Result<Schema, SchemaError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_schema_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(SchemaError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_schema(Path::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_schema_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type": "array", "items": {{"type": "objectid"}}}}"#).unwrap();

        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.object_id_paths().len(), 1);
    }

    #[test]
    fn load_schema_file_not_found() {
        let result = load_schema(Path::new("/nonexistent/path.json"));
        assert!(matches!(result, Err(SchemaError::FileNotFound { .. })));
    }

    #[test]
    fn load_schema_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_schema(file.path());
        assert!(matches!(result, Err(SchemaError::InvalidJson { .. })));
    }

    #[test]
    fn load_schema_invalid_definition() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type": "array"}}"#).unwrap();

        let result = load_schema(file.path());
        assert!(matches!(result, Err(SchemaError::MissingItems { .. })));
    }

    #[test]
    fn load_schema_str_valid() {
        let schema = load_schema_str(r#"{"type": "objectid"}"#).unwrap();
        assert!(schema.object_id_paths()[0].is_root());
    }

    #[test]
    fn load_schema_str_invalid() {
        let result = load_schema_str("not json");
        assert!(matches!(result, Err(SchemaError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_keeps_strings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"_id": "52f044dee2896a8264d7ec2f"}}"#).unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc.get("_id").and_then(Document::as_str), Some("52f044dee2896a8264d7ec2f"));
    }

    #[test]
    fn load_document_reads_extended_object_ids() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"_id": {{"$oid": "52f044dee2896a8264d7ec2f"}}}}"#).unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(
            doc.get("_id").and_then(Document::as_object_id).map(|id| id.to_hex()),
            Some("52f044dee2896a8264d7ec2f".to_string())
        );
    }

    #[test]
    fn is_url_https() {
        assert!(is_url("https://example.com/schema.json"));
    }

    #[test]
    fn is_url_http() {
        assert!(is_url("http://example.com/schema.json"));
    }

    #[test]
    fn is_url_file_path() {
        assert!(!is_url("/path/to/schema.json"));
        assert!(!is_url("./schema.json"));
        assert!(!is_url("schema.json"));
    }

    #[test]
    fn load_schema_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type": "string"}}"#).unwrap();

        let schema = load_schema_auto(file.path().to_str().unwrap()).unwrap();
        assert!(schema.object_id_paths().is_empty());
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_schema_url_valid() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/users.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"type": "object", "properties": {"_id": {"type": "objectid"}}}"#)
                .create();

            let schema = load_schema_url(&format!("{}/users.json", server.url())).unwrap();
            assert_eq!(schema.object_id_paths()[0].to_string(), "_id");
            mock.assert();
        }

        #[test]
        fn load_schema_url_404() {
            let mut server = mockito::Server::new();
            let _mock = server.mock("GET", "/missing.json").with_status(404).create();

            let result = load_schema_url(&format!("{}/missing.json", server.url()));
            assert!(matches!(result, Err(SchemaError::NetworkError { .. })));
        }

        #[test]
        fn load_schema_url_non_json_body() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_body("<html></html>")
                .create();

            let result = load_schema_url(&format!("{}/schema.json", server.url()));
            assert!(matches!(result, Err(SchemaError::NetworkError { .. })));
        }

        #[test]
        fn load_schema_auto_url() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_body(r#"{"type": "number"}"#)
                .create();

            let result = load_schema_auto(&format!("{}/schema.json", server.url()));
            assert!(result.is_ok());
        }
    }
}
