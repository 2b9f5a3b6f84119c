//! Filter document parsing
//!
//! Deserializes the JSON ingress format into a [`FilterNode`] tree, with a
//! size cap on the raw document. Transport is the caller's concern; a filter
//! may arrive URL-encoded in a query parameter or in a request body, and
//! either way ends up here as a JSON string. Structural problems surface as
//! validation errors, since a document that matches no node shape is a client
//! fault rather than a server one.

use crate::error::ValidationError;

use super::types::FilterNode;

/// Maximum size of a filter JSON document in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Parse a JSON filter document into a [`FilterNode`] tree.
pub fn parse_filter(json_str: &str) -> Result<FilterNode, ValidationError> {
    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(ValidationError::InvalidStructure(format!(
            "filter JSON exceeds maximum size of {MAX_FILTER_JSON_SIZE} bytes"
        )));
    }

    serde_json::from_str(json_str)
        .map_err(|_| ValidationError::InvalidStructure(
            "must be a condition, and group, or or group".to_string(),
        ))
}
