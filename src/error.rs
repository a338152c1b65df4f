//! Error types for strata.
//!
//! Lookups that can legitimately miss (`get`, `index_of`, `pop`, search on an
//! empty graph) report absence through `Option`/`bool`/empty results rather
//! than errors. `StrataError` is reserved for rejected configuration, caller
//! bugs, and malformed serialized input.

use thiserror::Error;

/// Errors that can occur while configuring, querying, or (de)serializing structures.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Invalid parameter value (e.g. `max_levels == 0`, `k == 0`).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A node was looked up in a graph it was never registered in.
    #[error("missing node: node {0} is not registered in the graph")]
    MissingNode(u32),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Well-formed JSON that does not describe a valid structure.
    #[error("format error: {0}")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_node_message_names_the_id() {
        let err = StrataError::MissingNode(42);
        assert_eq!(
            err.to_string(),
            "missing node: node 42 is not registered in the graph"
        );
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: StrataError = parse.unwrap_err().into();
        assert!(matches!(err, StrataError::Serialization(_)));
    }
}
