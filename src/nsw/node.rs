//! Graph vertices.

use crate::distance::euclidean;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A point in the plane with a unique id.
///
/// Serialized as `{"id": 1, "vector": [2.0, 3.0]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: u32,
    pub vector: [f32; 2],
}

impl GraphNode {
    pub fn new(id: u32, vector: [f32; 2]) -> Self {
        Self { id, vector }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: &GraphNode) -> f32 {
        euclidean(&self.vector, &other.vector)
    }

    /// JSON encoding of this node.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a node from its JSON encoding.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let node = GraphNode::new(1, [2.0, 3.0]);
        let json = node.to_json().unwrap();
        assert_eq!(json, r#"{"id":1,"vector":[2.0,3.0]}"#);
        assert_eq!(GraphNode::from_json(&json).unwrap(), node);
    }

    #[test]
    fn accepts_integer_coordinates() {
        let node = GraphNode::from_json(r#"{"id":7,"vector":[2,3]}"#).unwrap();
        assert_eq!(node, GraphNode::new(7, [2.0, 3.0]));
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(GraphNode::from_json(r#"{"id":7,"vector":[2,3,4]}"#).is_err());
        assert!(GraphNode::from_json(r#"{"vector":[2,3]}"#).is_err());
    }
}
