//! Metadata-defined graph edges
//!
//! Adjacency is not a stored entity. Two nodes are neighbors when the value
//! sets of any designated edge field overlap: a scalar metadata value is a
//! singleton set, a JSON array is the set of its elements. Scalar equality
//! falls out as the singleton/singleton case.

use crate::error::{RetrievalError, Result};
use crate::types::Node;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validated, non-empty set of metadata keys used for adjacency.
///
/// Duplicate keys are collapsed; insertion order is preserved so that query
/// construction in backends stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct EdgeFields(Vec<String>);

impl EdgeFields {
    /// Create from an iterator of key names, rejecting the empty set
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !keys.contains(&field) {
                keys.push(field);
            }
        }
        if keys.is_empty() {
            return Err(RetrievalError::InvalidConfig(
                "edge field set must not be empty".to_string(),
            ));
        }
        Ok(Self(keys))
    }

    /// Iterate over the configured key names
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for EdgeFields {
    type Error = RetrievalError;

    fn try_from(fields: Vec<String>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<EdgeFields> for Vec<String> {
    fn from(fields: EdgeFields) -> Self {
        fields.0
    }
}

/// Whether two metadata values overlap as sets.
///
/// Arrays are compared element-wise; scalars are singleton sets. Nulls never
/// match anything, including each other.
pub fn values_overlap(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.iter().any(|x| !x.is_null() && ys.contains(x))
        }
        (Value::Array(xs), scalar) => xs.contains(scalar),
        (scalar, Value::Array(ys)) => ys.contains(scalar),
        (x, y) => x == y,
    }
}

/// Whether two nodes are adjacent under the configured edge fields
pub fn nodes_adjacent(a: &Node, b: &Node, fields: &EdgeFields) -> bool {
    fields.iter().any(|key| {
        match (a.metadata.get(key), b.metadata.get(key)) {
            (Some(va), Some(vb)) => values_overlap(va, vb),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_with(key: &str, value: Value) -> Node {
        let mut node = Node::new(key.to_string() + "-node", "", vec![1.0]);
        node.metadata.insert(key.to_string(), value);
        node
    }

    #[test]
    fn empty_edge_fields_rejected() {
        let err = EdgeFields::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidConfig(_)));
    }

    #[test]
    fn duplicate_keys_collapse() {
        let fields = EdgeFields::new(["habitat", "habitat", "keywords"]).unwrap();
        assert_eq!(fields.as_slice(), ["habitat", "keywords"]);
    }

    #[test]
    fn scalar_equality_is_overlap() {
        assert!(values_overlap(&json!("forest"), &json!("forest")));
        assert!(!values_overlap(&json!("forest"), &json!("desert")));
    }

    #[test]
    fn array_overlap_matches_any_shared_element() {
        assert!(values_overlap(&json!(["fast", "sly"]), &json!(["sly"])));
        assert!(values_overlap(&json!(["fast"]), &json!("fast")));
        assert!(!values_overlap(&json!(["fast"]), &json!(["slow"])));
    }

    #[test]
    fn null_never_matches() {
        assert!(!values_overlap(&json!(null), &json!(null)));
        assert!(!values_overlap(&json!([null]), &json!([null])));
    }

    #[test]
    fn adjacency_requires_shared_field_value() {
        let fields = EdgeFields::new(["habitat"]).unwrap();
        let a = node_with("habitat", json!("forest"));
        let b = node_with("habitat", json!("forest"));
        let c = node_with("habitat", json!("desert"));

        assert!(nodes_adjacent(&a, &b, &fields));
        assert!(!nodes_adjacent(&a, &c, &fields));
    }

    #[test]
    fn missing_field_means_no_edge() {
        let fields = EdgeFields::new(["keywords"]).unwrap();
        let a = node_with("keywords", json!(["swift"]));
        let b = node_with("habitat", json!("forest"));
        assert!(!nodes_adjacent(&a, &b, &fields));
    }

    #[test]
    fn edge_fields_serde_roundtrip() {
        let fields = EdgeFields::new(["habitat", "keywords"]).unwrap();
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"["habitat","keywords"]"#);
        let back: EdgeFields = serde_json::from_str(&json).unwrap();
        assert_eq!(fields, back);
    }

    #[test]
    fn edge_fields_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<EdgeFields>("[]").is_err());
    }
}
