use crate::types::Oid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// One node per distinct commit id, placeholders included. Placeholders are
/// the same type with defaulted content fields, since every downstream pass
/// treats them uniformly.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: Oid,
    pub author: String,
    pub message: String,
    #[serde(serialize_with = "empty_when_absent")]
    pub date: Option<DateTime<Utc>>,
    pub branches: BTreeSet<String>,
    pub parent_shas: Vec<Oid>,
    pub child_shas: Vec<Oid>,
    pub is_merge: bool,
    pub is_split: bool,
}

impl GraphNode {
    pub fn placeholder(id: Oid, branches: BTreeSet<String>) -> Self {
        Self {
            id,
            author: String::new(),
            message: String::new(),
            date: None,
            branches,
            parent_shas: Vec::new(),
            child_shas: Vec::new(),
            is_merge: false,
            is_split: false,
        }
    }
}

/// Directed child -> parent edge; unique per (source, target) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: Oid,
    pub target: Oid,
}

#[derive(Clone, Debug, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

fn empty_when_absent<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&d.to_rfc3339()),
        None => serializer.serialize_str(""),
    }
}
