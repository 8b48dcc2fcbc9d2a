use crate::graph::types::{Graph, GraphEdge, GraphNode};
use crate::types::{CommitRecord, Oid};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Assembles the flat commit set into a DAG in four passes: nodes, edges
/// plus placeholders, branch propagation, merge/split classification.
pub fn build_dag(
    commits: &[CommitRecord],
    membership: &HashMap<Oid, BTreeSet<String>>,
) -> Graph {
    let mut nodes: HashMap<Oid, GraphNode> = HashMap::with_capacity(commits.len());

    // Pass 1: one data-backed node per collected commit.
    for commit in commits {
        let branches = membership.get(&commit.id).cloned().unwrap_or_default();
        nodes.insert(
            commit.id,
            GraphNode {
                id: commit.id,
                author: commit.author.clone(),
                message: commit.message.clone(),
                date: commit.date,
                branches,
                parent_shas: commit.parents.clone(),
                child_shas: Vec::new(),
                is_merge: false,
                is_split: false,
            },
        );
    }

    // Pass 2: child links and edges; parents outside the fetch window become
    // placeholders inheriting the discovering child's branch set once, at
    // creation time.
    let mut links: Vec<GraphEdge> = Vec::new();
    for commit in commits {
        let child_branches = nodes
            .get(&commit.id)
            .map(|n| n.branches.clone())
            .unwrap_or_default();

        for parent in &commit.parents {
            let parent_node = nodes
                .entry(*parent)
                .or_insert_with(|| GraphNode::placeholder(*parent, child_branches.clone()));
            if parent_node.child_shas.contains(&commit.id) {
                // Repeated parent id in one commit; edge already recorded.
                continue;
            }
            parent_node.child_shas.push(commit.id);
            links.push(GraphEdge {
                source: commit.id,
                target: *parent,
            });
        }
    }

    // Pass 3: branch labels flow to all ancestors. One work-stack walk per
    // branch label with its own visited set keeps the cost bounded at
    // O(labels x (nodes + edges)) while making membership monotone along
    // parent links regardless of seed order.
    let labels: BTreeSet<String> = nodes
        .values()
        .flat_map(|n| n.branches.iter().cloned())
        .collect();
    for label in &labels {
        let mut stack: Vec<Oid> = nodes
            .values()
            .filter(|n| n.branches.contains(label))
            .map(|n| n.id)
            .collect();
        let mut visited: HashSet<Oid> = stack.iter().copied().collect();

        while let Some(id) = stack.pop() {
            let parents = match nodes.get(&id) {
                Some(node) => node.parent_shas.clone(),
                None => continue,
            };
            for parent in parents {
                if visited.insert(parent) {
                    if let Some(node) = nodes.get_mut(&parent) {
                        node.branches.insert(label.clone());
                        stack.push(parent);
                    }
                }
            }
        }
    }

    // Pass 4: classification, placeholders included.
    for node in nodes.values_mut() {
        node.is_merge = node.parent_shas.len() > 1;
        node.is_split = node.child_shas.len() > 1;
    }

    // Deterministic output order: newest first, id as tiebreak.
    let mut nodes: Vec<GraphNode> = nodes.into_values().collect();
    nodes.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
    links.sort_by(|a, b| (a.source, a.target).cmp(&(b.source, b.target)));

    Graph { nodes, links }
}
