use crate::graph::types::Graph;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_commits: usize,
    pub merge_count: usize,
    pub split_count: usize,
    pub author_count: usize,
    pub branch_counts: BTreeMap<String, usize>,
}

/// Derived from the finished graph only, never from collection counters, so
/// the numbers always agree with the returned node list.
pub fn aggregate(graph: &Graph, branches: &[String]) -> GraphStats {
    let author_count = graph
        .nodes
        .iter()
        .map(|n| n.author.as_str())
        .filter(|a| !a.is_empty())
        .unique()
        .count();

    let branch_counts = branches
        .iter()
        .map(|b| {
            let count = graph.nodes.iter().filter(|n| n.branches.contains(b)).count();
            (b.clone(), count)
        })
        .collect();

    GraphStats {
        total_commits: graph.nodes.len(),
        merge_count: graph.nodes.iter().filter(|n| n.is_merge).count(),
        split_count: graph.nodes.iter().filter(|n| n.is_split).count(),
        author_count,
        branch_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::build_dag;
    use crate::test_utils::{commit, membership_of};

    #[test]
    fn counts_match_the_graph() {
        let mut commits = vec![
            commit(4, vec![2, 3], 1),
            commit(2, vec![1], 2),
            commit(3, vec![1], 3),
            commit(1, vec![], 4),
        ];
        commits[0].author = "ada".to_string();
        commits[1].author = "ada".to_string();
        commits[2].author = "grace".to_string();
        commits[3].author = String::new();

        let membership = membership_of(&[(4, &["main"]), (3, &["feat"])]);
        let graph = build_dag(&commits, &membership);
        let branches = vec!["main".to_string(), "feat".to_string()];
        let stats = aggregate(&graph, &branches);

        assert_eq!(stats.total_commits, graph.nodes.len());
        assert_eq!(stats.merge_count, 1);
        assert_eq!(stats.split_count, 1);
        assert_eq!(stats.author_count, 2);
        assert_eq!(
            stats.branch_counts["main"],
            graph
                .nodes
                .iter()
                .filter(|n| n.branches.contains("main"))
                .count()
        );
        // feat reaches 3 and the shared ancestry below it
        assert_eq!(stats.branch_counts["feat"], 2);
    }

    #[test]
    fn empty_graph_zeroes() {
        let graph = build_dag(&[], &Default::default());
        let stats = aggregate(&graph, &["main".to_string()]);
        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.branch_counts["main"], 0);
    }
}
