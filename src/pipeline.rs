use crate::collect::{collect_commits, PAGE_SIZE};
use crate::error::Result;
use crate::expand::expand_ancestors;
use crate::graph::builder::build_dag;
use crate::graph::stats::{aggregate, GraphStats};
use crate::graph::types::Graph;
use crate::provider::CommitProvider;
use crate::quota::QuotaPlan;
use crate::rank::rank_branches;
use serde::Serialize;
use std::collections::BTreeMap;

/// Overall cap on ancestor lookups per build, disjoint from the commit
/// budget: one expansion round can grow the set by at most this much.
pub const MAX_ANCESTOR_FETCH: usize = 100;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub default_branch: String,
    pub branches: Vec<String>,
    pub collected: BTreeMap<String, usize>,
    pub stats: GraphStats,
}

#[derive(Clone, Debug, Serialize)]
pub struct GraphPayload {
    pub meta: Meta,
    pub graph: Graph,
}

/// Runs the whole pipeline: branch ranking, quota-fair collection, ancestor
/// expansion, DAG assembly, stats. Rank/collect failures abort the build;
/// expansion failures degrade single nodes to placeholders.
pub async fn build_graph<P: CommitProvider>(
    provider: &P,
    owner: &str,
    repo: &str,
    max_commits: usize,
) -> Result<GraphPayload> {
    let plan = rank_branches(provider, owner, repo).await?;
    tracing::debug!(branches = ?plan.branches, "fetch plan ready");

    let mut quota = QuotaPlan::new(max_commits, plan.branch_count());
    let collected = collect_commits(provider, owner, repo, &plan, &mut quota, PAGE_SIZE).await?;

    let commits =
        expand_ancestors(provider, owner, repo, collected.commits, MAX_ANCESTOR_FETCH).await;

    let graph = build_dag(&commits, &collected.membership);
    let stats = aggregate(&graph, &plan.branches);
    tracing::info!(
        nodes = stats.total_commits,
        links = graph.links.len(),
        "graph built for {owner}/{repo}"
    );

    Ok(GraphPayload {
        meta: Meta {
            default_branch: plan.default_branch,
            branches: plan.branches,
            collected: collected.per_branch,
            stats,
        },
        graph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrellisError;
    use crate::test_utils::{commit, oid, FakeProvider};

    fn shared_root_provider() -> FakeProvider {
        // main: a3 -> a2 -> a1 -> root, feat: b2 -> b1 -> root
        FakeProvider::new()
            .default_branch("main")
            .branch(
                "main",
                vec![
                    commit(13, vec![12], 1),
                    commit(12, vec![11], 2),
                    commit(11, vec![1], 3),
                    commit(1, vec![], 10),
                ],
            )
            .branch(
                "feat",
                vec![
                    commit(22, vec![21], 1),
                    commit(21, vec![1], 4),
                    commit(1, vec![], 10),
                ],
            )
    }

    #[tokio::test]
    async fn shared_root_scenario_builds_six_nodes() {
        let provider = shared_root_provider();
        let payload = build_graph(&provider, "o", "r", 10).await.unwrap();

        assert_eq!(payload.graph.nodes.len(), 6);
        assert_eq!(payload.meta.stats.total_commits, 6);

        let root = payload.graph.nodes.iter().find(|n| n.id == oid(1)).unwrap();
        assert!(root.is_split);
        assert!(payload.graph.nodes.iter().all(|n| !n.is_merge));

        assert_eq!(payload.meta.default_branch, "main");
        assert_eq!(payload.meta.collected["main"], 4);
        assert_eq!(payload.meta.collected["feat"], 2);
    }

    #[tokio::test]
    async fn stats_agree_with_returned_nodes() {
        let provider = shared_root_provider();
        let payload = build_graph(&provider, "o", "r", 10).await.unwrap();

        let stats = &payload.meta.stats;
        assert_eq!(stats.total_commits, payload.graph.nodes.len());
        for branch in &payload.meta.branches {
            let counted = payload
                .graph
                .nodes
                .iter()
                .filter(|n| n.branches.contains(branch))
                .count();
            assert_eq!(stats.branch_counts[branch], counted);
        }
    }

    #[tokio::test]
    async fn identical_builds_are_byte_identical() {
        let provider = shared_root_provider();
        let first = build_graph(&provider, "o", "r", 10).await.unwrap();
        let second = build_graph(&provider, "o", "r", 10).await.unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn quota_clips_collection_but_expansion_still_runs() {
        let provider = shared_root_provider();
        let payload = build_graph(&provider, "o", "r", 2).await.unwrap();

        // 1 accepted per branch, plus their fetched parents.
        let accepted: usize = payload.meta.collected.values().sum();
        assert_eq!(accepted, 2);
        assert!(payload.graph.nodes.len() > 2);
    }

    #[tokio::test]
    async fn unknown_repo_is_fatal() {
        let provider = FakeProvider::new().listing_error();
        let err = build_graph(&provider, "o", "missing", 10).await.unwrap_err();
        assert!(matches!(err, TrellisError::NotFound(_)));
    }

    #[tokio::test]
    async fn unresolvable_ancestor_degrades_to_placeholder() {
        let provider = FakeProvider::new()
            .default_branch("main")
            .branch("main", vec![commit(2, vec![1], 1)])
            .failing(oid(1));

        let payload = build_graph(&provider, "o", "r", 10).await.unwrap();
        let placeholder = payload.graph.nodes.iter().find(|n| n.id == oid(1)).unwrap();
        assert!(placeholder.author.is_empty() && placeholder.message.is_empty());
        assert!(placeholder.branches.contains("main"));
        assert_eq!(payload.graph.links.len(), 1);
    }
}
