use crate::error::{Result, TrellisError};
use crate::provider::CommitProvider;
use crate::types::BranchRef;
use chrono::{DateTime, Utc};
use futures::future;
use std::cmp::Ordering;

/// At most this many branches feed the rest of the pipeline.
pub const MAX_BRANCHES: usize = 5;
const RECENCY_BATCH: usize = 10;

/// Branch fetch order for every downstream stage: default branch first,
/// then by descending tip recency.
#[derive(Clone, Debug)]
pub struct FetchPlan {
    pub default_branch: String,
    pub branches: Vec<String>,
}

pub async fn rank_branches<P: CommitProvider>(
    provider: &P,
    owner: &str,
    repo: &str,
) -> Result<FetchPlan> {
    let branch_refs = provider.list_branches(owner, repo).await?;
    let default = provider.default_branch(owner, repo).await?;

    let mut ranked: Vec<(String, Option<DateTime<Utc>>)> = Vec::with_capacity(branch_refs.len());
    for chunk in branch_refs.chunks(RECENCY_BATCH) {
        let lookups = chunk.iter().map(|b| tip_time(provider, owner, repo, &b.name));
        let times = future::join_all(lookups).await;
        for (branch, time) in chunk.iter().zip(times) {
            ranked.push((branch.name.clone(), time));
        }
    }

    // Unknown recency sorts last; ties among unknowns keep listing order.
    ranked.sort_by(|a, b| match (&a.1, &b.1) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    let mut branches: Vec<String> = ranked.into_iter().map(|(name, _)| name).collect();

    let default_branch = match default {
        Some(name) => name,
        // Host did not report a default; the most recent branch stands in.
        None => branches
            .first()
            .cloned()
            .ok_or_else(|| TrellisError::NotFound(format!("{owner}/{repo} has no branches")))?,
    };

    // The default branch leads the plan even if the listing omitted it
    // (protected/hidden branches show up this way).
    if let Some(pos) = branches.iter().position(|name| *name == default_branch) {
        branches.remove(pos);
    }
    branches.insert(0, default_branch.clone());
    branches.truncate(MAX_BRANCHES);

    Ok(FetchPlan {
        default_branch,
        branches,
    })
}

async fn tip_time<P: CommitProvider>(
    provider: &P,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Option<DateTime<Utc>> {
    provider
        .list_commits(owner, repo, branch, 1, 1)
        .await
        .ok()
        .and_then(|commits| commits.first().and_then(|c| c.date))
}

impl FetchPlan {
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }
}
