use crate::error::Result;
use crate::provider::CommitProvider;
use crate::quota::QuotaPlan;
use crate::rank::FetchPlan;
use crate::types::{CommitRecord, Oid};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub const PAGE_SIZE: u8 = 100;

/// Everything the collection phase learned: the accepted (deduplicated)
/// commits, which branches reference each commit id, and how many commits
/// each branch's walk accepted.
#[derive(Debug, Default)]
pub struct Collected {
    pub commits: Vec<CommitRecord>,
    pub membership: HashMap<Oid, BTreeSet<String>>,
    pub per_branch: BTreeMap<String, usize>,
}

/// Walks each branch's history in fetch-plan order, strictly sequentially:
/// quota is a shared resource consumed in branch priority order, so the
/// `&mut QuotaPlan` threading is load-bearing, not incidental.
pub async fn collect_commits<P: CommitProvider>(
    provider: &P,
    owner: &str,
    repo: &str,
    plan: &FetchPlan,
    quota: &mut QuotaPlan,
    page_size: u8,
) -> Result<Collected> {
    let mut out = Collected::default();
    let mut seen: HashSet<Oid> = HashSet::new();

    for (idx, branch) in plan.branches.iter().enumerate() {
        let branch_quota = quota.branch_quota(idx);
        let mut taken = 0usize;
        let mut page = 1u32;

        loop {
            if taken >= branch_quota || quota.depleted() {
                break;
            }

            let commits = provider
                .list_commits(owner, repo, branch, page, page_size)
                .await?;
            let end_of_history = commits.len() < page_size as usize;
            let mut shared_history = false;

            for commit in commits {
                // Membership is recorded for every commit the walk sees,
                // whether or not it counts toward quota.
                out.membership
                    .entry(commit.id)
                    .or_default()
                    .insert(branch.clone());

                if seen.contains(&commit.id) {
                    // A higher-priority branch already claimed this commit;
                    // the ancestry below it is assumed represented.
                    shared_history = true;
                    continue;
                }
                if taken < branch_quota && quota.take() {
                    seen.insert(commit.id);
                    out.commits.push(commit);
                    taken += 1;
                }
            }

            if end_of_history || shared_history {
                break;
            }
            page += 1;
        }

        out.per_branch.insert(branch.clone(), taken);
    }

    tracing::debug!(
        accepted = out.commits.len(),
        remaining = quota.remaining(),
        "commit collection finished"
    );
    Ok(out)
}
