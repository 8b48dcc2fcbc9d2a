use crate::error::TrellisError;
use crate::provider::CommitProvider;
use crate::types::{CommitRecord, Oid};
use futures::future;
use std::collections::HashSet;

/// Upper bound on how many unresolved parent ids are even considered.
pub const MAX_MISSING: usize = 200;
const FETCH_BATCH: usize = 10;

/// Resolves parent ids that collection referenced but never fetched, in
/// concurrent batches. Failures here are per-id and non-fatal: an id that
/// cannot be fetched stays missing and becomes a placeholder node later.
pub async fn expand_ancestors<P: CommitProvider>(
    provider: &P,
    owner: &str,
    repo: &str,
    mut commits: Vec<CommitRecord>,
    max_fetch: usize,
) -> Vec<CommitRecord> {
    let present: HashSet<Oid> = commits.iter().map(|c| c.id).collect();
    let mut queued: HashSet<Oid> = HashSet::new();
    let mut missing: Vec<Oid> = Vec::new();
    for commit in &commits {
        for parent in &commit.parents {
            if !present.contains(parent) && queued.insert(*parent) {
                missing.push(*parent);
            }
        }
    }
    missing.truncate(MAX_MISSING);

    let mut fetched = 0usize;
    for batch in missing.chunks(FETCH_BATCH) {
        if fetched >= max_fetch {
            break;
        }
        let lookups = batch.iter().map(|id| provider.get_commit(owner, repo, id));
        for (id, result) in batch.iter().zip(future::join_all(lookups).await) {
            match result {
                Ok(commit) => {
                    commits.push(commit);
                    fetched += 1;
                }
                Err(e) => {
                    let e = TrellisError::PartialAncestor(id.to_string(), e.to_string());
                    tracing::warn!(id = %id.short(), "{e}");
                }
            }
        }
    }

    commits
}
