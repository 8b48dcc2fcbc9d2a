#![cfg(test)]

use crate::error::{Result, TrellisError};
use crate::provider::CommitProvider;
use crate::types::{BranchRef, CommitRecord, Oid};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap, HashSet};

pub fn oid(val: u8) -> Oid {
    let mut bytes = [0u8; 20];
    bytes[0] = val;
    Oid::from_bytes(bytes)
}

pub fn commit(val: u8, parents: Vec<u8>, secs_ago: i64) -> CommitRecord {
    CommitRecord {
        id: oid(val),
        parents: parents.into_iter().map(oid).collect(),
        message: format!("commit {val}"),
        author: "test".to_string(),
        date: Some(chrono::Utc::now() - chrono::Duration::seconds(secs_ago)),
    }
}

pub fn membership_of(entries: &[(u8, &[&str])]) -> HashMap<Oid, BTreeSet<String>> {
    entries
        .iter()
        .map(|(id, branches)| {
            let set = branches.iter().map(|b| b.to_string()).collect();
            (oid(*id), set)
        })
        .collect()
}

/// Scripted remote host: branch histories tip-first, commits resolvable by
/// id, optional per-id failures. Single-threaded by design, like the
/// pipeline itself.
#[derive(Default)]
pub struct FakeProvider {
    default: Option<String>,
    branches: Vec<(String, Vec<CommitRecord>)>,
    by_id: HashMap<Oid, CommitRecord>,
    failing: HashSet<Oid>,
    listing_error: bool,
    commit_calls: Cell<usize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_branch(mut self, name: &str) -> Self {
        self.default = Some(name.to_string());
        self
    }

    pub fn branch(mut self, name: &str, commits: Vec<CommitRecord>) -> Self {
        for c in &commits {
            self.by_id.insert(c.id, c.clone());
        }
        self.branches.push((name.to_string(), commits));
        self
    }

    /// Registers a commit reachable only through `get_commit`.
    pub fn resolvable(mut self, commit: CommitRecord) -> Self {
        self.by_id.insert(commit.id, commit);
        self
    }

    pub fn failing(mut self, id: Oid) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn listing_error(mut self) -> Self {
        self.listing_error = true;
        self
    }

    pub fn list_commit_calls(&self) -> usize {
        self.commit_calls.get()
    }
}

impl CommitProvider for FakeProvider {
    async fn list_branches(&self, _owner: &str, _repo: &str) -> Result<Vec<BranchRef>> {
        if self.listing_error {
            return Err(TrellisError::NotFound("repository not found".to_string()));
        }
        Ok(self
            .branches
            .iter()
            .map(|(name, _)| BranchRef { name: name.clone() })
            .collect())
    }

    async fn default_branch(&self, _owner: &str, _repo: &str) -> Result<Option<String>> {
        Ok(self.default.clone())
    }

    async fn list_commits(
        &self,
        _owner: &str,
        _repo: &str,
        git_ref: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<CommitRecord>> {
        self.commit_calls.set(self.commit_calls.get() + 1);
        let history = self
            .branches
            .iter()
            .find(|(name, _)| name == git_ref)
            .map(|(_, commits)| commits)
            .ok_or_else(|| TrellisError::NotFound(format!("unknown ref {git_ref}")))?;

        let start = (page as usize - 1) * per_page as usize;
        if start >= history.len() {
            return Ok(Vec::new());
        }
        let end = (start + per_page as usize).min(history.len());
        Ok(history[start..end].to_vec())
    }

    async fn get_commit(&self, _owner: &str, _repo: &str, id: &Oid) -> Result<CommitRecord> {
        if self.failing.contains(id) {
            return Err(TrellisError::Provider(format!(
                "scripted failure for {}",
                id.short()
            )));
        }
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| TrellisError::NotFound(format!("no commit {}", id.short())))
    }
}
