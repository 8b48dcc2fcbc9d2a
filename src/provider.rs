use crate::error::Result;
use crate::types::{BranchRef, CommitRecord, Oid};

/// The consumed slice of a commit-history host. One page of history per
/// `list_commits` call; paging policy belongs to the caller.
#[allow(async_fn_in_trait)]
pub trait CommitProvider {
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<BranchRef>>;

    /// `None` means the lookup failed or the host reports no default.
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<Option<String>>;

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<CommitRecord>>;

    async fn get_commit(&self, owner: &str, repo: &str, id: &Oid) -> Result<CommitRecord>;
}
