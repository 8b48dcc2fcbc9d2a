use crate::error::{Result, TrellisError};
use crate::provider::CommitProvider;
use crate::types::{BranchRef, CommitRecord, Oid};
use octocrab::models::repos::RepoCommit;
use octocrab::Octocrab;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BRANCH_LISTING: usize = 300;

#[derive(Clone)]
pub struct GitHubProvider {
    octo: Octocrab,
}

impl GitHubProvider {
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        let octo = builder
            .build()
            .map_err(|e| TrellisError::Provider(e.to_string()))?;
        Ok(Self { octo })
    }
}

impl CommitProvider for GitHubProvider {
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<BranchRef>> {
        let mut branches = Vec::new();
        let mut page = 1u32;

        loop {
            let result = bounded(
                "branch listing",
                self.octo
                    .repos(owner, repo)
                    .list_branches()
                    .per_page(100)
                    .page(page)
                    .send(),
            )
            .await?;

            if result.items.is_empty() {
                break;
            }

            for branch in &result.items {
                branches.push(BranchRef {
                    name: branch.name.clone(),
                });
                if branches.len() >= MAX_BRANCH_LISTING {
                    break;
                }
            }

            if branches.len() >= MAX_BRANCH_LISTING || result.next.is_none() {
                break;
            }
            page += 1;
        }

        Ok(branches)
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        match bounded("repository lookup", self.octo.repos(owner, repo).get()).await {
            Ok(repository) => Ok(repository.default_branch),
            Err(_) => Ok(None),
        }
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<CommitRecord>> {
        let result = bounded(
            "commit listing",
            self.octo
                .repos(owner, repo)
                .list_commits()
                .sha(git_ref)
                .per_page(per_page)
                .page(page)
                .send(),
        )
        .await?;

        result.items.iter().map(convert_commit).collect()
    }

    async fn get_commit(&self, owner: &str, repo: &str, id: &Oid) -> Result<CommitRecord> {
        let route = format!("/repos/{owner}/{repo}/commits/{id}");
        let commit: RepoCommit = bounded("commit lookup", self.octo.get(route, None::<&()>)).await?;
        convert_commit(&commit)
    }
}

fn convert_commit(c: &RepoCommit) -> Result<CommitRecord> {
    let id = Oid::from_hex(&c.sha)?;
    let parents: Vec<Oid> = c
        .parents
        .iter()
        .filter_map(|p| p.sha.as_deref())
        .filter_map(|sha| Oid::from_hex(sha).ok())
        .collect();

    let author = c
        .commit
        .author
        .as_ref()
        .map(|a| a.name.clone())
        .unwrap_or_default();

    let date = c.commit.author.as_ref().and_then(|a| a.date);

    Ok(CommitRecord {
        id,
        parents,
        message: c.commit.message.clone(),
        author,
        date,
    })
}

async fn bounded<T, F>(what: &str, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, octocrab::Error>>,
{
    match timeout(REQUEST_TIMEOUT, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(map_host_error(e)),
        Err(_) => Err(TrellisError::Timeout(what.to_string())),
    }
}

fn map_host_error(e: octocrab::Error) -> TrellisError {
    match &e {
        octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
            404 => TrellisError::NotFound(source.message.clone()),
            401 => TrellisError::Unauthenticated(source.message.clone()),
            403 | 429 => TrellisError::RateLimited(source.message.clone()),
            _ => TrellisError::Provider(source.message.clone()),
        },
        _ => TrellisError::Provider(e.to_string()),
    }
}
