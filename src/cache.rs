use crate::error::Result;
use crate::pipeline::{build_graph, GraphPayload};
use crate::provider::CommitProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
    pub max_commits: usize,
}

/// Short-lived store for finished payloads. Entries are complete by
/// construction: a value is only put after the whole pipeline succeeded.
pub trait GraphCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<GraphPayload>>;
    fn put(&self, key: CacheKey, payload: Arc<GraphPayload>);
}

pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, Arc<GraphPayload>)>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl GraphCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<GraphPayload>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored, payload)) if stored.elapsed() < self.ttl => Some(Arc::clone(payload)),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: CacheKey, payload: Arc<GraphPayload>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, (Instant::now(), payload));
    }
}

/// Builds through the cache; only successful builds are stored.
pub async fn build_graph_cached<P: CommitProvider, C: GraphCache>(
    provider: &P,
    cache: &C,
    owner: &str,
    repo: &str,
    max_commits: usize,
) -> Result<Arc<GraphPayload>> {
    let key = CacheKey {
        owner: owner.to_string(),
        repo: repo.to_string(),
        max_commits,
    };
    if let Some(hit) = cache.get(&key) {
        tracing::debug!("cache hit for {owner}/{repo}@{max_commits}");
        return Ok(hit);
    }

    let payload = Arc::new(build_graph(provider, owner, repo, max_commits).await?);
    cache.put(key, Arc::clone(&payload));
    Ok(payload)
}
