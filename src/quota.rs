/// Splits a global commit budget across the selected branches and tracks
/// depletion as collection runs. The allocator is threaded mutably through
/// the collection loop; branch walks consume it in plan order.
#[derive(Clone, Debug)]
pub struct QuotaPlan {
    quotas: Vec<usize>,
    remaining: usize,
}

impl QuotaPlan {
    pub fn new(max_commits: usize, branch_count: usize) -> Self {
        let quotas = if branch_count == 0 {
            Vec::new()
        } else {
            let per_branch = max_commits / branch_count;
            let remainder = max_commits % branch_count;
            (0..branch_count)
                .map(|i| per_branch + usize::from(i < remainder))
                .collect()
        };
        Self {
            quotas,
            remaining: max_commits,
        }
    }

    /// Per-branch quota by fetch-plan position.
    pub fn branch_quota(&self, idx: usize) -> usize {
        self.quotas.get(idx).copied().unwrap_or(0)
    }

    /// Consumes one unit of the global budget; false once depleted.
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn depleted(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}
