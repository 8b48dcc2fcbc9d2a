//! Builds a repository's multi-branch commit history, fetched incrementally
//! from a remote host under a hard commit budget, into a single annotated
//! DAG with branch membership, merge/split topology, and summary stats.

pub mod cache;
pub mod collect;
pub mod config;
pub mod error;
pub mod expand;
pub mod github;
pub mod graph;
pub mod pipeline;
pub mod provider;
pub mod quota;
pub mod rank;
#[cfg(test)]
mod test_utils;
pub mod types;

pub use error::{Result, TrellisError};
pub use pipeline::{build_graph, GraphPayload};
