//! Activity snapshot provider.
//!
//! The engine never owns posts or groups; it reads them through this seam
//! from whatever system persists them. Snapshots may be slightly stale —
//! evaluation is idempotent, so a re-run over fresher data converges.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{EngineError, Group, Post, Result};

/// A read-only view of all posts and groups at one point in time.
#[derive(Debug, Clone, Default)]
pub struct ActivitySnapshot {
    /// All posts with their full comment trees
    pub posts: Vec<Post>,
    /// All groups with their member lists
    pub groups: Vec<Group>,
}

/// Source of activity snapshots for achievement evaluation.
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    /// Produce the freshest available snapshot.
    async fn snapshot(&self) -> Result<ActivitySnapshot>;
}

/// In-memory provider for tests and embedded callers.
#[derive(Debug, Default)]
pub struct InMemoryActivityProvider {
    /// Current snapshot
    state: RwLock<ActivitySnapshot>,
}

impl InMemoryActivityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot.
    pub async fn set(&self, snapshot: ActivitySnapshot) {
        let mut state = self.state.write().await;
        *state = snapshot;
    }

    /// Add a post to the held snapshot.
    pub async fn add_post(&self, post: Post) {
        let mut state = self.state.write().await;
        state.posts.push(post);
    }

    /// Add a group to the held snapshot.
    pub async fn add_group(&self, group: Group) {
        let mut state = self.state.write().await;
        state.groups.push(group);
    }
}

#[async_trait]
impl ActivityProvider for InMemoryActivityProvider {
    async fn snapshot(&self) -> Result<ActivitySnapshot> {
        Ok(self.state.read().await.clone())
    }
}

/// Provider that always fails; exercises degraded-evaluation paths.
#[derive(Debug, Default)]
pub struct UnavailableActivityProvider;

#[async_trait]
impl ActivityProvider for UnavailableActivityProvider {
    async fn snapshot(&self) -> Result<ActivitySnapshot> {
        Err(EngineError::Snapshot("activity source unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_in_memory_provider_roundtrip() {
        let provider = InMemoryActivityProvider::new();
        provider.add_post(Post::new("p1", "alice", Utc::now())).await;
        provider.add_group(Group::new("g1", "bob")).await;

        let snapshot = provider.snapshot().await.unwrap();
        assert_eq!(snapshot.posts.len(), 1);
        assert_eq!(snapshot.groups.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_provider_errors() {
        let provider = UnavailableActivityProvider;
        assert!(matches!(
            provider.snapshot().await,
            Err(EngineError::Snapshot(_))
        ));
    }
}
