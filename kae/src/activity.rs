//! Per-user activity counters.
//!
//! Every achievement predicate reads from one [`ActivityCounters`] value,
//! collected in a single pass over the post and group snapshots instead of
//! re-walking the comment trees per achievement. [`CounterStore`] keeps the
//! same counters incrementally for callers that update at write time.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use crate::config::EvaluationConfig;
use crate::temporal::is_night_post;
use crate::types::{Comment, Group, Post};

/// Depth-first visit of every node in a comment forest.
///
/// Uses an explicit stack so pathologically deep reply chains cannot
/// overflow the call stack. Each node is visited exactly once.
pub fn walk_comments<'a, F>(roots: &'a [Comment], mut visit: F)
where
    F: FnMut(&'a Comment),
{
    let mut stack: Vec<&Comment> = roots.iter().rev().collect();
    while let Some(comment) = stack.pop() {
        visit(comment);
        for reply in comment.replies.iter().rev() {
            stack.push(reply);
        }
    }
}

/// Aggregated activity counters for one user.
#[derive(Debug, Clone, Default)]
pub struct ActivityCounters {
    /// Posts authored
    pub post_count: u64,
    /// Like totals per authored post
    pub per_post_likes: HashMap<String, u64>,
    /// Comment-tree node totals per authored post
    pub per_post_comments: HashMap<String, u64>,
    /// Comments authored, at any tree depth
    pub comment_count: u64,
    /// Authored comments that reply to another comment
    pub reply_count: u64,
    /// Comments by anyone that mention this user
    pub mention_count: u64,
    /// Groups this user is a member of
    pub groups_joined: u64,
    /// Member counts per group this user created
    pub owned_group_members: HashMap<String, u64>,
    /// Earliest authored post
    pub earliest_post: Option<DateTime<Utc>>,
    /// Authored posts inside the night window
    pub night_post_count: u64,
    /// Distinct calendar days with an authored post or comment
    pub active_days: BTreeSet<NaiveDate>,
}

impl ActivityCounters {
    /// Collect counters for `user_id` in one pass over the snapshots.
    ///
    /// O(P + C + G) for P posts, C comment-tree nodes, G group entries.
    pub fn collect(
        user_id: &str,
        posts: &[Post],
        groups: &[Group],
        config: &EvaluationConfig,
    ) -> Self {
        let mut counters = Self::default();

        for post in posts {
            let authored = post.user_id == user_id;
            if authored {
                counters.note_own_post(post.id.clone(), post.timestamp, config);
                counters.set_post_likes(&post.id, post.likes.len() as u64);
            }

            let mut tree_nodes: u64 = 0;
            walk_comments(&post.comments, |comment| {
                tree_nodes += 1;
                if comment.user_id == user_id {
                    counters.note_own_comment(comment.timestamp, comment.parent_id.is_some());
                }
                if comment.mentions.contains(user_id) {
                    counters.mention_count += 1;
                }
            });
            if authored {
                counters.per_post_comments.insert(post.id.clone(), tree_nodes);
            }
        }

        for group in groups {
            if group.has_member(user_id) {
                counters.groups_joined += 1;
            }
            if group.created_by == user_id {
                counters
                    .owned_group_members
                    .insert(group.id.clone(), group.members.len() as u64);
            }
        }

        counters
    }

    /// Record a newly authored post.
    pub fn note_own_post(
        &mut self,
        post_id: String,
        timestamp: DateTime<Utc>,
        config: &EvaluationConfig,
    ) {
        self.post_count += 1;
        self.earliest_post = Some(match self.earliest_post {
            Some(t) if t <= timestamp => t,
            _ => timestamp,
        });
        if is_night_post(timestamp, config) {
            self.night_post_count += 1;
        }
        self.active_days.insert(timestamp.date_naive());
        self.per_post_likes.entry(post_id).or_insert(0);
    }

    /// Record a newly authored comment.
    pub fn note_own_comment(&mut self, timestamp: DateTime<Utc>, is_reply: bool) {
        self.comment_count += 1;
        if is_reply {
            self.reply_count += 1;
        }
        self.active_days.insert(timestamp.date_naive());
    }

    /// Set the current like total of an authored post.
    pub fn set_post_likes(&mut self, post_id: &str, likes: u64) {
        self.per_post_likes.insert(post_id.to_string(), likes);
    }

    /// Highest like count across authored posts.
    pub fn max_post_likes(&self) -> u64 {
        self.per_post_likes.values().copied().max().unwrap_or(0)
    }

    /// Total likes received across authored posts.
    pub fn likes_received(&self) -> u64 {
        self.per_post_likes.values().sum()
    }

    /// Authored posts whose discussion reached `min_comments` nodes.
    pub fn posts_with_comments(&self, min_comments: u64) -> u64 {
        self.per_post_comments
            .values()
            .filter(|&&n| n >= min_comments)
            .count() as u64
    }

    /// Owned groups that reached `min_members` members.
    pub fn owned_groups_with(&self, min_members: u64) -> u64 {
        self.owned_group_members
            .values()
            .filter(|&&n| n >= min_members)
            .count() as u64
    }
}

/// Incrementally maintained per-user counters.
///
/// Write paths feed it one update per event; `counters_for` then serves
/// evaluation without re-walking the snapshots. `rebuild` restores parity
/// with a fresh [`ActivityCounters::collect`] after a bulk import.
#[derive(Debug, Default)]
pub struct CounterStore {
    /// Counters keyed by user id
    by_user: DashMap<String, ActivityCounters>,
    /// Evaluation settings used for time-window classification
    config: EvaluationConfig,
}

impl CounterStore {
    /// Create an empty store.
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            by_user: DashMap::new(),
            config,
        }
    }

    /// A post was published.
    pub fn record_post(&self, user_id: &str, post_id: &str, timestamp: DateTime<Utc>) {
        let mut entry = self.by_user.entry(user_id.to_string()).or_default();
        entry.note_own_post(post_id.to_string(), timestamp, &self.config);
    }

    /// A comment was made; `post_author` gets the discussion-size credit.
    pub fn record_comment(
        &self,
        user_id: &str,
        post_author: &str,
        post_id: &str,
        timestamp: DateTime<Utc>,
        is_reply: bool,
    ) {
        {
            let mut entry = self.by_user.entry(user_id.to_string()).or_default();
            entry.note_own_comment(timestamp, is_reply);
        }
        let mut author = self.by_user.entry(post_author.to_string()).or_default();
        *author
            .per_post_comments
            .entry(post_id.to_string())
            .or_insert(0) += 1;
    }

    /// A post's like total changed.
    pub fn record_likes(&self, post_author: &str, post_id: &str, total_likes: u64) {
        let mut entry = self.by_user.entry(post_author.to_string()).or_default();
        entry.set_post_likes(post_id, total_likes);
    }

    /// A comment mentioned a user.
    pub fn record_mention(&self, mentioned_user: &str) {
        let mut entry = self.by_user.entry(mentioned_user.to_string()).or_default();
        entry.mention_count += 1;
    }

    /// A user joined a group.
    pub fn record_group_joined(&self, user_id: &str) {
        let mut entry = self.by_user.entry(user_id.to_string()).or_default();
        entry.groups_joined += 1;
    }

    /// An owned group's member total changed (creation counts as joining).
    pub fn record_owned_group(&self, owner_id: &str, group_id: &str, member_count: u64) {
        let mut entry = self.by_user.entry(owner_id.to_string()).or_default();
        entry
            .owned_group_members
            .insert(group_id.to_string(), member_count);
    }

    /// Replace a user's counters from full snapshots.
    pub fn rebuild(&self, user_id: &str, posts: &[Post], groups: &[Group]) {
        let counters = ActivityCounters::collect(user_id, posts, groups, &self.config);
        self.by_user.insert(user_id.to_string(), counters);
    }

    /// Current counters for a user (empty if never seen).
    pub fn counters_for(&self, user_id: &str) -> ActivityCounters {
        self.by_user
            .get(user_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}
