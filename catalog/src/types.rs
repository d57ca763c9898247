//! Core types for the karma catalogs.
//!
//! These types model the static reputation configuration: the rank ladder
//! and the achievement catalog with its named unlock conditions.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the frontend.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A reputation tier in the rank ladder.
///
/// Ranks form a strictly increasing ladder over karma thresholds; the
/// lowest rank always starts at 0 so every karma value maps to a rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Rank {
    /// Display title (e.g. "Newcomer", "Legend")
    pub title: String,
    /// Inclusive karma lower bound for this rank
    pub min_karma: i64,
    /// Perks unlocked at this rank
    pub benefits: Vec<String>,
}

impl Rank {
    /// Create a rank with its benefit list.
    pub fn new(title: impl Into<String>, min_karma: i64, benefits: &[&str]) -> Self {
        Self {
            title: title.into(),
            min_karma,
            benefits: benefits.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// Rarity tier of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AchievementRarity {
    /// Most users unlock these
    Common,
    /// Requires sustained participation
    Rare,
    /// Requires significant dedication
    Epic,
    /// Top of the ladder
    Legendary,
}

/// Grouping category for an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    /// Karma and count milestones
    Milestone,
    /// Likes, comments, social graph
    Engagement,
    /// Authored posts and comments
    Content,
    /// Groups and membership
    Community,
    /// Temporal and one-off conditions
    Special,
}

/// Named unlock condition for an achievement.
///
/// Conditions are code, not user-editable data: each variant names a
/// predicate the evaluator knows how to test against a user's activity
/// counters. Thresholds are carried inline so the catalog stays a single
/// source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AchievementCondition {
    /// Authored at least this many posts
    PostCount { min: u64 },
    /// A single post received at least this many likes
    MaxPostLikes { min: u64 },
    /// At least `min_posts` posts each carrying `min_comments`+ comments
    PostsWithComments { min_posts: u64, min_comments: u64 },
    /// Total likes received across all authored posts
    LikesReceived { min: u64 },
    /// Authored at least this many comments (all tree depths)
    CommentCount { min: u64 },
    /// Authored at least this many replies (comments with a parent)
    ReplyCount { min: u64 },
    /// Mentioned in at least this many comments
    MentionCount { min: u64 },
    /// Following at least this many users
    Following { min: u64 },
    /// Followed by at least this many users
    Followers { min: u64 },
    /// Owns at least `min_groups` groups with `min_members`+ members each
    GroupsOwned { min_groups: u64, min_members: u64 },
    /// Member of at least this many groups
    GroupsJoined { min: u64 },
    /// First post shortly after joining (latency limit is engine config)
    EarlyBird,
    /// At least this many posts in the night window (22:00-06:00)
    NightOwl { min_posts: u64 },
    /// Longest streak of consecutive active calendar days
    Streak { min_days: u64 },
    /// Cumulative karma at or above this threshold
    KarmaThreshold { min: i64 },
}

/// A one-time-unlockable badge.
///
/// Unlocking is idempotent and never revoked; the reward is granted once
/// as a karma event by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Achievement {
    /// Stable string id (e.g. "first_post")
    pub id: String,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Unlock predicate
    pub condition: AchievementCondition,
    /// Karma bonus granted on unlock (never negative)
    pub karma_reward: i64,
    /// Rarity tier
    pub rarity: AchievementRarity,
    /// Grouping category
    pub category: AchievementCategory,
}

/// Error types for catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two catalog entries share an id
    #[error("Duplicate achievement id: {0}")]
    DuplicateId(String),

    /// An achievement carries a negative reward
    #[error("Negative karma reward for achievement {0}: {1}")]
    NegativeReward(String, i64),

    /// Rank ladder is empty
    #[error("Rank ladder is empty")]
    EmptyLadder,

    /// Ladder does not start at zero karma
    #[error("Lowest rank must start at 0 karma, found {0}")]
    MissingFloor(i64),

    /// Ladder thresholds are not strictly increasing
    #[error("Rank thresholds must be strictly increasing: {0} then {1}")]
    UnorderedLadder(i64, i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_construction() {
        let rank = Rank::new("Newcomer", 0, &["Create posts", "Comment"]);
        assert_eq!(rank.title, "Newcomer");
        assert_eq!(rank.min_karma, 0);
        assert_eq!(rank.benefits.len(), 2);
    }

    #[test]
    fn test_condition_serialization() {
        let cond = AchievementCondition::KarmaThreshold { min: 100 };
        let json = serde_json::to_string(&cond).unwrap();
        assert!(json.contains("karma_threshold"));
        let parsed: AchievementCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cond);
    }
}
