//! Core types for the Karma & Achievement Engine.
//!
//! Aggregate snapshots (`Post`, `Comment`, `Group`) are read-only inputs
//! owned by the surrounding content system; the engine never mutates them.
//! `User` is the one mutable record, owned by the [`crate::ledger::KarmaLedger`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded karma change. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarmaEvent {
    /// Unique event ID
    pub id: String,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
    /// Canonical action name (after alias resolution)
    pub action_type: String,
    /// Signed karma delta
    pub points: i64,
    /// Human-readable description
    pub description: String,
    /// Post/comment/user the action refers to, if any
    pub related_id: Option<String>,
}

impl KarmaEvent {
    /// Create a new event stamped with the current time.
    pub fn new(
        action_type: impl Into<String>,
        points: i64,
        description: impl Into<String>,
        related_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            action_type: action_type.into(),
            points,
            description: description.into(),
            related_id,
        }
    }
}

/// A user's reputation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: String,
    /// Cumulative karma, always equal to the sum of history points
    pub karma: i64,
    /// Append-only event history, in acceptance order
    pub karma_history: Vec<KarmaEvent>,
    /// Unlocked achievement ids; grows monotonically, never revoked
    pub achievements: HashSet<String>,
    /// Ids of users this user follows
    pub following: HashSet<String>,
    /// Ids of users following this user
    pub followers: HashSet<String>,
    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user joining now.
    pub fn new(id: impl Into<String>) -> Self {
        Self::joined_at(id, Utc::now())
    }

    /// Create a fresh user with an explicit join time.
    pub fn joined_at(id: impl Into<String>, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            karma: 0,
            karma_history: Vec::new(),
            achievements: HashSet::new(),
            following: HashSet::new(),
            followers: HashSet::new(),
            joined_at,
        }
    }

    /// Check the ledger invariant: karma equals the sum of history points.
    pub fn verify_ledger(&self) -> Result<()> {
        let total: i64 = self.karma_history.iter().map(|e| e.points).sum();
        if total != self.karma {
            return Err(EngineError::Validation(format!(
                "karma {} disagrees with history sum {} for user {}",
                self.karma, total, self.id
            )));
        }
        Ok(())
    }
}

/// A comment in a post's discussion tree. Replies nest recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment ID
    pub id: String,
    /// Author
    pub user_id: String,
    /// When the comment was made
    pub timestamp: DateTime<Utc>,
    /// Parent comment if this is a reply
    pub parent_id: Option<String>,
    /// Users mentioned in the comment body
    #[serde(default)]
    pub mentions: HashSet<String>,
    /// Nested replies
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Create a top-level comment.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            timestamp,
            parent_id: None,
            mentions: HashSet::new(),
            replies: Vec::new(),
        }
    }

    /// Create a reply to another comment.
    pub fn reply_to(
        id: impl Into<String>,
        user_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::new(id, user_id, timestamp)
        }
    }

    /// Add a mentioned user.
    pub fn with_mention(mut self, user_id: impl Into<String>) -> Self {
        self.mentions.insert(user_id.into());
        self
    }

    /// Attach a nested reply.
    pub fn with_reply(mut self, reply: Comment) -> Self {
        self.replies.push(reply);
        self
    }
}

/// A post with its likes and full comment tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique post ID
    pub id: String,
    /// Author
    pub user_id: String,
    /// When the post was published
    pub timestamp: DateTime<Utc>,
    /// Ids of users who liked the post
    #[serde(default)]
    pub likes: HashSet<String>,
    /// Root comments of the discussion tree
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Feed score (owned by the feed system, opaque here)
    #[serde(default)]
    pub score: f64,
}

impl Post {
    /// Create a post with no engagement yet.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            timestamp,
            likes: HashSet::new(),
            comments: Vec::new(),
            tags: Vec::new(),
            score: 0.0,
        }
    }

    /// Add a like.
    pub fn with_like(mut self, user_id: impl Into<String>) -> Self {
        self.likes.insert(user_id.into());
        self
    }

    /// Add a root comment.
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }
}

/// Role of a user within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    /// Created the group
    Owner,
    /// Moderates the group
    Moderator,
    /// Regular member
    Member,
}

/// A group membership entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    /// Member user ID
    pub user_id: String,
    /// Role within the group
    pub role: GroupRole,
}

/// A community group snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique group ID
    pub id: String,
    /// Creator user ID
    pub created_by: String,
    /// Current members with roles
    #[serde(default)]
    pub members: Vec<GroupMember>,
    /// Discussion topics
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Group {
    /// Create a group; the creator becomes its owner member.
    pub fn new(id: impl Into<String>, created_by: impl Into<String>) -> Self {
        let created_by = created_by.into();
        Self {
            id: id.into(),
            members: vec![GroupMember {
                user_id: created_by.clone(),
                role: GroupRole::Owner,
            }],
            created_by,
            topics: Vec::new(),
        }
    }

    /// Add a regular member.
    pub fn with_member(mut self, user_id: impl Into<String>) -> Self {
        self.members.push(GroupMember {
            user_id: user_id.into(),
            role: GroupRole::Member,
        });
        self
    }

    /// Whether the user appears in the member list.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }
}

/// Error types for the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Caller contract violation in supplied aggregates
    #[error("Validation error: {0}")]
    Validation(String),

    /// Award requested for a user the ledger does not know
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// Activity snapshot could not be produced
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Catalog construction error
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_ledger() {
        let mut user = User::new("u1");
        user.karma_history.push(KarmaEvent::new("post_created", 5, "posted", None));
        user.karma_history.push(KarmaEvent::new("post_liked", 1, "liked", None));
        assert!(user.verify_ledger().is_err());

        user.karma = 6;
        assert!(user.verify_ledger().is_ok());
    }

    #[test]
    fn test_group_creator_is_member() {
        let group = Group::new("g1", "u1").with_member("u2");
        assert!(group.has_member("u1"));
        assert!(group.has_member("u2"));
        assert!(!group.has_member("u3"));
        assert_eq!(group.members[0].role, GroupRole::Owner);
    }

    #[test]
    fn test_event_serialization() {
        let event = KarmaEvent::new("post_created", 5, "Published a post", Some("p1".into()));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: KarmaEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
