//! The achievement catalog.
//!
//! A fixed set of one-time badges, each keyed by a stable string id and a
//! named unlock condition. Ids are stable across versions; the frontend
//! keys its badge artwork on them.

use std::collections::HashSet;

use crate::types::{
    Achievement, AchievementCategory, AchievementCondition, AchievementRarity, CatalogError,
};

// Achievement id constants. Stable; never reuse a retired id.

pub const FIRST_POST: &str = "first_post";
pub const PROLIFIC_POSTER: &str = "prolific_poster";
pub const CONTENT_MACHINE: &str = "content_machine";
pub const POPULAR_POST: &str = "popular_post";
pub const VIRAL_POST: &str = "viral_post";
pub const CROWD_FAVORITE: &str = "crowd_favorite";
pub const CONVERSATION_STARTER: &str = "conversation_starter";
pub const FIRST_COMMENT: &str = "first_comment";
pub const ACTIVE_COMMENTER: &str = "active_commenter";
pub const REPLY_GUY: &str = "reply_guy";
pub const WELL_KNOWN: &str = "well_known";
pub const SOCIAL_BUTTERFLY: &str = "social_butterfly";
pub const POPULAR: &str = "popular";
pub const COMMUNITY_BUILDER: &str = "community_builder";
pub const JOINER: &str = "joiner";
pub const EARLY_BIRD: &str = "early_bird";
pub const NIGHT_OWL: &str = "night_owl";
pub const ON_FIRE: &str = "on_fire";
pub const DEDICATED: &str = "dedicated";
pub const UNSTOPPABLE: &str = "unstoppable";
pub const KARMA_MILESTONE_100: &str = "karma_milestone_100";
pub const KARMA_MILESTONE_500: &str = "karma_milestone_500";
pub const KARMA_MILESTONE_1000: &str = "karma_milestone_1000";
pub const KARMA_MILESTONE_10000: &str = "karma_milestone_10000";

/// Immutable catalog of achievements.
#[derive(Debug, Clone)]
pub struct AchievementCatalog {
    /// Entries in stable catalog order
    achievements: Vec<Achievement>,
}

impl AchievementCatalog {
    /// Build a catalog from definitions, validating id uniqueness and
    /// non-negative rewards.
    pub fn new(achievements: Vec<Achievement>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for a in &achievements {
            if !seen.insert(a.id.clone()) {
                return Err(CatalogError::DuplicateId(a.id.clone()));
            }
            if a.karma_reward < 0 {
                return Err(CatalogError::NegativeReward(a.id.clone(), a.karma_reward));
            }
        }
        Ok(Self { achievements })
    }

    /// The standard catalog.
    pub fn standard() -> Self {
        use AchievementCategory::*;
        use AchievementCondition as C;
        use AchievementRarity::*;

        let def = |id: &str,
                   name: &str,
                   description: &str,
                   condition: C,
                   karma_reward: i64,
                   rarity: AchievementRarity,
                   category: AchievementCategory| Achievement {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            condition,
            karma_reward,
            rarity,
            category,
        };

        let achievements = vec![
            // Content
            def(
                FIRST_POST,
                "First Post",
                "Published your first post.",
                C::PostCount { min: 1 },
                10,
                Common,
                Content,
            ),
            def(
                PROLIFIC_POSTER,
                "Prolific Poster",
                "Published 10 posts.",
                C::PostCount { min: 10 },
                25,
                Common,
                Content,
            ),
            def(
                CONTENT_MACHINE,
                "Content Machine",
                "Published 50 posts.",
                C::PostCount { min: 50 },
                100,
                Epic,
                Content,
            ),
            // Engagement on posts
            def(
                POPULAR_POST,
                "Popular Post",
                "A post of yours collected 10 likes.",
                C::MaxPostLikes { min: 10 },
                25,
                Rare,
                Engagement,
            ),
            def(
                VIRAL_POST,
                "Viral Post",
                "A post of yours collected 50 likes.",
                C::MaxPostLikes { min: 50 },
                100,
                Epic,
                Engagement,
            ),
            def(
                CROWD_FAVORITE,
                "Crowd Favorite",
                "Received 100 likes across your posts.",
                C::LikesReceived { min: 100 },
                50,
                Rare,
                Engagement,
            ),
            def(
                CONVERSATION_STARTER,
                "Conversation Starter",
                "3 of your posts sparked 5+ comment discussions.",
                C::PostsWithComments {
                    min_posts: 3,
                    min_comments: 5,
                },
                50,
                Rare,
                Engagement,
            ),
            // Comments and replies
            def(
                FIRST_COMMENT,
                "First Comment",
                "Left your first comment.",
                C::CommentCount { min: 1 },
                5,
                Common,
                Content,
            ),
            def(
                ACTIVE_COMMENTER,
                "Active Commenter",
                "Left 25 comments.",
                C::CommentCount { min: 25 },
                25,
                Common,
                Content,
            ),
            def(
                REPLY_GUY,
                "Deep in the Thread",
                "Replied to other comments 10 times.",
                C::ReplyCount { min: 10 },
                15,
                Common,
                Engagement,
            ),
            def(
                WELL_KNOWN,
                "Well Known",
                "Mentioned by others 5 times.",
                C::MentionCount { min: 5 },
                25,
                Rare,
                Engagement,
            ),
            // Social graph
            def(
                SOCIAL_BUTTERFLY,
                "Social Butterfly",
                "Following 10 people.",
                C::Following { min: 10 },
                15,
                Common,
                Community,
            ),
            def(
                POPULAR,
                "Popular",
                "Followed by 50 people.",
                C::Followers { min: 50 },
                100,
                Epic,
                Community,
            ),
            // Groups
            def(
                COMMUNITY_BUILDER,
                "Community Builder",
                "Your group grew to 10 members.",
                C::GroupsOwned {
                    min_groups: 1,
                    min_members: 10,
                },
                75,
                Epic,
                Community,
            ),
            def(
                JOINER,
                "Joiner",
                "Member of 5 groups.",
                C::GroupsJoined { min: 5 },
                15,
                Common,
                Community,
            ),
            // Temporal
            def(
                EARLY_BIRD,
                "Early Bird",
                "Posted within an hour of joining.",
                C::EarlyBird,
                10,
                Rare,
                Special,
            ),
            def(
                NIGHT_OWL,
                "Night Owl",
                "5 posts between 22:00 and 06:00.",
                C::NightOwl { min_posts: 5 },
                25,
                Rare,
                Special,
            ),
            def(
                ON_FIRE,
                "On Fire",
                "Active 3 days in a row.",
                C::Streak { min_days: 3 },
                25,
                Common,
                Special,
            ),
            def(
                DEDICATED,
                "Dedicated",
                "Active 7 days in a row.",
                C::Streak { min_days: 7 },
                75,
                Rare,
                Special,
            ),
            def(
                UNSTOPPABLE,
                "Unstoppable",
                "Active 30 days in a row.",
                C::Streak { min_days: 30 },
                250,
                Legendary,
                Special,
            ),
            // Karma milestones
            def(
                KARMA_MILESTONE_100,
                "Rising Star",
                "Reached 100 karma.",
                C::KarmaThreshold { min: 100 },
                25,
                Common,
                Milestone,
            ),
            def(
                KARMA_MILESTONE_500,
                "Established",
                "Reached 500 karma.",
                C::KarmaThreshold { min: 500 },
                50,
                Rare,
                Milestone,
            ),
            def(
                KARMA_MILESTONE_1000,
                "Pillar",
                "Reached 1000 karma.",
                C::KarmaThreshold { min: 1000 },
                100,
                Epic,
                Milestone,
            ),
            def(
                KARMA_MILESTONE_10000,
                "Living Legend",
                "Reached 10000 karma.",
                C::KarmaThreshold { min: 10000 },
                500,
                Legendary,
                Milestone,
            ),
        ];

        Self::new(achievements).unwrap_or_else(|_| unreachable!("standard catalog is well-formed"))
    }

    /// Look up an achievement by id.
    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Iterate entries in stable catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_lookup() {
        let catalog = AchievementCatalog::standard();
        let first = catalog.get(FIRST_POST).unwrap();
        assert_eq!(first.karma_reward, 10);
        assert_eq!(first.condition, AchievementCondition::PostCount { min: 1 });

        let milestone = catalog.get(KARMA_MILESTONE_100).unwrap();
        assert_eq!(milestone.karma_reward, 25);
        assert!(catalog.get("no_such_badge").is_none());
    }

    #[test]
    fn test_ids_unique_and_rewards_non_negative() {
        let catalog = AchievementCatalog::standard();
        let mut seen = HashSet::new();
        for a in catalog.iter() {
            assert!(seen.insert(a.id.clone()), "duplicate id {}", a.id);
            assert!(a.karma_reward >= 0);
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let a = AchievementCatalog::standard().get(FIRST_POST).unwrap().clone();
        let result = AchievementCatalog::new(vec![a.clone(), a]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_negative_reward_rejected() {
        let mut a = AchievementCatalog::standard().get(FIRST_POST).unwrap().clone();
        a.karma_reward = -5;
        assert!(matches!(
            AchievementCatalog::new(vec![a]),
            Err(CatalogError::NegativeReward(_, -5))
        ));
    }
}
