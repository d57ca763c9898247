//! The achievement evaluator.
//!
//! Tests every catalog condition a user has not yet unlocked against one
//! consistent snapshot of their activity, and returns only the newly
//! qualifying ids. Rewards from the current pass are never fed back into
//! the same pass: a karma-threshold badge funded by this pass's rewards
//! unlocks on the next triggering event. That single-pass rule bounds
//! every evaluation and makes double awards impossible.

use chrono::Utc;
use tracing::debug;

use catalog::{AchievementCatalog, AchievementCondition};

use crate::activity::ActivityCounters;
use crate::config::EvaluationConfig;
use crate::temporal::{is_early_bird, streak_summary};
use crate::types::{Group, Post, User};

/// Evaluates achievement conditions against user activity.
#[derive(Debug, Clone, Default)]
pub struct AchievementEvaluator {
    /// The immutable achievement catalog
    catalog: AchievementCatalog,
    /// Temporal evaluation settings
    config: EvaluationConfig,
}

impl AchievementEvaluator {
    /// Create an evaluator over the standard catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom catalog and settings.
    pub fn with_catalog(catalog: AchievementCatalog, config: EvaluationConfig) -> Self {
        Self { catalog, config }
    }

    /// The catalog this evaluator checks against.
    pub fn catalog(&self) -> &AchievementCatalog {
        &self.catalog
    }

    /// Evaluate all not-yet-unlocked achievements for `user`.
    ///
    /// Collects the activity counters once and shares them across every
    /// predicate. Returns newly qualifying ids in stable catalog order;
    /// already-unlocked achievements are skipped up front and never
    /// re-checked. Calling twice with unchanged inputs returns nothing
    /// the second time.
    pub fn evaluate(&self, user: &User, posts: &[Post], groups: &[Group]) -> Vec<String> {
        let counters = ActivityCounters::collect(&user.id, posts, groups, &self.config);
        self.evaluate_with_counters(user, &counters)
    }

    /// Evaluate against externally maintained counters.
    ///
    /// Used by callers that keep a [`crate::activity::CounterStore`]
    /// up to date at write time instead of re-walking snapshots.
    pub fn evaluate_with_counters(&self, user: &User, counters: &ActivityCounters) -> Vec<String> {
        let unlocked: Vec<String> = self
            .catalog
            .iter()
            .filter(|a| !user.achievements.contains(&a.id))
            .filter(|a| self.condition_met(user, counters, a.condition))
            .map(|a| a.id.clone())
            .collect();

        if !unlocked.is_empty() {
            debug!(
                user_id = %user.id,
                count = unlocked.len(),
                "Achievements newly qualified"
            );
        }
        unlocked
    }

    /// Test one condition against the shared counters.
    ///
    /// Karma thresholds read `user.karma` as supplied, i.e. the value at
    /// the start of the evaluation cycle, before any reward from this
    /// pass is applied.
    fn condition_met(
        &self,
        user: &User,
        counters: &ActivityCounters,
        condition: AchievementCondition,
    ) -> bool {
        use AchievementCondition as C;
        match condition {
            C::PostCount { min } => counters.post_count >= min,
            C::MaxPostLikes { min } => counters.max_post_likes() >= min,
            C::PostsWithComments {
                min_posts,
                min_comments,
            } => counters.posts_with_comments(min_comments) >= min_posts,
            C::LikesReceived { min } => counters.likes_received() >= min,
            C::CommentCount { min } => counters.comment_count >= min,
            C::ReplyCount { min } => counters.reply_count >= min,
            C::MentionCount { min } => counters.mention_count >= min,
            C::Following { min } => user.following.len() as u64 >= min,
            C::Followers { min } => user.followers.len() as u64 >= min,
            C::GroupsOwned {
                min_groups,
                min_members,
            } => counters.owned_groups_with(min_members) >= min_groups,
            C::GroupsJoined { min } => counters.groups_joined >= min,
            C::EarlyBird => counters
                .earliest_post
                .is_some_and(|earliest| is_early_bird(user.joined_at, earliest, &self.config)),
            C::NightOwl { min_posts } => counters.night_post_count >= min_posts,
            // Longest, not current: unlocks must stay monotone as activity
            // grows, and the current streak resets after a gap.
            C::Streak { min_days } => {
                streak_summary(&counters.active_days, Utc::now().date_naive()).longest >= min_days
            }
            C::KarmaThreshold { min } => user.karma >= min,
        }
    }
}
