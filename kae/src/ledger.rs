//! The karma ledger.
//!
//! Owns the mutable `User` records and drives the award pipeline: price
//! the action, append the karma event, re-evaluate achievements against a
//! fresh activity snapshot, and append the reward events as one batch.
//!
//! Awards for the same user are serialized by a per-user write lock held
//! across the whole read-modify-write; awards for different users run in
//! parallel. Events for a user therefore apply in acceptance order.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use catalog::{canonical_action, price_action, AchievementRarity, Rank, RankLadder};

use crate::config::EngineConfig;
use crate::evaluator::AchievementEvaluator;
use crate::snapshot::ActivityProvider;
use crate::types::{EngineError, KarmaEvent, Result, User};

/// A newly unlocked achievement, surfaced for notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    /// Achievement id
    pub id: String,
    /// Display name
    pub name: String,
    /// Karma bonus granted
    pub karma_reward: i64,
    /// Rarity tier
    pub rarity: AchievementRarity,
}

/// Result of one award call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardOutcome {
    /// The karma event recorded for the triggering action
    pub event: KarmaEvent,
    /// Achievements unlocked in this cycle, in catalog order
    pub unlocked: Vec<UnlockedAchievement>,
    /// Karma total after the action and all rewards
    pub karma: i64,
    /// Current rank title after this award
    pub rank_title: String,
    /// Next attainable rank title, if any
    pub next_rank_title: Option<String>,
    /// False when the achievement pass was skipped (snapshot failure or
    /// disabled); the karma event above is still applied
    pub evaluated: bool,
}

/// The karma ledger.
pub struct KarmaLedger {
    /// Engine configuration
    config: EngineConfig,
    /// Achievement evaluator
    evaluator: AchievementEvaluator,
    /// Rank ladder
    ladder: RankLadder,
    /// Activity snapshot source
    provider: Arc<dyn ActivityProvider>,
    /// User records, one lock per user
    users: DashMap<String, Arc<RwLock<User>>>,
}

impl KarmaLedger {
    /// Create a ledger over the standard catalogs.
    pub fn new(provider: Arc<dyn ActivityProvider>) -> Self {
        Self::with_config(EngineConfig::default(), provider)
    }

    /// Create with custom configuration.
    pub fn with_config(config: EngineConfig, provider: Arc<dyn ActivityProvider>) -> Self {
        let evaluator = AchievementEvaluator::with_catalog(
            catalog::AchievementCatalog::standard(),
            config.evaluation.clone(),
        );
        Self {
            config,
            evaluator,
            ladder: RankLadder::standard(),
            provider,
            users: DashMap::new(),
        }
    }

    /// Register a user record.
    ///
    /// Fails fast if the record violates the ledger invariant or the id
    /// is already registered.
    pub fn register(&self, user: User) -> Result<()> {
        user.verify_ledger()?;
        let id = user.id.clone();
        if self.users.contains_key(&id) {
            return Err(EngineError::Validation(format!(
                "user {} already registered",
                id
            )));
        }
        debug!(user_id = %id, "Registering user");
        self.users.insert(id, Arc::new(RwLock::new(user)));
        Ok(())
    }

    /// Award karma for an action and evaluate achievements.
    ///
    /// The action is priced through the catalog (unknown actions price to
    /// 0 and are still recorded), the event is folded into the user's
    /// total, and a fresh snapshot drives one evaluator pass. Rewards
    /// from newly unlocked achievements are appended as a single batch;
    /// they are not fed back into this pass.
    pub async fn award(
        &self,
        user_id: &str,
        action: &str,
        description: &str,
        related_id: Option<String>,
    ) -> Result<AwardOutcome> {
        let entry = self
            .users
            .get(user_id)
            .ok_or_else(|| EngineError::UnknownUser(user_id.to_string()))?
            .clone();

        // Held across the whole read-modify-write: same-user awards
        // serialize, other users proceed.
        let mut user = entry.write().await;

        let action_type = canonical_action(action);
        let points = price_action(&action_type);
        let event = KarmaEvent::new(&action_type, points, description, related_id);
        user.karma_history.push(event.clone());
        user.karma += points;

        info!(
            user_id = %user_id,
            action = %action_type,
            points,
            karma = user.karma,
            "Karma awarded"
        );

        let (unlocked, evaluated) = if self.config.ledger.evaluate_on_award {
            self.unlock_pass(&mut user).await
        } else {
            (Vec::new(), false)
        };

        Ok(self.outcome(&user, event, unlocked, evaluated))
    }

    /// Re-run achievement evaluation without a triggering action.
    ///
    /// Used when activity changes outside the karma path (e.g. someone
    /// liked a post) and by callers applying the next-cycle rule after a
    /// reward batch crossed a karma threshold.
    pub async fn reevaluate(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>> {
        let entry = self
            .users
            .get(user_id)
            .ok_or_else(|| EngineError::UnknownUser(user_id.to_string()))?
            .clone();

        let mut user = entry.write().await;
        let (unlocked, evaluated) = self.unlock_pass(&mut user).await;
        if !evaluated {
            return Err(EngineError::Snapshot(format!(
                "no activity snapshot for reevaluation of user {}",
                user_id
            )));
        }
        Ok(unlocked)
    }

    /// One evaluator pass plus the reward batch.
    ///
    /// A snapshot failure is degraded, not fatal: the already-applied
    /// karma stays, the pass reports no unlocks and `false`.
    async fn unlock_pass(&self, user: &mut User) -> (Vec<UnlockedAchievement>, bool) {
        let snapshot = match self.provider.snapshot().await {
            Ok(s) => s,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Skipping achievement pass");
                return (Vec::new(), false);
            }
        };

        let new_ids = self
            .evaluator
            .evaluate(user, &snapshot.posts, &snapshot.groups);

        let mut unlocked = Vec::with_capacity(new_ids.len());
        for id in new_ids {
            let Some(achievement) = self.evaluator.catalog().get(&id) else {
                continue;
            };
            let reward = KarmaEvent::new(
                &self.config.ledger.reward_action_type,
                achievement.karma_reward,
                format!("Achievement unlocked: {}", achievement.name),
                Some(id.clone()),
            );
            user.karma += reward.points;
            user.karma_history.push(reward);
            user.achievements.insert(id.clone());

            info!(
                user_id = %user.id,
                achievement = %id,
                reward = achievement.karma_reward,
                "Achievement unlocked"
            );
            unlocked.push(UnlockedAchievement {
                id,
                name: achievement.name.clone(),
                karma_reward: achievement.karma_reward,
                rarity: achievement.rarity,
            });
        }

        (unlocked, true)
    }

    fn outcome(
        &self,
        user: &User,
        event: KarmaEvent,
        unlocked: Vec<UnlockedAchievement>,
        evaluated: bool,
    ) -> AwardOutcome {
        AwardOutcome {
            event,
            unlocked,
            karma: user.karma,
            rank_title: self.ladder.current_rank(user.karma).title.clone(),
            next_rank_title: self.ladder.next_rank(user.karma).map(|r| r.title.clone()),
            evaluated,
        }
    }

    /// Current karma total.
    pub async fn karma_of(&self, user_id: &str) -> Result<i64> {
        Ok(self.user_snapshot(user_id).await?.karma)
    }

    /// Current rank.
    pub async fn rank_of(&self, user_id: &str) -> Result<Rank> {
        let user = self.user_snapshot(user_id).await?;
        Ok(self.ladder.current_rank(user.karma).clone())
    }

    /// Full karma history in acceptance order.
    pub async fn history_of(&self, user_id: &str) -> Result<Vec<KarmaEvent>> {
        Ok(self.user_snapshot(user_id).await?.karma_history)
    }

    /// Unlocked achievement ids.
    pub async fn achievements_of(&self, user_id: &str) -> Result<Vec<String>> {
        let user = self.user_snapshot(user_id).await?;
        let mut ids: Vec<String> = user.achievements.into_iter().collect();
        ids.sort();
        Ok(ids)
    }

    /// A point-in-time copy of the user record.
    pub async fn user_snapshot(&self, user_id: &str) -> Result<User> {
        let entry = self
            .users
            .get(user_id)
            .ok_or_else(|| EngineError::UnknownUser(user_id.to_string()))?
            .clone();
        let user = entry.read().await;
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::snapshot::{InMemoryActivityProvider, UnavailableActivityProvider};
    use crate::types::Post;

    fn test_user(id: &str) -> User {
        User::joined_at(id, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    async fn verify_invariant(ledger: &KarmaLedger, user_id: &str) {
        let user = ledger.user_snapshot(user_id).await.unwrap();
        user.verify_ledger().unwrap();
    }

    #[tokio::test]
    async fn test_first_post_flow() {
        let provider = Arc::new(InMemoryActivityProvider::new());
        let ledger = KarmaLedger::new(provider.clone());
        ledger.register(test_user("alice")).unwrap();

        let post_time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        provider.add_post(Post::new("p1", "alice", post_time)).await;

        let outcome = ledger
            .award("alice", "post_created", "Published a post", Some("p1".into()))
            .await
            .unwrap();

        assert_eq!(outcome.event.points, 5);
        assert!(outcome
            .unlocked
            .iter()
            .any(|u| u.id == catalog::achievements::FIRST_POST));
        // 5 for the post + 10 for the badge, still Newcomer (threshold 100)
        assert_eq!(outcome.karma, 15);
        assert_eq!(outcome.rank_title, "Newcomer");
        assert_eq!(outcome.next_rank_title.as_deref(), Some("Active Member"));
        verify_invariant(&ledger, "alice").await;
    }

    #[tokio::test]
    async fn test_karma_matches_history_after_batch() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        ledger.register(test_user("alice")).unwrap();

        for action in ["post_created", "upvote", "comment_made", "mystery_action"] {
            ledger.award("alice", action, "activity", None).await.unwrap();
        }
        verify_invariant(&ledger, "alice").await;
    }

    #[tokio::test]
    async fn test_alias_awards_canonical_event() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        ledger.register(test_user("alice")).unwrap();

        let outcome = ledger.award("alice", "Upvote", "liked", None).await.unwrap();
        assert_eq!(outcome.event.action_type, "post_liked");
        assert_eq!(outcome.event.points, 1);
    }

    #[tokio::test]
    async fn test_unknown_action_records_zero_points() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        ledger.register(test_user("alice")).unwrap();

        let outcome = ledger
            .award("alice", "brand_new_thing", "unpriced", None)
            .await
            .unwrap();
        assert_eq!(outcome.event.points, 0);
        assert_eq!(outcome.karma, 0);

        let history = ledger.history_of("alice").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action_type, "brand_new_thing");
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        assert!(matches!(
            ledger.award("nobody", "post_created", "x", None).await,
            Err(EngineError::UnknownUser(_))
        ));
    }

    #[tokio::test]
    async fn test_register_validates_invariant_and_duplicates() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));

        let mut broken = test_user("alice");
        broken.karma = 42; // empty history
        assert!(matches!(
            ledger.register(broken),
            Err(EngineError::Validation(_))
        ));

        ledger.register(test_user("bob")).unwrap();
        assert!(matches!(
            ledger.register(test_user("bob")),
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_milestone_unlocks_when_threshold_crossed() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        ledger.register(test_user("alice")).unwrap();

        // Nine streak bonuses: karma 90, no milestone yet.
        for _ in 0..9 {
            let outcome = ledger.award("alice", "streak_bonus", "streak", None).await.unwrap();
            assert!(outcome.unlocked.is_empty());
        }
        assert_eq!(ledger.karma_of("alice").await.unwrap(), 90);

        // Tenth bonus crosses 100: the milestone unlocks in this cycle,
        // evaluated against the pre-reward total of exactly 100.
        let outcome = ledger.award("alice", "streak_bonus", "streak", None).await.unwrap();
        assert_eq!(outcome.unlocked.len(), 1);
        assert_eq!(outcome.unlocked[0].id, catalog::achievements::KARMA_MILESTONE_100);
        assert_eq!(outcome.karma, 125);
        assert_eq!(outcome.rank_title, "Active Member");
        verify_invariant(&ledger, "alice").await;
    }

    #[tokio::test]
    async fn test_reward_not_fed_back_into_same_pass() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        let mut user = test_user("alice");
        // History priced at 495: next streak bonus lands exactly on 505.
        for _ in 0..45 {
            user.karma_history
                .push(KarmaEvent::new("streak_bonus", 11, "seed", None));
        }
        user.karma_history
            .push(KarmaEvent::new("post_created", 0, "seed", None));
        user.karma = 495;
        user.achievements
            .insert(catalog::achievements::KARMA_MILESTONE_100.to_string());
        ledger.register(user).unwrap();

        let outcome = ledger.award("alice", "streak_bonus", "streak", None).await.unwrap();
        // 505 pre-reward unlocks the 500 milestone (+50), landing on 555.
        // The 1000 milestone must wait for a later cycle even though other
        // rewards could eventually fund it.
        assert_eq!(outcome.unlocked.len(), 1);
        assert_eq!(outcome.unlocked[0].id, catalog::achievements::KARMA_MILESTONE_500);
        assert_eq!(outcome.karma, 555);
        verify_invariant(&ledger, "alice").await;
    }

    #[tokio::test]
    async fn test_reevaluate_after_external_activity() {
        let provider = Arc::new(InMemoryActivityProvider::new());
        let ledger = KarmaLedger::new(provider.clone());
        ledger.register(test_user("alice")).unwrap();

        let post_time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut post = Post::new("p1", "alice", post_time);
        for i in 0..10 {
            post = post.with_like(format!("fan{}", i));
        }
        provider.add_post(post).await;

        let unlocked = ledger.reevaluate("alice").await.unwrap();
        let ids: Vec<&str> = unlocked.iter().map(|u| u.id.as_str()).collect();
        assert!(ids.contains(&catalog::achievements::FIRST_POST));
        assert!(ids.contains(&catalog::achievements::POPULAR_POST));

        // Unchanged inputs: nothing new.
        assert!(ledger.reevaluate("alice").await.unwrap().is_empty());
        verify_invariant(&ledger, "alice").await;
    }

    #[tokio::test]
    async fn test_snapshot_failure_keeps_karma() {
        let ledger = KarmaLedger::new(Arc::new(UnavailableActivityProvider));
        ledger.register(test_user("alice")).unwrap();

        let outcome = ledger
            .award("alice", "post_created", "posted", None)
            .await
            .unwrap();
        assert!(!outcome.evaluated);
        assert!(outcome.unlocked.is_empty());
        assert_eq!(outcome.karma, 5);
        verify_invariant(&ledger, "alice").await;
    }

    #[tokio::test]
    async fn test_concurrent_awards_serialize_per_user() {
        let ledger = Arc::new(KarmaLedger::new(Arc::new(InMemoryActivityProvider::new())));
        ledger.register(test_user("alice")).unwrap();
        ledger.register(test_user("bob")).unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let ledger = ledger.clone();
            let user = if i % 2 == 0 { "alice" } else { "bob" };
            handles.push(tokio::spawn(async move {
                ledger.award(user, "comment_made", "comment", None).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.karma_of("alice").await.unwrap(), 20);
        assert_eq!(ledger.karma_of("bob").await.unwrap(), 20);
        verify_invariant(&ledger, "alice").await;
        verify_invariant(&ledger, "bob").await;
    }

    #[tokio::test]
    async fn test_outcome_serializes() {
        let ledger = KarmaLedger::new(Arc::new(InMemoryActivityProvider::new()));
        ledger.register(test_user("alice")).unwrap();
        let outcome = ledger.award("alice", "post_liked", "liked", None).await.unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["karma"], 1);
        assert_eq!(json["rank_title"], "Newcomer");
    }
}
