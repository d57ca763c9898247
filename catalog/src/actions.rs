//! Action pricing with alias normalization.
//!
//! Call sites across the product refer to the same action under several
//! spellings ("upvote", "upvoted", "liked"); all of them fold onto one
//! canonical name before lookup. Unknown actions deliberately price to 0
//! so new action types can ship ahead of the pricing table without
//! crashing anything.

/// Canonical action names known to the pricing table.
pub const CANONICAL_ACTIONS: [&str; 12] = [
    "post_created",
    "post_liked",
    "post_removed",
    "comment_made",
    "comment_liked",
    "user_followed",
    "mention_received",
    "group_created",
    "group_joined",
    "streak_bonus",
    "achievement_unlocked",
    "profile_completed",
];

/// Normalize raw caller input: trim whitespace, lowercase.
pub fn normalize_action(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Resolve an action name (canonical or legacy alias) to its canonical form.
///
/// Unrecognized names pass through normalized so they can still be recorded
/// in karma history as zero-point events.
pub fn canonical_action(raw: &str) -> String {
    let name = normalize_action(raw);
    let canonical = match name.as_str() {
        "post" | "posted" | "created_post" | "new_post" => "post_created",
        "upvote" | "upvoted" | "like" | "liked" | "like_received" => "post_liked",
        "downvote" | "removed_post" | "deleted_post" => "post_removed",
        "comment" | "commented" | "reply" | "replied" => "comment_made",
        "comment_upvote" | "comment_like" => "comment_liked",
        "follow" | "followed" | "new_follower" => "user_followed",
        "mention" | "mentioned" => "mention_received",
        "created_group" | "new_group" => "group_created",
        "join_group" | "joined_group" => "group_joined",
        "streak" | "daily_streak" => "streak_bonus",
        "badge_unlocked" => "achievement_unlocked",
        other => other,
    };
    canonical.to_string()
}

/// Price an action in karma points.
///
/// Accepts canonical names or aliases interchangeably. Unknown actions are
/// free: the function returns 0 and never errors.
pub fn price_action(raw: &str) -> i64 {
    match canonical_action(raw).as_str() {
        "post_created" => 5,
        "post_liked" => 1,
        "post_removed" => -5,
        "comment_made" => 2,
        "comment_liked" => 1,
        "user_followed" => 2,
        "mention_received" => 1,
        "group_created" => 5,
        "group_joined" => 2,
        "streak_bonus" => 10,
        "profile_completed" => 5,
        // achievement_unlocked events carry the reward as their own points;
        // the action itself prices to 0
        _ => 0,
    }
}
