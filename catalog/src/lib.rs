//! Static Catalogs for the Karma & Achievement Engine
//!
//! This crate holds the process-wide immutable reputation configuration:
//!
//! - **Action pricing**: canonical action names, legacy alias folding, and
//!   the points table ([`price_action`])
//! - **Rank ladder**: karma-threshold tiers from Newcomer to Legend
//!   ([`RankLadder`])
//! - **Achievement catalog**: one-time badges with named unlock conditions
//!   ([`AchievementCatalog`])
//!
//! All catalogs are loaded once and never mutated at runtime. Rank lookup
//! and action pricing are pure, deterministic functions.
//!
//! # Example
//!
//! ```
//! use catalog::{price_action, RankLadder};
//!
//! assert_eq!(price_action("upvote"), price_action("post_liked"));
//!
//! let ladder = RankLadder::standard();
//! assert_eq!(ladder.current_rank(0).title, "Newcomer");
//! assert_eq!(ladder.next_rank(0).unwrap().title, "Active Member");
//! ```

pub mod achievements;
pub mod actions;
pub mod ranks;
pub mod types;

// Re-export main types
pub use achievements::AchievementCatalog;
pub use actions::{canonical_action, normalize_action, price_action};
pub use ranks::RankLadder;
pub use types::*;
