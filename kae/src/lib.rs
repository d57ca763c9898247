//! Karma & Achievement Engine (KAE)
//!
//! Converts a stream of discrete user actions into a cumulative karma
//! score, derives a rank from the total, and evaluates a fixed catalog of
//! achievement conditions against the user's full activity history:
//!
//! - **Pricing**: canonical action names with legacy aliases (`catalog`)
//! - **Counters**: one-pass activity aggregation over posts, nested
//!   comment trees, and groups
//! - **Evaluation**: idempotent one-time unlocks, single pass per cycle
//! - **Ledger**: per-user serialized award pipeline with reward batches
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       KarmaLedger                           │
//! │                                                             │
//! │  ┌─────────┐   ┌──────────┐   ┌───────────┐   ┌─────────┐ │
//! │  │  Price  │──▶│  Append  │──▶│ Evaluate  │──▶│ Reward  │ │
//! │  │ (catalog)│  │  event   │   │(counters) │   │  batch  │ │
//! │  └─────────┘   └──────────┘   └─────┬─────┘   └─────────┘ │
//! │                                     │                      │
//! │                            ┌────────▼────────┐             │
//! │                            │ ActivityProvider│             │
//! │                            └─────────────────┘             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine's pure pieces (pricing, rank lookup, counter collection,
//! condition evaluation) are synchronous and side-effect free; all
//! concurrency lives at the ledger boundary.

pub mod activity;
pub mod config;
pub mod evaluator;
pub mod ledger;
pub mod snapshot;
pub mod temporal;
pub mod types;

// Re-export main types
pub use activity::{ActivityCounters, CounterStore};
pub use config::{EngineConfig, EvaluationConfig, LedgerConfig};
pub use evaluator::AchievementEvaluator;
pub use ledger::{AwardOutcome, KarmaLedger, UnlockedAchievement};
pub use snapshot::{ActivityProvider, ActivitySnapshot, InMemoryActivityProvider};
pub use types::*;
