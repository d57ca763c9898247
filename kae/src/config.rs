//! Configuration for the engine.

use serde::{Deserialize, Serialize};

/// Configuration for the Karma & Achievement Engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Evaluation settings
    pub evaluation: EvaluationConfig,
    /// Ledger settings
    pub ledger: LedgerConfig,
}

impl EngineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Settings for achievement evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Start hour of the night-owl window (inclusive, 0-23)
    pub night_window_start_hour: u32,
    /// End hour of the night-owl window (exclusive, 0-23)
    pub night_window_end_hour: u32,
    /// Maximum join-to-first-post latency for the early-bird badge (seconds)
    pub early_bird_max_secs: i64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            night_window_start_hour: 22,
            night_window_end_hour: 6,
            early_bird_max_secs: 3600, // 1 hour
        }
    }
}

/// Settings for the karma ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Re-run achievement evaluation after every award
    pub evaluate_on_award: bool,
    /// Action type recorded for achievement reward events
    pub reward_action_type: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            evaluate_on_award: true,
            reward_action_type: "achievement_unlocked".to_string(),
        }
    }
}
