use serde::{Deserialize, Serialize};

/// Tunable knobs of the decision maker.
///
/// The trainer embeds this record in its checkpoint, so changes here are a
/// schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Probability of picking a uniformly random candidate instead of the
    /// best-scoring one.
    pub exploration_rate: f32,
    /// Length of the sliding window of recent move patterns used by the
    /// shuffle penalty.
    pub pattern_memory: usize,
    /// Score reduction per repetition of a tableau-to-tableau pattern in
    /// the window.
    pub shuffle_penalty: i32,
    /// Look-ahead depth; zero disables look-ahead entirely.
    pub look_ahead_depth: u32,
    /// Number of follow-up moves explored per level beyond the first.
    pub look_ahead_branch_factor: usize,
    /// Bonus per foundation play available after a candidate.
    pub look_ahead_foundation_bonus: i32,
    /// Bonus per empty-creating consolidation available after a candidate.
    pub look_ahead_empty_bonus: i32,
    /// Bonus per attack available after a candidate.
    pub look_ahead_attack_bonus: i32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            exploration_rate: 0.05,
            pattern_memory: 10,
            shuffle_penalty: 15,
            look_ahead_depth: 1,
            look_ahead_branch_factor: 3,
            look_ahead_foundation_bonus: 8,
            look_ahead_empty_bonus: 4,
            look_ahead_attack_bonus: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_json() {
        let config = DecisionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DecisionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: DecisionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DecisionConfig::default());
    }
}
