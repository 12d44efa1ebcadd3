//! Game and table configuration.
//!
//! - `GameConfig`: rule parameters of a single game (hand size, win
//!   thresholds, whether tactic cards are in play)
//! - `TableConfig`: settings of a table arena hosting many games
//!
//! Both are plain serde values with builder-style setters. The defaults are
//! the published Battleline rules.

use serde::{Deserialize, Serialize};

/// Number of flags on the battlefield.
pub const FLAG_COUNT: usize = 9;

/// Rule parameters of one game.
///
/// ```
/// use battleline::core::GameConfig;
///
/// let basic = GameConfig::default().without_tactics();
/// assert!(!basic.tactics);
/// assert_eq!(basic.hand_size, 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cards dealt to each hand at the start of the game.
    pub hand_size: usize,

    /// Total claimed flags that win the game (envelopment).
    pub envelopment: usize,

    /// Adjacent claimed flags that win the game (breakthrough).
    pub breakthrough: usize,

    /// Whether tactic cards are in play. The basic game uses troops only.
    pub tactics: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: 7,
            envelopment: 5,
            breakthrough: 3,
            tactics: true,
        }
    }
}

impl GameConfig {
    /// Set the starting hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set both win thresholds.
    #[must_use]
    pub fn with_win_thresholds(mut self, envelopment: usize, breakthrough: usize) -> Self {
        self.envelopment = envelopment;
        self.breakthrough = breakthrough;
        self
    }

    /// Play the basic game without tactic cards.
    #[must_use]
    pub fn without_tactics(mut self) -> Self {
        self.tactics = false;
        self
    }
}

/// Settings of a table arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Seed for deck shuffles and dealer selection.
    pub seed: u64,

    /// Rules used for every game started at these tables.
    pub rules: GameConfig,
}

impl TableConfig {
    /// Create a table configuration with default rules.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rules: GameConfig::default(),
        }
    }

    /// Use the given rules for every game.
    #[must_use]
    pub fn with_rules(mut self, rules: GameConfig) -> Self {
        self.rules = rules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let config = GameConfig::default();

        assert_eq!(config.hand_size, 7);
        assert_eq!(config.envelopment, 5);
        assert_eq!(config.breakthrough, 3);
        assert!(config.tactics);
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::default()
            .with_hand_size(6)
            .with_win_thresholds(4, 2)
            .without_tactics();

        assert_eq!(config.hand_size, 6);
        assert_eq!(config.envelopment, 4);
        assert_eq!(config.breakthrough, 2);
        assert!(!config.tactics);
    }

    #[test]
    fn test_table_config_serde() {
        let config = TableConfig::new(9).with_rules(GameConfig::default().without_tactics());
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TableConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }
}
