//! Balance tables for the engine.
//!
//! None of these numbers are part of the engine's contract; they are loaded
//! from RON the same way catalog data is, and every field falls back to the
//! shipped default when omitted.

use crate::errors::{ConfigError, ConfigResult};
use schema::{Difficulty, Matchup, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Stat multiplier applied per rarity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityMultipliers {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

impl Default for RarityMultipliers {
    fn default() -> Self {
        Self {
            common: 1.0,
            uncommon: 1.1,
            rare: 1.25,
            epic: 1.4,
            legendary: 1.6,
        }
    }
}

impl RarityMultipliers {
    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Constants consumed by the damage model and card scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub strong_multiplier: f64,
    pub neutral_multiplier: f64,
    pub weak_multiplier: f64,
    pub crit_base_chance: f64,
    /// Speed points per additional unit of crit chance.
    pub crit_speed_divisor: f64,
    pub crit_multiplier: f64,
    pub variance_min: f64,
    pub variance_max: f64,
    pub evolution_damage_bonus: f64,
    pub evolution_hp_bonus: f64,
    pub evolution_heal_bonus: f64,
    /// Fraction of max HP lost per status stack per tick.
    pub status_damage_fraction: f64,
    pub defend_reduction: f64,
    pub rarity_multipliers: RarityMultipliers,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            strong_multiplier: 1.5,
            neutral_multiplier: 1.0,
            weak_multiplier: 0.75,
            crit_base_chance: 0.10,
            crit_speed_divisor: 1000.0,
            crit_multiplier: 1.5,
            variance_min: 0.85,
            variance_max: 1.0,
            evolution_damage_bonus: 0.10,
            evolution_hp_bonus: 0.15,
            evolution_heal_bonus: 0.10,
            status_damage_fraction: 0.0625,
            defend_reduction: 0.5,
            rarity_multipliers: RarityMultipliers::default(),
        }
    }
}

impl DamageConfig {
    pub fn matchup_multiplier(&self, matchup: Matchup) -> f64 {
        match matchup {
            Matchup::Strong => self.strong_multiplier,
            Matchup::Neutral => self.neutral_multiplier,
            Matchup::Weak => self.weak_multiplier,
        }
    }
}

/// Per-difficulty opponent behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub stat_multiplier: f64,
    /// Probability in [0, 1] that a turn is played optimally.
    pub optimal_play_chance: f64,
    pub uses_type_advantage: bool,
    pub predicts_moves: bool,
}

impl AiConfig {
    /// The shipped tuning row for a difficulty tier.
    pub fn default_for(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::row(0.8, 0.5, false, false),
            Difficulty::Normal => Self::row(1.0, 0.7, true, false),
            Difficulty::Hard => Self::row(1.15, 0.85, true, true),
            Difficulty::Legendary => Self::row(1.3, 0.95, true, true),
        }
    }

    fn row(
        stat_multiplier: f64,
        optimal_play_chance: f64,
        uses_type_advantage: bool,
        predicts_moves: bool,
    ) -> Self {
        Self {
            stat_multiplier,
            optimal_play_chance,
            uses_type_advantage,
            predicts_moves,
        }
    }
}

/// Difficulty-independent knobs of the opponent policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Chance to follow through on a switch toward a better matchup.
    pub switch_commit_chance: f64,
    /// Chance that a sloppy turn attacks rather than switches.
    pub random_attack_chance: f64,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            switch_commit_chance: 0.7,
            random_attack_chance: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub damage: DamageConfig,
    pub ai: AiTuning,
    pub difficulties: HashMap<Difficulty, AiConfig>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            damage: DamageConfig::default(),
            ai: AiTuning::default(),
            difficulties: [
                Difficulty::Easy,
                Difficulty::Normal,
                Difficulty::Hard,
                Difficulty::Legendary,
            ]
            .into_iter()
            .map(|difficulty| (difficulty, AiConfig::default_for(difficulty)))
            .collect(),
        }
    }
}

impl BattleConfig {
    /// Tuning row for a tier, using the shipped row when the table omits it.
    pub fn ai_config(&self, difficulty: Difficulty) -> AiConfig {
        self.difficulties
            .get(&difficulty)
            .cloned()
            .unwrap_or_else(|| AiConfig::default_for(difficulty))
    }

    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a config from a RON file on disk
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }
}
