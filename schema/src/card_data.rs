use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Unrecognised keys are treated as common.
    pub fn from_key(key: &str) -> Rarity {
        key.trim().parse().unwrap_or(Rarity::Common)
    }
}

/// A stacking condition on a battle card. Burn and poison tick for damage at
/// the end of each turn; stun carries no tick damage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum StatusEffect {
    Burn,
    Poison,
    Stun,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Legendary,
}

impl Difficulty {
    /// Unrecognised keys fall back to normal.
    pub fn from_key(key: &str) -> Difficulty {
        key.trim().parse().unwrap_or_default()
    }
}

/// A raw stat entry as it arrives from persistence: usually a number,
/// occasionally a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(value) => Some(*value),
            StatValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// A persisted card record, consumed once per battle to build a battle card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    pub id: String,
    pub card_id: String,
    pub creature_name: String,
    pub species: String,
    pub element: String,
    #[serde(default)]
    pub evolution_stage: u32,
    #[serde(default = "default_rarity_key")]
    pub rarity: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, StatValue>,
}

fn default_rarity_key() -> String {
    "common".to_string()
}
