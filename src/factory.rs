//! Turns persisted card templates into ready-to-battle cards.
//!
//! The loosely typed stat map stops here: everything downstream sees a
//! fully typed [`Stats`].

use crate::battle::damage::{floor_stat, DamageModel};
use crate::card::{BattleCard, Stats};
use crate::catalog::MoveCatalog;
use crate::errors::{CardError, CardResult, ConfigError, ConfigResult};
use schema::{CardTemplate, Element, MoveData, MoveType, Rarity, StatValue};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Most moves a card carries into battle.
pub const MAX_MOVES: usize = 4;

const DEFAULT_STAT: u32 = 50;
const DEFAULT_HP: u32 = 100;

// Canonical key first, thematic alias second.
const ATTACK_KEYS: [&str; 2] = ["attack", "strength"];
const DEFENSE_KEYS: [&str; 2] = ["defense", "resilience"];
const SPEED_KEYS: [&str; 2] = ["speed", "agility"];
const HP_KEYS: [&str; 2] = ["hp", "vitality"];

/// Resolve the four stats from a raw template map.
pub fn resolve_stats(raw: &BTreeMap<String, StatValue>) -> Stats {
    Stats {
        attack: lookup_stat(raw, &ATTACK_KEYS, DEFAULT_STAT),
        defense: lookup_stat(raw, &DEFENSE_KEYS, DEFAULT_STAT),
        speed: lookup_stat(raw, &SPEED_KEYS, DEFAULT_STAT),
        hp: lookup_stat(raw, &HP_KEYS, DEFAULT_HP),
    }
}

fn lookup_stat(raw: &BTreeMap<String, StatValue>, keys: &[&str], default: u32) -> u32 {
    for key in keys {
        let Some(value) = raw.get(*key) else {
            continue;
        };
        match value.as_f64() {
            Some(number) if number.is_finite() && number >= 0.0 => return floor_stat(number),
            _ => {
                tracing::warn!(key = *key, ?value, default, "unusable stat value, using default");
                return default;
            }
        }
    }
    default
}

/// Parse a JSON array of persisted card templates.
pub fn templates_from_json(content: &str) -> ConfigResult<Vec<CardTemplate>> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_templates(path: &Path) -> ConfigResult<Vec<CardTemplate>> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    templates_from_json(&content)
}

/// Everything needed to assemble a card once stats are final.
#[derive(Debug, Clone)]
pub(crate) struct CardBlueprint {
    pub id: String,
    pub card_id: String,
    pub name: String,
    pub species: String,
    pub element: Element,
    pub evolution_stage: u32,
    pub rarity: Rarity,
    pub stats: Stats,
}

pub struct CardFactory<'a> {
    model: &'a DamageModel,
    catalog: &'a MoveCatalog,
}

impl<'a> CardFactory<'a> {
    pub fn new(model: &'a DamageModel, catalog: &'a MoveCatalog) -> Self {
        Self { model, catalog }
    }

    pub fn transform_to_battle_card(&self, template: &CardTemplate) -> CardResult<BattleCard> {
        let element = Element::from_key(&template.element).unwrap_or_else(|| {
            tracing::warn!(
                card_id = %template.card_id,
                element = %template.element,
                "unknown element, defaulting to Body"
            );
            Element::Body
        });
        let rarity = template.rarity.trim().parse::<Rarity>().unwrap_or_else(|_| {
            tracing::warn!(
                card_id = %template.card_id,
                rarity = %template.rarity,
                "unknown rarity, applying no bonus"
            );
            Rarity::Common
        });

        let stats = resolve_stats(&template.stats)
            .map(|stat| self.model.apply_rarity_bonus(stat, rarity));

        self.assemble(CardBlueprint {
            id: template.id.clone(),
            card_id: template.card_id.clone(),
            name: template.creature_name.clone(),
            species: template.species.clone(),
            element,
            evolution_stage: template.evolution_stage,
            rarity,
            stats,
        })
    }

    /// Transform a whole set of templates, failing on the first card without moves.
    pub fn transform_all(&self, templates: &[CardTemplate]) -> CardResult<Vec<BattleCard>> {
        templates
            .iter()
            .map(|template| self.transform_to_battle_card(template))
            .collect()
    }

    /// Pick the card's moves: the first attack of its element leads, otherwise
    /// the first move of its element, otherwise the element's fallback. Other
    /// same-element moves follow in catalog order.
    pub fn select_moves(&self, element: Element, card_id: &str) -> CardResult<Vec<MoveData>> {
        let matching: Vec<&MoveData> = self.catalog.moves_for(element).collect();

        let lead = matching
            .iter()
            .find(|move_data| move_data.move_type == MoveType::Attack)
            .or_else(|| matching.first())
            .copied();

        let lead = match lead {
            Some(lead) => lead,
            None => {
                let fallback = self.catalog.fallback_for(element).ok_or_else(|| {
                    CardError::NoUsableMoves {
                        card_id: card_id.to_string(),
                        element,
                    }
                })?;
                tracing::warn!(
                    card_id,
                    %element,
                    move_id = %fallback.id,
                    "no catalog moves, using fallback"
                );
                fallback
            }
        };

        let mut moves = vec![lead.clone()];
        moves.extend(
            matching
                .into_iter()
                .filter(|move_data| move_data.id != lead.id)
                .take(MAX_MOVES - 1)
                .cloned(),
        );
        Ok(moves)
    }

    pub(crate) fn assemble(&self, blueprint: CardBlueprint) -> CardResult<BattleCard> {
        let moves = self.select_moves(blueprint.element, &blueprint.card_id)?;
        let max_hp = self
            .model
            .calculate_max_hp(blueprint.stats.hp, blueprint.evolution_stage);

        Ok(BattleCard {
            id: blueprint.id,
            card_id: blueprint.card_id,
            name: blueprint.name,
            species: blueprint.species,
            element: blueprint.element,
            evolution_stage: blueprint.evolution_stage,
            rarity: blueprint.rarity,
            stats: blueprint.stats,
            moves,
            current_hp: max_hp,
            max_hp,
            status_effects: Vec::new(),
            is_active: false,
            is_knocked_out: max_hp == 0,
        })
    }
}
