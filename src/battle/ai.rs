//! A module for defining AI behaviors for battle opponents.

use crate::battle::action::BattleAction;
use crate::battle::damage::{floor_stat, DamageModel, DamageOptions};
use crate::battle::rng::BattleRng;
use crate::card::{BattleCard, Stats};
use crate::catalog::MoveCatalog;
use crate::config::{AiConfig, AiTuning, BattleConfig};
use crate::deck::DECK_SIZE;
use crate::errors::CardResult;
use crate::factory::{CardBlueprint, CardFactory};
use ordered_float::OrderedFloat;
use schema::{Difficulty, Element, MoveData, Rarity};
use std::cmp::Reverse;
use std::collections::HashMap;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects the battle snapshot and decides on the next action for the AI side.
    fn decide_action(&self, context: &AiContext<'_>, rng: &mut dyn BattleRng) -> BattleAction;
}

/// Read-only view of a battle from the AI side's point of view.
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    pub ai_cards: &'a [BattleCard],
    pub player_cards: &'a [BattleCard],
    pub active_ai_card_index: usize,
    pub active_player_card_index: usize,
    pub turn_number: u32,
    pub difficulty: Difficulty,
}

impl<'a> AiContext<'a> {
    pub fn ai_active(&self) -> Option<&'a BattleCard> {
        self.ai_cards.get(self.active_ai_card_index)
    }

    pub fn player_active(&self) -> Option<&'a BattleCard> {
        self.player_cards.get(self.active_player_card_index)
    }

    /// AI cards that could be switched in: alive and not already active.
    fn bench(&self) -> impl Iterator<Item = (usize, &'a BattleCard)> + 'a {
        let active = self.active_ai_card_index;
        self.ai_cards
            .iter()
            .enumerate()
            .filter(move |(index, card)| *index != active && card.is_alive())
    }
}

/// The opponent-control policy. Stateless between calls: the same snapshot
/// and the same draws always produce the same action.
#[derive(Debug, Clone)]
pub struct AiPolicy {
    model: DamageModel,
    tuning: AiTuning,
    difficulties: HashMap<Difficulty, AiConfig>,
}

impl Default for AiPolicy {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}

impl AiPolicy {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            model: DamageModel::new(config.damage.clone()),
            tuning: config.ai.clone(),
            difficulties: config.difficulties.clone(),
        }
    }

    pub fn model(&self) -> &DamageModel {
        &self.model
    }

    pub fn ai_config(&self, difficulty: Difficulty) -> AiConfig {
        self.difficulties
            .get(&difficulty)
            .cloned()
            .unwrap_or_else(|| AiConfig::default_for(difficulty))
    }

    pub fn get_ai_action(&self, context: &AiContext<'_>, rng: &mut dyn BattleRng) -> BattleAction {
        let Some(active) = context.ai_active() else {
            tracing::warn!(
                index = context.active_ai_card_index,
                "AI active index out of range, treating as knocked out"
            );
            return self.forced_replacement(context);
        };

        if !active.is_alive() {
            return self.forced_replacement(context);
        }

        let config = self.ai_config(context.difficulty);
        if !rng.chance(config.optimal_play_chance) {
            let action = self.get_random_action(context, rng);
            tracing::debug!(turn = context.turn_number, ?action, "AI played a random action");
            return action;
        }

        let action = self.get_optimal_action(context, &config, rng);
        tracing::debug!(turn = context.turn_number, ?action, "AI played an optimal action");
        action
    }

    fn forced_replacement(&self, context: &AiContext<'_>) -> BattleAction {
        match self.find_best_switch(context) {
            Some(index) => {
                tracing::debug!(index, "AI active card knocked out, switching");
                BattleAction::switch(index)
            }
            None => {
                tracing::debug!("AI has no cards left, forfeiting");
                BattleAction::Forfeit
            }
        }
    }

    /// A sloppy turn: usually a uniformly chosen move, sometimes a switch.
    pub fn get_random_action(
        &self,
        context: &AiContext<'_>,
        rng: &mut dyn BattleRng,
    ) -> BattleAction {
        let attack = rng.chance(self.tuning.random_attack_chance);
        if !attack {
            if let Some(index) = self.find_best_switch(context) {
                return BattleAction::switch(index);
            }
        }

        match context.ai_active().filter(|card| !card.moves.is_empty()) {
            Some(active) => {
                let chosen = &active.moves[rng.index(active.moves.len())];
                BattleAction::attack(chosen.id.clone())
            }
            None => self.forced_replacement(context),
        }
    }

    /// The considered play: leave a losing matchup when a better card is
    /// available (committing only some of the time), otherwise hit as hard as possible.
    pub fn get_optimal_action(
        &self,
        context: &AiContext<'_>,
        config: &AiConfig,
        rng: &mut dyn BattleRng,
    ) -> BattleAction {
        let (Some(active), Some(target)) = (context.ai_active(), context.player_active()) else {
            return self.get_random_action(context, rng);
        };

        if let Some(prediction) = self.predict_player_move(context) {
            tracing::trace!(?prediction, "predicted player move");
        }

        if config.uses_type_advantage {
            let current = self.model.type_multiplier(active.element, target.element);
            if current < 1.0 {
                if let Some(index) = self.better_matchup(context, target, current) {
                    if rng.chance(self.tuning.switch_commit_chance) {
                        tracing::debug!(index, current, "AI leaving a losing matchup");
                        return BattleAction::switch(index);
                    }
                }
            }
        }

        match self.select_best_move(active, target, rng) {
            Some(best) => BattleAction::attack(best.id.clone()),
            None => self.forced_replacement(context),
        }
    }

    /// Best bench card whose matchup strictly beats `current`; earliest wins ties.
    fn better_matchup(
        &self,
        context: &AiContext<'_>,
        target: &BattleCard,
        current: f64,
    ) -> Option<usize> {
        context
            .bench()
            .map(|(index, card)| (index, self.model.type_multiplier(card.element, target.element)))
            .filter(|(_, multiplier)| *multiplier > current)
            .min_by_key(|(_, multiplier)| Reverse(OrderedFloat(*multiplier)))
            .map(|(index, _)| index)
    }

    /// Pick the replacement card: the first with a type advantage over the
    /// player's active card, else the healthiest by HP ratio.
    pub fn find_best_switch(&self, context: &AiContext<'_>) -> Option<usize> {
        if let Some(target) = context.player_active() {
            let advantaged = context.bench().find(|(_, card)| {
                self.model.type_multiplier(card.element, target.element) > 1.0
            });
            if let Some((index, _)) = advantaged {
                return Some(index);
            }
        }

        context
            .bench()
            .min_by_key(|(_, card)| Reverse(OrderedFloat(card.hp_ratio())))
            .map(|(index, _)| index)
    }

    /// Highest-damage move against `defender`, ignoring accuracy; earliest wins ties.
    pub fn select_best_move<'c>(
        &self,
        attacker: &'c BattleCard,
        defender: &BattleCard,
        rng: &mut dyn BattleRng,
    ) -> Option<&'c MoveData> {
        if attacker.moves.len() <= 1 {
            return attacker.moves.first();
        }

        let mut best: Option<(&MoveData, u32)> = None;
        for move_data in &attacker.moves {
            let score = self
                .model
                .calculate_damage(attacker, defender, move_data, DamageOptions::sure_hit(), rng)
                .damage;
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((move_data, score));
            }
        }
        best.map(|(move_data, _)| move_data)
    }

    /// Guess the player's next action. Advisory only; `None` when the tier
    /// does not predict.
    pub fn predict_player_move(&self, context: &AiContext<'_>) -> Option<BattleAction> {
        if !self.ai_config(context.difficulty).predicts_moves {
            return None;
        }
        let (ai_card, player_card) = (context.ai_active()?, context.player_active()?);

        if self.model.type_multiplier(player_card.element, ai_card.element) < 1.0 {
            return Some(BattleAction::switch(0));
        }
        let move_id = player_card
            .moves
            .first()
            .map(|move_data| move_data.id.clone())
            .unwrap_or_default();
        Some(BattleAction::attack(move_id))
    }

    /// Build the opponent's deck, one counter card per player card.
    pub fn generate_ai_deck(
        &self,
        player_cards: &[BattleCard],
        difficulty: Difficulty,
        catalog: &MoveCatalog,
    ) -> CardResult<Vec<BattleCard>> {
        let config = self.ai_config(difficulty);
        let factory = CardFactory::new(&self.model, catalog);

        (0..DECK_SIZE)
            .map(|slot| {
                let reference = if player_cards.is_empty() {
                    None
                } else {
                    player_cards.get(slot % player_cards.len().min(DECK_SIZE))
                };

                let element = match reference {
                    Some(card) if config.uses_type_advantage => card.element.countered_by(),
                    _ => Element::from_rotation(slot),
                };
                let (base_stats, evolution_stage, rarity) = match reference {
                    Some(card) => (card.stats, card.evolution_stage, card.rarity),
                    None => (Stats::new(50, 50, 50, 100), 0, Rarity::Common),
                };
                let stats = base_stats.map(|stat| floor_stat(stat as f64 * config.stat_multiplier));
                let species = themed_species(element, slot);

                factory.assemble(CardBlueprint {
                    id: format!("ai-{}-{}", difficulty, slot),
                    card_id: format!("ai-card-{}", slot),
                    name: format!("{} {}", difficulty_title(difficulty), species),
                    species: species.to_string(),
                    element,
                    evolution_stage,
                    rarity,
                    stats,
                })
            })
            .collect()
    }
}

impl Behavior for AiPolicy {
    fn decide_action(&self, context: &AiContext<'_>, rng: &mut dyn BattleRng) -> BattleAction {
        self.get_ai_action(context, rng)
    }
}

fn difficulty_title(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Feral",
        Difficulty::Normal => "Rogue",
        Difficulty::Hard => "Elite",
        Difficulty::Legendary => "Mythic",
    }
}

fn themed_species(element: Element, slot: usize) -> &'static str {
    let names = match element {
        Element::Body => ["Brute", "Golem", "Titan"],
        Element::Mind => ["Seer", "Oracle", "Sage"],
        Element::Soul => ["Wraith", "Specter", "Phantom"],
    };
    names[slot % names.len()]
}
