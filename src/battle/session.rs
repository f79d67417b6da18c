//! Explicit battle state owned by the orchestrator.
//!
//! The policy and damage model stay pure; this is the one place where their
//! outputs are applied to HP, status, active and knocked-out flags.

use crate::battle::action::BattleAction;
use crate::battle::ai::AiContext;
use crate::battle::damage::{floor_stat, DamageModel, DamageOptions, DamageResult};
use crate::battle::narration::generate_narration;
use crate::battle::rng::BattleRng;
use crate::card::BattleCard;
use crate::deck::{validate_deck, DECK_SIZE};
use crate::errors::{ActionError, ActionResult, DeckError, DeckResult};
use schema::{Difficulty, MoveType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    Player,
    Ai,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::Player => SideId::Ai,
            SideId::Ai => SideId::Player,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub cards: Vec<BattleCard>,
    pub active_index: usize,
    /// Reduction from a Defend move, consumed by the next hit taken.
    pub pending_reduction: Option<f64>,
}

impl Side {
    fn new(mut cards: Vec<BattleCard>) -> Self {
        for (index, card) in cards.iter_mut().enumerate() {
            card.is_active = index == 0;
        }
        Self {
            cards,
            active_index: 0,
            pending_reduction: None,
        }
    }

    pub fn active(&self) -> Option<&BattleCard> {
        self.cards.get(self.active_index)
    }

    fn active_mut(&mut self) -> Option<&mut BattleCard> {
        self.cards.get_mut(self.active_index)
    }

    pub fn has_cards_left(&self) -> bool {
        self.cards.iter().any(BattleCard::is_alive)
    }

    /// Active card is down but another card can still come in.
    pub fn needs_replacement(&self) -> bool {
        !self.active().is_some_and(BattleCard::is_alive) && self.has_cards_left()
    }
}

/// What applying an action did to the battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionEffect {
    Damage {
        result: DamageResult,
        dealt: u32,
        knocked_out: bool,
    },
    Heal {
        amount: u32,
    },
    Guard {
        reduction: f64,
    },
    Switch {
        from: usize,
        to: usize,
    },
    Forfeit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub side: SideId,
    pub action: BattleAction,
    pub effect: ActionEffect,
    pub narration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSession {
    player: Side,
    ai: Side,
    turn_number: u32,
    difficulty: Difficulty,
    finished: bool,
    winner: Option<SideId>,
}

impl BattleSession {
    /// Start a battle. The player deck must be a valid deck; the AI deck only
    /// needs the right size since its card ids are synthetic.
    pub fn new(
        player_deck: Vec<BattleCard>,
        ai_deck: Vec<BattleCard>,
        difficulty: Difficulty,
    ) -> DeckResult<Self> {
        validate_deck(&player_deck)?;
        if ai_deck.len() != DECK_SIZE {
            return Err(DeckError::WrongSize {
                expected: DECK_SIZE,
                actual: ai_deck.len(),
            });
        }

        let mut session = Self {
            player: Side::new(player_deck),
            ai: Side::new(ai_deck),
            turn_number: 1,
            difficulty,
            finished: false,
            winner: None,
        };
        session.refresh_result();
        Ok(session)
    }

    pub fn side(&self, side: SideId) -> &Side {
        match side {
            SideId::Player => &self.player,
            SideId::Ai => &self.ai,
        }
    }

    fn side_mut(&mut self, side: SideId) -> &mut Side {
        match side {
            SideId::Player => &mut self.player,
            SideId::Ai => &mut self.ai,
        }
    }

    /// Mutable access to the acting side and its opponent at once.
    fn sides_mut(&mut self, actor: SideId) -> (&mut Side, &mut Side) {
        match actor {
            SideId::Player => (&mut self.player, &mut self.ai),
            SideId::Ai => (&mut self.ai, &mut self.player),
        }
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `None` while the battle runs, and after a battle where both sides fell together.
    pub fn winner(&self) -> Option<SideId> {
        self.winner
    }

    pub fn advance_turn(&mut self) {
        self.turn_number += 1;
    }

    /// Snapshot for the opponent policy.
    pub fn ai_context(&self) -> AiContext<'_> {
        self.context_for(SideId::Ai)
    }

    /// Snapshot with the sides mirrored, so the player side can be driven by a policy too.
    pub fn context_for(&self, side: SideId) -> AiContext<'_> {
        let (own, other) = (self.side(side), self.side(side.opponent()));
        AiContext {
            ai_cards: &own.cards,
            player_cards: &other.cards,
            active_ai_card_index: own.active_index,
            active_player_card_index: other.active_index,
            turn_number: self.turn_number,
            difficulty: self.difficulty,
        }
    }

    pub fn apply_action(
        &mut self,
        side: SideId,
        action: &BattleAction,
        model: &DamageModel,
        rng: &mut dyn BattleRng,
    ) -> ActionResult<TurnReport> {
        if self.finished {
            return Err(ActionError::BattleFinished);
        }

        let (effect, narration) = match action {
            BattleAction::Attack { move_id } => self.use_move(side, move_id, model, rng)?,
            BattleAction::Switch {
                switch_to_card_index,
            } => self.switch_active(side, *switch_to_card_index)?,
            BattleAction::Forfeit => {
                self.finished = true;
                self.winner = Some(side.opponent());
                (ActionEffect::Forfeit, format!("{:?} forfeits the battle.", side))
            }
        };

        tracing::debug!(?side, ?action, ?effect, "applied action");
        self.refresh_result();
        Ok(TurnReport {
            side,
            action: action.clone(),
            effect,
            narration,
        })
    }

    fn use_move(
        &mut self,
        side: SideId,
        move_id: &str,
        model: &DamageModel,
        rng: &mut dyn BattleRng,
    ) -> ActionResult<(ActionEffect, String)> {
        let (own, other) = self.sides_mut(side);
        let active_index = own.active_index;
        let attacker = own
            .active()
            .ok_or(ActionError::InvalidCardIndex(active_index))?;
        if !attacker.is_alive() {
            return Err(ActionError::CardKnockedOut(active_index));
        }
        let move_data = attacker
            .find_move(move_id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownMove(move_id.to_string()))?;

        match move_data.move_type {
            MoveType::Attack => {
                let defender_index = other.active_index;
                let defender = other
                    .active()
                    .filter(|card| card.is_alive())
                    .ok_or(ActionError::CardKnockedOut(defender_index))?;

                let mut result = model.calculate_damage(
                    attacker,
                    defender,
                    &move_data,
                    DamageOptions::default(),
                    rng,
                );
                let defender_name = defender.name.clone();
                if !result.missed {
                    if let Some(reduction) = other.pending_reduction.take() {
                        let reduced = floor_stat(result.damage as f64 * reduction);
                        result.damage = if result.damage > 0 { reduced.max(1) } else { 0 };
                    }
                }
                let narration =
                    generate_narration(&attacker.name, &defender_name, &move_data, &result);

                let defender = other
                    .active_mut()
                    .ok_or(ActionError::InvalidCardIndex(defender_index))?;
                let dealt = defender.take_damage(result.damage);
                let knocked_out = defender.is_knocked_out;
                let narration = if knocked_out {
                    format!("{} {} was knocked out!", narration, defender.name)
                } else {
                    narration
                };

                Ok((
                    ActionEffect::Damage {
                        result,
                        dealt,
                        knocked_out,
                    },
                    narration,
                ))
            }
            MoveType::Heal => {
                let amount = model.calculate_healing(&move_data, attacker.evolution_stage);
                let healer = own
                    .active_mut()
                    .ok_or(ActionError::InvalidCardIndex(active_index))?;
                let restored = healer.heal(amount);
                let narration = format!(
                    "{} used {}! {} recovered {} HP.",
                    healer.name,
                    move_data.display_name(),
                    healer.name,
                    restored
                );
                Ok((ActionEffect::Heal { amount: restored }, narration))
            }
            MoveType::Defend => {
                let reduction = model.calculate_defense_reduction(&move_data);
                let narration = format!(
                    "{} used {} and braced for the next hit.",
                    attacker.name,
                    move_data.display_name()
                );
                own.pending_reduction = Some(reduction);
                Ok((ActionEffect::Guard { reduction }, narration))
            }
        }
    }

    fn switch_active(
        &mut self,
        side: SideId,
        index: usize,
    ) -> ActionResult<(ActionEffect, String)> {
        let own = self.side_mut(side);
        let from = own.active_index;
        let target = own
            .cards
            .get(index)
            .ok_or(ActionError::InvalidCardIndex(index))?;
        if index == from {
            return Err(ActionError::InvalidCardIndex(index));
        }
        if !target.is_alive() {
            return Err(ActionError::CardKnockedOut(index));
        }

        for (position, card) in own.cards.iter_mut().enumerate() {
            card.is_active = position == index;
        }
        own.active_index = index;
        own.pending_reduction = None;

        let narration = format!(
            "{:?} withdrew {} and sent out {}.",
            side, own.cards[from].name, own.cards[index].name
        );
        Ok((ActionEffect::Switch { from, to: index }, narration))
    }

    /// Afflict the side's active card with one stack of a status effect.
    pub fn inflict_status(
        &mut self,
        side: SideId,
        effect: schema::StatusEffect,
    ) -> ActionResult<()> {
        let own = self.side_mut(side);
        let index = own.active_index;
        let card = own.active_mut().ok_or(ActionError::InvalidCardIndex(index))?;
        card.add_status(effect);
        Ok(())
    }

    /// End-of-turn status damage on both active cards. Returns HP lost per side.
    pub fn apply_status_ticks(&mut self, model: &DamageModel) -> Vec<(SideId, u32)> {
        let mut ticks = Vec::new();
        for side in [SideId::Player, SideId::Ai] {
            let Some(card) = self.side_mut(side).active_mut() else {
                continue;
            };
            if !card.is_alive() {
                continue;
            }
            let damage = model.status_damage(card);
            if damage > 0 {
                let dealt = card.take_damage(damage);
                tracing::debug!(?side, dealt, "status damage");
                ticks.push((side, dealt));
            }
        }
        self.refresh_result();
        ticks
    }

    fn refresh_result(&mut self) {
        if self.finished {
            return;
        }
        let player_left = self.player.has_cards_left();
        let ai_left = self.ai.has_cards_left();
        self.winner = match (player_left, ai_left) {
            (true, true) => return,
            (true, false) => Some(SideId::Player),
            (false, true) => Some(SideId::Ai),
            (false, false) => None,
        };
        self.finished = true;
        tracing::debug!(winner = ?self.winner, turn = self.turn_number, "battle finished");
    }
}
