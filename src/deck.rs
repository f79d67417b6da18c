//! Deck validation, power rating and auto-composition.

use crate::battle::damage::DamageModel;
use crate::card::BattleCard;
use crate::errors::{DeckError, DeckResult};
use ordered_float::OrderedFloat;
use schema::Element;
use std::cmp::Reverse;
use std::collections::HashSet;

pub const DECK_SIZE: usize = 3;

/// Check the deck rules, reporting the first one broken: size first, then unique card ids.
pub fn validate_deck(cards: &[BattleCard]) -> DeckResult<()> {
    if cards.len() != DECK_SIZE {
        return Err(DeckError::WrongSize {
            expected: DECK_SIZE,
            actual: cards.len(),
        });
    }

    let mut seen = HashSet::new();
    for card in cards {
        if !seen.insert(card.card_id.as_str()) {
            return Err(DeckError::DuplicateCardId {
                card_id: card.card_id.clone(),
            });
        }
    }
    Ok(())
}

pub struct DeckComposer<'a> {
    model: &'a DamageModel,
}

impl<'a> DeckComposer<'a> {
    pub fn new(model: &'a DamageModel) -> Self {
        Self { model }
    }

    pub fn validate_deck(&self, cards: &[BattleCard]) -> DeckResult<()> {
        validate_deck(cards)
    }

    /// Mean card power over the deck, zero for an empty deck.
    pub fn calculate_deck_power(&self, cards: &[BattleCard]) -> f64 {
        if cards.is_empty() {
            return 0.0;
        }
        let total: f64 = cards.iter().map(|card| self.model.card_power(card)).sum();
        total / cards.len() as f64
    }

    /// Suggest a deck from a pool: the strongest card of each element present
    /// (Body, Mind, Soul), then the strongest leftovers until the deck is full.
    /// Pools of three or fewer come back unchanged.
    pub fn suggest_deck_composition(&self, pool: &[BattleCard]) -> Vec<BattleCard> {
        if pool.len() <= DECK_SIZE {
            return pool.to_vec();
        }

        let mut chosen: Vec<usize> = Vec::with_capacity(DECK_SIZE);

        for element in Element::all() {
            if let Some(index) = self.strongest(pool, |index, card| {
                card.element == element && !chosen.contains(&index)
            }) {
                chosen.push(index);
            }
        }

        while chosen.len() < DECK_SIZE {
            match self.strongest(pool, |index, _| !chosen.contains(&index)) {
                Some(index) => chosen.push(index),
                None => break,
            }
        }

        tracing::debug!(
            picked = ?chosen.iter().map(|&i| pool[i].card_id.as_str()).collect::<Vec<_>>(),
            "suggested deck"
        );
        chosen.into_iter().map(|index| pool[index].clone()).collect()
    }

    /// Index of the highest-power eligible card; earliest wins ties.
    fn strongest(
        &self,
        pool: &[BattleCard],
        eligible: impl Fn(usize, &BattleCard) -> bool,
    ) -> Option<usize> {
        pool.iter()
            .enumerate()
            .filter(|(index, card)| eligible(*index, card))
            .min_by_key(|(_, card)| Reverse(OrderedFloat(self.model.card_power(card))))
            .map(|(index, _)| index)
    }
}
