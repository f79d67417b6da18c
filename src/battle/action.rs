use serde::{Deserialize, Serialize};

/// One side's decision for a turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BattleAction {
    /// Use the active card's move with this id.
    Attack { move_id: String },

    /// The index refers to the card's position (0-2) in the side's deck.
    Switch { switch_to_card_index: usize },

    Forfeit,
}

impl BattleAction {
    pub fn attack(move_id: impl Into<String>) -> Self {
        BattleAction::Attack {
            move_id: move_id.into(),
        }
    }

    pub fn switch(index: usize) -> Self {
        BattleAction::Switch {
            switch_to_card_index: index,
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, BattleAction::Attack { .. })
    }
}
