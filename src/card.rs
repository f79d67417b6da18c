use schema::{Element, MoveData, Rarity, StatusEffect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub hp: u32,
}

impl Stats {
    pub fn new(attack: u32, defense: u32, speed: u32, hp: u32) -> Self {
        Self {
            attack,
            defense,
            speed,
            hp,
        }
    }

    /// Sum of the four stats, widened so extreme templates cannot overflow.
    pub fn total(&self) -> u64 {
        [self.attack, self.defense, self.speed, self.hp]
            .into_iter()
            .map(u64::from)
            .sum()
    }

    /// Apply a function to each of the four stats.
    pub fn map(self, mut f: impl FnMut(u32) -> u32) -> Self {
        Self {
            attack: f(self.attack),
            defense: f(self.defense),
            speed: f(self.speed),
            hp: f(self.hp),
        }
    }
}

/// A status effect together with how many times it has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStack {
    pub effect: StatusEffect,
    pub stacks: u32,
}

/// The mutable per-battle form of a card. Built once per battle and thrown
/// away afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleCard {
    pub id: String,
    pub card_id: String,
    pub name: String,
    pub species: String,
    pub element: Element,
    pub evolution_stage: u32,
    pub rarity: Rarity,
    pub stats: Stats,
    pub moves: Vec<MoveData>,
    pub current_hp: u32,
    pub max_hp: u32,
    pub status_effects: Vec<StatusStack>,
    pub is_active: bool,
    pub is_knocked_out: bool,
}

impl BattleCard {
    pub fn is_alive(&self) -> bool {
        !self.is_knocked_out && self.current_hp > 0
    }

    /// Fraction of max HP remaining, in [0, 1].
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    pub fn find_move(&self, move_id: &str) -> Option<&MoveData> {
        self.moves.iter().find(|move_data| move_data.id == move_id)
    }

    /// Subtract HP, saturating at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_hp);
        self.set_hp(self.current_hp - dealt);
        dealt
    }

    /// Restore HP up to the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.set_hp(self.current_hp + restored);
        restored
    }

    /// Set current HP, clamped to max, keeping the knocked-out flag in sync.
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
        self.is_knocked_out = self.current_hp == 0;
    }

    /// Add one stack of an effect, merging with an existing entry.
    pub fn add_status(&mut self, effect: StatusEffect) {
        match self
            .status_effects
            .iter_mut()
            .find(|stack| stack.effect == effect)
        {
            Some(stack) => stack.stacks += 1,
            None => self.status_effects.push(StatusStack { effect, stacks: 1 }),
        }
    }

    pub fn status_stacks(&self, effect: StatusEffect) -> u32 {
        self.status_effects
            .iter()
            .find(|stack| stack.effect == effect)
            .map_or(0, |stack| stack.stacks)
    }

    pub fn clear_status(&mut self) {
        self.status_effects.clear();
    }
}
