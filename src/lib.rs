//! Elemental Battle Engine
//!
//! Rules and opponent logic for a turn-based creature card game: a
//! three-element advantage triangle, damage resolution, conversion of
//! persisted card templates into battle cards, deck checks and an AI
//! opponent with four difficulty tiers.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod card;
pub mod catalog;
pub mod config;
pub mod deck;
pub mod errors;
pub mod factory;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    CardTemplate, Difficulty, Effectiveness, Element, Matchup, MoveData, MoveType, Rarity,
    StatValue, StatusEffect,
};

// --- From this crate's modules (`src/`) ---

// Battle rules, policy and orchestration.
pub use battle::action::BattleAction;
pub use battle::ai::{AiContext, AiPolicy, Behavior};
pub use battle::damage::{DamageModel, DamageOptions, DamageResult};
pub use battle::narration::generate_narration;
pub use battle::rng::{BattleRng, ScriptedRng, SeededRng};
pub use battle::runner::{run_ai_battle, run_battle, BattleOutcome};
pub use battle::session::{ActionEffect, BattleSession, Side, SideId, TurnReport};

// Card runtime types and construction.
pub use card::{BattleCard, Stats, StatusStack};
pub use catalog::MoveCatalog;
pub use config::{AiConfig, BattleConfig, DamageConfig};
pub use deck::{validate_deck, DeckComposer, DECK_SIZE};
pub use factory::{load_templates, templates_from_json, CardFactory, MAX_MOVES};

// Crate-specific error and result types.
pub use errors::{
    ActionError, ActionResult, BattleEngineError, BattleResult, CardError, CardResult,
    ConfigError, ConfigResult, DeckError, DeckResult,
};
