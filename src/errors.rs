use schema::Element;
use thiserror::Error;

/// Main error type for the elemental battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    #[error("Card error: {0}")]
    Card(#[from] CardError),
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while materialising a battle card from its template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// Neither the catalog nor the fallback table offered a move for the card's element
    #[error("card {card_id} has no usable {element} moves")]
    NoUsableMoves { card_id: String, element: Element },
}

/// Deck composition rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("a deck needs exactly {expected} cards, got {actual}")]
    WrongSize { expected: usize, actual: usize },
    #[error("card {card_id} appears more than once in the deck")]
    DuplicateCardId { card_id: String },
}

/// Errors related to applying an action to a battle session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("active card does not know move {0}")]
    UnknownMove(String),
    #[error("invalid card index: {0}")]
    InvalidCardIndex(usize),
    #[error("card at index {0} is knocked out")]
    CardKnockedOut(usize),
    #[error("the battle has already finished")]
    BattleFinished,
}

/// Errors loading configuration or catalog data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse RON data: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to parse card templates: {0}")]
    Templates(#[from] serde_json::Error),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using CardError
pub type CardResult<T> = Result<T, CardError>;

/// Type alias for Results using DeckError
pub type DeckResult<T> = Result<T, DeckError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
