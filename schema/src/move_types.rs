use crate::element_types::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    Attack,
    Defend,
    Heal,
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveType::Attack => write!(f, "Attack"),
            MoveType::Defend => write!(f, "Defend"),
            MoveType::Heal => write!(f, "Heal"),
        }
    }
}

/// An immutable move catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub element: Element,
    pub move_type: MoveType,
    pub base_power: u32,
    /// Hit chance in percent, 0..=100.
    pub accuracy: u8,
}

impl MoveData {
    pub fn new(
        id: impl Into<String>,
        element: Element,
        move_type: MoveType,
        base_power: u32,
        accuracy: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            element,
            move_type,
            base_power,
            accuracy,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown in narration, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
