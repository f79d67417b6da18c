use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The three creature elements. They form a cycle rather than a ranking:
/// Body beats Mind, Mind beats Soul, Soul beats Body.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Element {
    Body,
    Mind,
    Soul,
}

/// How an attacking element fares against a defending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Matchup {
    Strong,
    Neutral,
    Weak,
}

/// Player-facing effectiveness label attached to a damage result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Effectiveness {
    Super,
    Normal,
    Weak,
}

impl Element {
    /// The element this one has the advantage over.
    pub fn beats(self) -> Element {
        match self {
            Element::Body => Element::Mind,
            Element::Mind => Element::Soul,
            Element::Soul => Element::Body,
        }
    }

    /// The element that has the advantage over this one.
    pub fn countered_by(self) -> Element {
        match self {
            Element::Body => Element::Soul,
            Element::Mind => Element::Body,
            Element::Soul => Element::Mind,
        }
    }

    pub fn matchup(attacking: Element, defending: Element) -> Matchup {
        if attacking == defending {
            Matchup::Neutral
        } else if attacking.beats() == defending {
            Matchup::Strong
        } else {
            Matchup::Weak
        }
    }

    /// Parses an inbound element key such as `"body"` or `"Mind"`.
    pub fn from_key(key: &str) -> Option<Element> {
        key.trim().parse().ok()
    }

    /// Body, Mind, Soul in priority order.
    pub fn all() -> impl Iterator<Item = Element> {
        Element::iter()
    }

    /// Position in the Body/Mind/Soul rotation, wrapping around.
    pub fn from_rotation(index: usize) -> Element {
        match index % 3 {
            0 => Element::Body,
            1 => Element::Mind,
            _ => Element::Soul,
        }
    }
}

impl Effectiveness {
    /// Classifies a type multiplier: above 1 is super, below 1 is weak.
    pub fn from_multiplier(multiplier: f64) -> Effectiveness {
        if multiplier > 1.0 {
            Effectiveness::Super
        } else if multiplier < 1.0 {
            Effectiveness::Weak
        } else {
            Effectiveness::Normal
        }
    }
}
