use crate::errors::{ConfigError, ConfigResult};
use schema::{Element, MoveData, MoveType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The externally loaded move list, plus the per-element moves handed to
/// cards whose element has nothing usable in the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveCatalog {
    #[serde(default)]
    moves: Vec<MoveData>,
    #[serde(default)]
    fallbacks: HashMap<Element, MoveData>,
}

impl MoveCatalog {
    pub fn new(moves: Vec<MoveData>) -> Self {
        Self {
            moves,
            fallbacks: HashMap::new(),
        }
    }

    /// Register the fallback move for the move's own element, replacing any previous one.
    pub fn with_fallback(mut self, fallback: MoveData) -> Self {
        self.fallbacks.insert(fallback.element, fallback);
        self
    }

    /// Fill every element without a registered fallback with the built-in basic move.
    pub fn with_builtin_fallbacks(mut self) -> Self {
        for element in Element::all() {
            self.fallbacks
                .entry(element)
                .or_insert_with(|| builtin_fallback(element));
        }
        self
    }

    pub fn moves(&self) -> &[MoveData] {
        &self.moves
    }

    pub fn get(&self, id: &str) -> Option<&MoveData> {
        self.moves
            .iter()
            .chain(self.fallbacks.values())
            .find(|move_data| move_data.id == id)
    }

    /// Catalog moves of the given element, in catalog order.
    pub fn moves_for(&self, element: Element) -> impl Iterator<Item = &MoveData> {
        self.moves
            .iter()
            .filter(move |move_data| move_data.element == element)
    }

    pub fn fallback_for(&self, element: Element) -> Option<&MoveData> {
        self.fallbacks.get(&element)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a catalog from a RON file on disk
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }
}

/// The basic attack every element can fall back to.
pub fn builtin_fallback(element: Element) -> MoveData {
    let (id, name) = match element {
        Element::Body => ("body_strike", "Strike"),
        Element::Mind => ("mind_spike", "Mind Spike"),
        Element::Soul => ("soul_touch", "Spirit Touch"),
    };
    MoveData::new(id, element, MoveType::Attack, 40, 95).with_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_catalog_covers_every_element() {
        let catalog = MoveCatalog::from_ron_str(include_str!("../data/moves.ron"))
            .expect("shipped catalog should parse");
        assert!(!catalog.is_empty());
        for element in Element::all() {
            assert!(
                catalog.moves_for(element).count() >= 2,
                "expected several {} moves",
                element
            );
        }
    }

    #[test]
    fn test_moves_for_keeps_catalog_order() {
        let catalog = MoveCatalog::new(vec![
            MoveData::new("a", Element::Mind, MoveType::Heal, 20, 100),
            MoveData::new("b", Element::Body, MoveType::Attack, 50, 90),
            MoveData::new("c", Element::Mind, MoveType::Attack, 60, 85),
        ]);
        let ids: Vec<_> = catalog
            .moves_for(Element::Mind)
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(catalog.moves_for(Element::Soul).next().is_none());
    }

    #[test]
    fn test_fallbacks() {
        let custom = MoveData::new("jab", Element::Body, MoveType::Attack, 30, 100);
        let catalog = MoveCatalog::default()
            .with_fallback(custom.clone())
            .with_builtin_fallbacks();

        assert_eq!(catalog.fallback_for(Element::Body), Some(&custom));
        assert_eq!(
            catalog.fallback_for(Element::Soul).map(|m| m.id.as_str()),
            Some("soul_touch")
        );
        assert_eq!(catalog.get("mind_spike").map(|m| m.element), Some(Element::Mind));
    }

    #[test]
    fn test_no_fallbacks_by_default() {
        let catalog = MoveCatalog::default();
        for element in Element::all() {
            assert!(catalog.fallback_for(element).is_none());
        }
    }
}
