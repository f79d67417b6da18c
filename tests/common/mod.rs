#![allow(dead_code)]

use elemental_battle::{BattleCard, CardFactory, CardTemplate, DamageModel, MoveCatalog, StatValue};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

pub fn catalog() -> MoveCatalog {
    MoveCatalog::load(&data_path("moves.ron"))
        .expect("shipped move catalog should load")
        .with_builtin_fallbacks()
}

pub fn template(card_id: &str, element: &str, stats: [u32; 4]) -> CardTemplate {
    let stats: BTreeMap<String, StatValue> = ["attack", "defense", "speed", "hp"]
        .into_iter()
        .zip(stats)
        .map(|(key, value)| (key.to_string(), StatValue::Number(value as f64)))
        .collect();
    CardTemplate {
        id: format!("inst-{}", card_id),
        card_id: card_id.to_string(),
        creature_name: format!("Creature {}", card_id),
        species: "Sprite".to_string(),
        element: element.to_string(),
        evolution_stage: 0,
        rarity: "common".to_string(),
        image_url: None,
        stats,
    }
}

pub fn card(card_id: &str, element: &str, stats: [u32; 4]) -> BattleCard {
    let model = DamageModel::default();
    let catalog = catalog();
    CardFactory::new(&model, &catalog)
        .transform_to_battle_card(&template(card_id, element, stats))
        .expect("catalog covers every element")
}
