//! Type matrix and damage model.
//!
//! Pure numeric functions over cards and moves. Randomness is drawn from a
//! [`BattleRng`] unless a `force_*` override pins the outcome.

use crate::battle::rng::BattleRng;
use crate::card::BattleCard;
use crate::config::DamageConfig;
use schema::{Effectiveness, Element, MoveData, MoveType, Rarity, StatusEffect};
use serde::{Deserialize, Serialize};

// Absorbs binary representation error so that e.g. 100 * 1.15 floors to 115.
const FLOOR_EPSILON: f64 = 1e-9;

/// Floor a non-negative stat computation to an integer.
pub(crate) fn floor_stat(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value + FLOOR_EPSILON).floor().min(u32::MAX as f64) as u32
}

/// Overrides that bypass random draws in [`DamageModel::calculate_damage`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageOptions {
    pub force_hit: bool,
    pub force_crit: Option<bool>,
    /// Pin the variance factor instead of rolling it.
    pub force_variance: Option<f64>,
}

impl DamageOptions {
    pub fn sure_hit() -> Self {
        Self {
            force_hit: true,
            ..Self::default()
        }
    }

    pub fn with_crit(mut self, crit: bool) -> Self {
        self.force_crit = Some(crit);
        self
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.force_variance = Some(variance);
        self
    }
}

/// Outcome of one attack. When `missed` is set only `damage` (zero) is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub damage: u32,
    pub is_critical: bool,
    pub type_multiplier: f64,
    pub effectiveness: Effectiveness,
    pub missed: bool,
}

impl DamageResult {
    fn miss(type_multiplier: f64) -> Self {
        Self {
            damage: 0,
            is_critical: false,
            type_multiplier,
            effectiveness: Effectiveness::from_multiplier(type_multiplier),
            missed: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageModel {
    config: DamageConfig,
}

impl DamageModel {
    pub fn new(config: DamageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DamageConfig {
        &self.config
    }

    /// Damage scalar for an attacking element against a defending element.
    pub fn type_multiplier(&self, attacking: Element, defending: Element) -> f64 {
        self.config
            .matchup_multiplier(Element::matchup(attacking, defending))
    }

    /// Speed difference shifts accuracy by half a point per point of speed.
    pub fn roll_accuracy(
        &self,
        move_accuracy: u8,
        attacker_speed: u32,
        defender_speed: u32,
        force_hit: bool,
        rng: &mut dyn BattleRng,
    ) -> bool {
        if force_hit {
            return true;
        }
        let speed_delta = (attacker_speed as f64 - defender_speed as f64) / 2.0;
        let effective = (move_accuracy as f64 + speed_delta).clamp(0.0, 100.0);
        let roll = rng.next_f64() * 100.0;
        tracing::trace!(effective, roll, "accuracy roll");
        roll < effective
    }

    pub fn roll_critical_hit(
        &self,
        attacker_speed: u32,
        force_crit: Option<bool>,
        rng: &mut dyn BattleRng,
    ) -> bool {
        if let Some(forced) = force_crit {
            return forced;
        }
        let chance =
            self.config.crit_base_chance + attacker_speed as f64 / self.config.crit_speed_divisor;
        rng.next_f64() < chance
    }

    fn roll_variance(&self, forced: Option<f64>, rng: &mut dyn BattleRng) -> f64 {
        let (low, high) = (self.config.variance_min, self.config.variance_max);
        match forced {
            Some(variance) => variance.clamp(low, high),
            None => low + rng.next_f64() * (high - low),
        }
    }

    /// Resolve one use of `move_data` by `attacker` against `defender`.
    ///
    /// Draw order: accuracy, critical hit, variance. Forced values skip their draw.
    pub fn calculate_damage(
        &self,
        attacker: &BattleCard,
        defender: &BattleCard,
        move_data: &MoveData,
        options: DamageOptions,
        rng: &mut dyn BattleRng,
    ) -> DamageResult {
        let type_multiplier = self.type_multiplier(move_data.element, defender.element);

        let hit = self.roll_accuracy(
            move_data.accuracy,
            attacker.stats.speed,
            defender.stats.speed,
            options.force_hit,
            rng,
        );
        if !hit {
            return DamageResult::miss(type_multiplier);
        }

        let is_critical = self.roll_critical_hit(attacker.stats.speed, options.force_crit, rng);
        let variance = self.roll_variance(options.force_variance, rng);

        let ratio = attacker.stats.attack as f64 / defender.stats.defense.max(1) as f64;
        let evolution = 1.0 + self.config.evolution_damage_bonus * attacker.evolution_stage as f64;
        let crit = if is_critical {
            self.config.crit_multiplier
        } else {
            1.0
        };

        let raw =
            move_data.base_power as f64 * ratio * type_multiplier * evolution * crit * variance;
        let mut damage = floor_stat(raw);
        if move_data.base_power > 0 {
            damage = damage.max(1);
        }

        DamageResult {
            damage,
            is_critical,
            type_multiplier,
            effectiveness: Effectiveness::from_multiplier(type_multiplier),
            missed: false,
        }
    }

    pub fn calculate_max_hp(&self, base_hp: u32, evolution_stage: u32) -> u32 {
        floor_stat(base_hp as f64 * (1.0 + self.config.evolution_hp_bonus * evolution_stage as f64))
    }

    /// Per-tick damage of a status effect. Non-damaging effects deal zero.
    pub fn calculate_status_damage(&self, effect: StatusEffect, max_hp: u32, stacks: u32) -> u32 {
        match effect {
            StatusEffect::Burn | StatusEffect::Poison => {
                floor_stat(max_hp as f64 * self.config.status_damage_fraction * stacks as f64)
            }
            StatusEffect::Stun => 0,
        }
    }

    /// End-of-turn damage from every status stack on the card.
    pub fn status_damage(&self, card: &BattleCard) -> u32 {
        card.status_effects
            .iter()
            .map(|stack| self.calculate_status_damage(stack.effect, card.max_hp, stack.stacks))
            .sum()
    }

    pub fn calculate_healing(&self, move_data: &MoveData, healer_evolution_stage: u32) -> u32 {
        if move_data.move_type != MoveType::Heal {
            return 0;
        }
        floor_stat(
            move_data.base_power as f64
                * (1.0 + self.config.evolution_heal_bonus * healer_evolution_stage as f64),
        )
    }

    /// Multiplier the caller applies to the next hit taken after this move.
    pub fn calculate_defense_reduction(&self, move_data: &MoveData) -> f64 {
        match move_data.move_type {
            MoveType::Defend => self.config.defend_reduction,
            MoveType::Attack | MoveType::Heal => 1.0,
        }
    }

    pub fn rarity_multiplier(&self, rarity: Rarity) -> f64 {
        self.config.rarity_multipliers.get(rarity)
    }

    pub fn apply_rarity_bonus(&self, base_stat: u32, rarity: Rarity) -> u32 {
        floor_stat(base_stat as f64 * self.rarity_multiplier(rarity))
    }

    /// Same as [`apply_rarity_bonus`](Self::apply_rarity_bonus) for a raw rarity key;
    /// unknown keys apply no bonus.
    pub fn apply_rarity_bonus_for_key(&self, base_stat: u32, rarity_key: &str) -> u32 {
        match rarity_key.trim().parse::<Rarity>() {
            Ok(rarity) => self.apply_rarity_bonus(base_stat, rarity),
            Err(_) => base_stat,
        }
    }

    /// Power rating of a card: stat total scaled by evolution and rarity.
    pub fn card_power(&self, card: &BattleCard) -> f64 {
        card.stats.total() as f64
            * (1.0 + self.config.evolution_hp_bonus * card.evolution_stage as f64)
            * self.rarity_multiplier(card.rarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use crate::card::test_support::TestCardBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn model() -> DamageModel {
        DamageModel::default()
    }

    fn attack(element: Element, power: u32, accuracy: u8) -> MoveData {
        MoveData::new("test_move", element, MoveType::Attack, power, accuracy)
    }

    #[rstest]
    #[case(Element::Body, Element::Mind, 1.5)]
    #[case(Element::Mind, Element::Soul, 1.5)]
    #[case(Element::Soul, Element::Body, 1.5)]
    #[case(Element::Mind, Element::Body, 0.75)]
    #[case(Element::Soul, Element::Mind, 0.75)]
    #[case(Element::Body, Element::Soul, 0.75)]
    #[case(Element::Body, Element::Body, 1.0)]
    #[case(Element::Mind, Element::Mind, 1.0)]
    #[case(Element::Soul, Element::Soul, 1.0)]
    fn test_type_multiplier(
        #[case] attacking: Element,
        #[case] defending: Element,
        #[case] expected: f64,
    ) {
        assert_eq!(model().type_multiplier(attacking, defending), expected);
    }

    #[test]
    fn test_matrix_product_is_constant() {
        let model = model();
        for a in Element::all() {
            for b in Element::all().filter(|b| *b != a) {
                let product = model.type_multiplier(a, b) * model.type_multiplier(b, a);
                assert!((product - 1.125).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_reference_scenario() {
        let attacker = TestCardBuilder::new("a", Element::Body)
            .with_stats(100, 50, 50, 100)
            .build();
        let defender = TestCardBuilder::new("d", Element::Mind)
            .with_stats(50, 50, 50, 100)
            .build();
        let mut rng = ScriptedRng::constant(0.0);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &attack(Element::Body, 100, 100),
            DamageOptions::sure_hit().with_crit(false).with_variance(1.0),
            &mut rng,
        );

        assert_eq!(result.damage, 300);
        assert!(!result.missed);
        assert!(!result.is_critical);
        assert_eq!(result.type_multiplier, 1.5);
        assert_eq!(result.effectiveness, Effectiveness::Super);
        assert_eq!(rng.consumed(), 0, "forced rolls must not draw");
    }

    #[test]
    fn test_evolution_and_crit_scale_damage() {
        let attacker = TestCardBuilder::new("a", Element::Body)
            .with_stats(50, 50, 50, 100)
            .with_stage(2)
            .build();
        let defender = TestCardBuilder::new("d", Element::Body)
            .with_stats(50, 50, 50, 100)
            .build();
        let mut rng = ScriptedRng::constant(0.5);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &attack(Element::Body, 100, 100),
            DamageOptions::sure_hit().with_crit(true).with_variance(1.0),
            &mut rng,
        );

        // 100 * 1.0 * 1.0 * 1.2 * 1.5 * 1.0
        assert_eq!(result.damage, 180);
        assert!(result.is_critical);
        assert_eq!(result.effectiveness, Effectiveness::Normal);
    }

    #[test]
    fn test_variance_is_drawn_from_rng() {
        let attacker = TestCardBuilder::new("a", Element::Soul)
            .with_stats(100, 50, 50, 100)
            .build();
        let defender = TestCardBuilder::new("d", Element::Soul)
            .with_stats(50, 100, 50, 100)
            .build();
        // crit draw 0.99 (no crit), variance draw 0.0 -> 0.85
        let mut rng = ScriptedRng::new(vec![0.99, 0.0]);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &attack(Element::Soul, 100, 100),
            DamageOptions::sure_hit(),
            &mut rng,
        );

        assert_eq!(result.damage, 85);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn test_miss_returns_zero_damage() {
        let attacker = TestCardBuilder::new("a", Element::Body).build();
        let defender = TestCardBuilder::new("d", Element::Mind).build();
        let mut rng = ScriptedRng::constant(0.95);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &attack(Element::Body, 100, 50),
            DamageOptions::default(),
            &mut rng,
        );

        assert!(result.missed);
        assert_eq!(result.damage, 0);
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn test_weak_hit_never_drops_below_one() {
        let attacker = TestCardBuilder::new("a", Element::Mind)
            .with_stats(1, 50, 50, 100)
            .build();
        let defender = TestCardBuilder::new("d", Element::Body)
            .with_stats(50, 10_000, 50, 100)
            .build();
        let mut rng = ScriptedRng::constant(0.0);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &attack(Element::Mind, 1, 100),
            DamageOptions::sure_hit().with_crit(false),
            &mut rng,
        );

        assert_eq!(result.damage, 1);
        assert_eq!(result.effectiveness, Effectiveness::Weak);
    }

    #[test]
    fn test_zero_power_move_deals_nothing() {
        let attacker = TestCardBuilder::new("a", Element::Body).build();
        let defender = TestCardBuilder::new("d", Element::Body).build();
        let mut rng = ScriptedRng::constant(0.0);
        let guard = MoveData::new("brace", Element::Body, MoveType::Defend, 0, 100);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &guard,
            DamageOptions::sure_hit(),
            &mut rng,
        );
        assert_eq!(result.damage, 0);
    }

    #[test]
    fn test_zero_defense_is_treated_as_one() {
        let attacker = TestCardBuilder::new("a", Element::Body)
            .with_stats(10, 50, 50, 100)
            .build();
        let defender = TestCardBuilder::new("d", Element::Body)
            .with_stats(10, 0, 50, 100)
            .build();
        let mut rng = ScriptedRng::constant(0.0);

        let result = model().calculate_damage(
            &attacker,
            &defender,
            &attack(Element::Body, 10, 100),
            DamageOptions::sure_hit().with_crit(false).with_variance(1.0),
            &mut rng,
        );
        assert_eq!(result.damage, 100);
    }

    #[rstest]
    #[case(90, 50, 50, 0.89, true)]
    #[case(90, 50, 50, 0.90, false)]
    #[case(90, 70, 50, 0.99, true)] // speed edge pushes accuracy to 100
    #[case(10, 0, 100, 0.0, false)] // clamped to 0
    fn test_roll_accuracy(
        #[case] accuracy: u8,
        #[case] attacker_speed: u32,
        #[case] defender_speed: u32,
        #[case] draw: f64,
        #[case] expected: bool,
    ) {
        let mut rng = ScriptedRng::constant(draw);
        assert_eq!(
            model().roll_accuracy(accuracy, attacker_speed, defender_speed, false, &mut rng),
            expected
        );
    }

    #[test]
    fn test_force_hit_skips_roll() {
        let mut rng = ScriptedRng::constant(0.99);
        assert!(model().roll_accuracy(0, 0, 500, true, &mut rng));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_roll_critical_hit() {
        let model = model();
        // 10% + 100/1000 = 20%
        assert!(model.roll_critical_hit(100, None, &mut ScriptedRng::constant(0.19)));
        assert!(!model.roll_critical_hit(100, None, &mut ScriptedRng::constant(0.21)));
        assert!(model.roll_critical_hit(0, Some(true), &mut ScriptedRng::constant(0.99)));
        assert!(!model.roll_critical_hit(900, Some(false), &mut ScriptedRng::constant(0.0)));
    }

    #[rstest]
    #[case(100, 0, 100)]
    #[case(100, 1, 115)]
    #[case(100, 2, 130)]
    #[case(77, 3, 111)]
    fn test_calculate_max_hp(#[case] base: u32, #[case] stage: u32, #[case] expected: u32) {
        assert_eq!(model().calculate_max_hp(base, stage), expected);
    }

    #[test]
    fn test_status_damage() {
        let model = model();
        assert_eq!(model.calculate_status_damage(StatusEffect::Burn, 160, 1), 10);
        assert_eq!(model.calculate_status_damage(StatusEffect::Poison, 160, 3), 30);
        assert_eq!(model.calculate_status_damage(StatusEffect::Burn, 15, 1), 0);
        assert_eq!(model.calculate_status_damage(StatusEffect::Stun, 160, 4), 0);

        let mut card = TestCardBuilder::new("sick", Element::Soul)
            .with_stats(50, 50, 50, 160)
            .build();
        card.add_status(StatusEffect::Burn);
        card.add_status(StatusEffect::Poison);
        card.add_status(StatusEffect::Poison);
        card.add_status(StatusEffect::Stun);
        assert_eq!(model.status_damage(&card), 10 + 20);
    }

    #[test]
    fn test_healing() {
        let model = model();
        let mend = MoveData::new("mend", Element::Mind, MoveType::Heal, 30, 100);
        assert_eq!(model.calculate_healing(&mend, 0), 30);
        assert_eq!(model.calculate_healing(&mend, 2), 36);
        assert_eq!(model.calculate_healing(&attack(Element::Mind, 30, 100), 2), 0);
    }

    #[test]
    fn test_defense_reduction() {
        let model = model();
        let brace = MoveData::new("brace", Element::Body, MoveType::Defend, 0, 100);
        assert_eq!(model.calculate_defense_reduction(&brace), 0.5);
        assert_eq!(model.calculate_defense_reduction(&attack(Element::Body, 40, 100)), 1.0);
    }

    #[rstest]
    #[case(Rarity::Common, 100)]
    #[case(Rarity::Uncommon, 110)]
    #[case(Rarity::Rare, 125)]
    #[case(Rarity::Epic, 140)]
    #[case(Rarity::Legendary, 160)]
    fn test_rarity_bonus(#[case] rarity: Rarity, #[case] expected: u32) {
        assert_eq!(model().apply_rarity_bonus(100, rarity), expected);
    }

    #[test]
    fn test_rarity_bonus_for_key() {
        let model = model();
        assert_eq!(model.apply_rarity_bonus_for_key(100, "epic"), 140);
        assert_eq!(model.apply_rarity_bonus_for_key(100, "unknown"), 100);
    }

    #[test]
    fn test_floor_stat_guards() {
        assert_eq!(floor_stat(-5.0), 0);
        assert_eq!(floor_stat(f64::NAN), 0);
        assert_eq!(floor_stat(114.99999999999999), 115);
        assert_eq!(floor_stat(2.7), 2);
    }
}
