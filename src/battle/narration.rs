use crate::battle::damage::DamageResult;
use schema::{Effectiveness, MoveData};

/// Build the battle-log line for one attack.
pub fn generate_narration(
    attacker_name: &str,
    defender_name: &str,
    move_data: &MoveData,
    result: &DamageResult,
) -> String {
    let move_name = move_data.display_name();
    if result.missed {
        return format!("{} used {}, but it missed!", attacker_name, move_name);
    }

    let mut line = format!("{} used {}!", attacker_name, move_name);
    match result.effectiveness {
        Effectiveness::Super => line.push_str(" It's super effective!"),
        Effectiveness::Weak => line.push_str(" It's not very effective..."),
        Effectiveness::Normal => {}
    }
    if result.is_critical {
        line.push_str(" A critical hit!");
    }
    if result.damage > 0 {
        line.push_str(&format!(" {} took {} damage.", defender_name, result.damage));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{Element, MoveType};

    fn flare() -> MoveData {
        MoveData::new("spirit_flare", Element::Soul, MoveType::Attack, 70, 85)
            .with_name("Spirit Flare")
    }

    fn result(
        damage: u32,
        effectiveness: Effectiveness,
        is_critical: bool,
        missed: bool,
    ) -> DamageResult {
        DamageResult {
            damage,
            is_critical,
            type_multiplier: 1.0,
            effectiveness,
            missed,
        }
    }

    #[test]
    fn test_miss_line() {
        let missed = result(0, Effectiveness::Super, true, true);
        let line = generate_narration("Gloom", "Brick", &flare(), &missed);
        assert_eq!(line, "Gloom used Spirit Flare, but it missed!");
    }

    #[test]
    fn test_full_line() {
        let crit = result(42, Effectiveness::Super, true, false);
        let line = generate_narration("Gloom", "Brick", &flare(), &crit);
        assert_eq!(
            line,
            "Gloom used Spirit Flare! It's super effective! A critical hit! Brick took 42 damage."
        );
    }

    #[test]
    fn test_plain_line_uses_id_without_name() {
        let plain = MoveData::new("jab", Element::Body, MoveType::Attack, 10, 100);
        let normal = result(3, Effectiveness::Normal, false, false);
        let line = generate_narration("A", "B", &plain, &normal);
        assert_eq!(line, "A used jab! B took 3 damage.");

        let resisted = result(1, Effectiveness::Weak, false, false);
        let weak = generate_narration("A", "B", &plain, &resisted);
        assert_eq!(weak, "A used jab! It's not very effective... B took 1 damage.");
    }
}
