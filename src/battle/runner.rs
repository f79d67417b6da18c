use crate::battle::action::BattleAction;
use crate::battle::ai::{AiPolicy, Behavior};
use crate::battle::damage::DamageModel;
use crate::battle::rng::BattleRng;
use crate::battle::session::{BattleSession, SideId};
use crate::errors::ActionError;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Summary of a finished (or abandoned) battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Option<SideId>,
    pub finished: bool,
    pub turns: u32,
    pub log: Vec<String>,
}

/// Drive a battle to the end with both sides played by the same policy.
pub fn run_ai_battle(
    session: &mut BattleSession,
    policy: &AiPolicy,
    rng: &mut dyn BattleRng,
    max_turns: u32,
) -> BattleOutcome {
    run_battle(session, policy, policy, policy.model(), rng, max_turns)
}

/// Play turns until one side is out of cards or `max_turns` is reached.
///
/// Each turn: knocked-out actives are replaced, both sides choose, forfeits
/// and switches resolve before moves, moves resolve fastest first (the
/// player wins speed ties), then status effects tick.
pub fn run_battle(
    session: &mut BattleSession,
    player: &dyn Behavior,
    opponent: &dyn Behavior,
    model: &DamageModel,
    rng: &mut dyn BattleRng,
    max_turns: u32,
) -> BattleOutcome {
    let controllers = Controllers { player, opponent };
    let mut log = Vec::new();
    let mut turns = 0;
    while !session.is_finished() && turns < max_turns {
        turns += 1;
        play_turn(session, &controllers, model, rng, &mut log);
        session.advance_turn();
    }

    if !session.is_finished() {
        tracing::debug!(turns, "battle stopped at turn limit");
    }
    BattleOutcome {
        winner: session.winner(),
        finished: session.is_finished(),
        turns,
        log,
    }
}

struct Controllers<'b> {
    player: &'b dyn Behavior,
    opponent: &'b dyn Behavior,
}

impl<'b> Controllers<'b> {
    fn for_side(&self, side: SideId) -> &'b dyn Behavior {
        match side {
            SideId::Player => self.player,
            SideId::Ai => self.opponent,
        }
    }
}

fn play_turn(
    session: &mut BattleSession,
    controllers: &Controllers<'_>,
    model: &DamageModel,
    rng: &mut dyn BattleRng,
    log: &mut Vec<String>,
) {
    for side in [SideId::Player, SideId::Ai] {
        if session.is_finished() || !session.side(side).needs_replacement() {
            continue;
        }
        let action = controllers.for_side(side).decide_action(&session.context_for(side), rng);
        resolve(session, side, &action, model, rng, log);
    }
    if session.is_finished() {
        return;
    }

    let mut queue: Vec<(SideId, BattleAction)> = [SideId::Player, SideId::Ai]
        .into_iter()
        .map(|side| {
            let context = session.context_for(side);
            (side, controllers.for_side(side).decide_action(&context, rng))
        })
        .collect();
    queue.sort_by_key(|(side, action)| {
        let speed = session.side(*side).active().map_or(0, |card| card.stats.speed);
        (action_priority(action), Reverse(speed), *side == SideId::Ai)
    });

    for (side, action) in &queue {
        if session.is_finished() {
            return;
        }
        resolve(session, *side, action, model, rng, log);
    }

    for (side, dealt) in session.apply_status_ticks(model) {
        if let Some(card) = session.side(side).active() {
            log.push(format!("{} took {} damage from its afflictions.", card.name, dealt));
        }
    }
}

fn action_priority(action: &BattleAction) -> u8 {
    match action {
        BattleAction::Forfeit => 0,
        BattleAction::Switch { .. } => 1,
        BattleAction::Attack { .. } => 2,
    }
}

fn resolve(
    session: &mut BattleSession,
    side: SideId,
    action: &BattleAction,
    model: &DamageModel,
    rng: &mut dyn BattleRng,
    log: &mut Vec<String>,
) {
    match session.apply_action(side, action, model, rng) {
        Ok(report) => log.push(report.narration),
        Err(ActionError::CardKnockedOut(index)) => {
            tracing::debug!(?side, index, "action skipped, card is knocked out");
        }
        Err(err) => {
            tracing::warn!(?side, ?action, %err, "action rejected");
        }
    }
}
