//! Resolution steps.
//!
//! A `Step` is one unit of work the queue executes against the game
//! state. Steps are plain data, so a queued game is fully serializable
//! even while suspended waiting for a player decision. A step either
//! completes or returns a prompt; a prompted step is stored as-is and
//! re-executed with the player's decision once it arrives.

use serde::{Deserialize, Serialize};

use crate::abilities::GameAction;
use crate::abilities::TargetSpec;
use crate::core::{CardUid, Location, PlayerId};
use crate::cards::CardType;
use crate::effects::{Duration, EffectName, EffectTarget};
use crate::events::{EventEffect, EventName, GameEvent};
use crate::game::GameState;

use super::machine::PhaseName;

/// Fate granted to each player when income is collected.
pub const BASE_FATE_INCOME: i64 = 7;

/// What a suspended step is asking for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    /// Take an action or pass priority.
    ActionOrPass,
    /// Pick one card from the candidates.
    ChooseCard { candidates: Vec<CardUid> },
}

/// A pending player decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub player: PlayerId,
    pub kind: PromptKind,
    pub text: String,
}

/// A player's answer to a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Pass,
    TakeAction { card: CardUid, action: usize },
    CardChosen(CardUid),
}

/// Result of executing a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Complete,
    Waiting(Prompt),
}

/// One unit of queue work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    BeginPhase(PhaseName),
    EndPhase(PhaseName),
    /// Turn dynasty cards on provinces face up.
    RevealProvinceCards,
    /// Grant each player their fate income.
    CollectFate,
    DrawCards {
        count: usize,
    },
    /// Rotating action window. Completes when every player has passed.
    ActionWindow {
        current: PlayerId,
        passed: Vec<bool>,
    },
    /// Resolve one declared card action, suspending for a target
    /// choice when the action needs one.
    ResolveAction {
        card: CardUid,
        action: usize,
        target: Option<CardUid>,
    },
    /// Resolve one triggered ability from an event window.
    TriggeredAbility {
        card: CardUid,
        ability: usize,
        event: GameEvent,
    },
    /// Log announced events and carry out their primary effect. Sits
    /// between a window's interrupts and its reactions.
    RaiseEvent {
        events: Vec<GameEvent>,
        effect: EventEffect,
    },
    /// Characters without fate leave play; the rest lose one fate.
    DiscardFateFromCharacters,
    /// Ready all bowed cards that are allowed to ready.
    ReadyCards,
    EndRound,
}

impl Step {
    /// Execute against the state. `decision` is `Some` only when the
    /// step previously returned `Waiting` and the player answered.
    pub fn execute(&mut self, state: &mut GameState, decision: Option<Decision>) -> StepOutcome {
        match self {
            Step::BeginPhase(phase) => {
                let phase = *phase;
                state.current_phase = Some(phase);
                if phase == PhaseName::Dynasty {
                    for id in PlayerId::all(state.player_count) {
                        state.players[id].begin_dynasty();
                    }
                }
                log::debug!("phase {phase} begins");
                state.raise_event(GameEvent::new(EventName::OnPhaseStarted));
                StepOutcome::Complete
            }

            Step::EndPhase(phase) => {
                state.effects.expire(Duration::UntilEndOfPhase);
                if *phase == PhaseName::Conflict {
                    state.end_conflict();
                }
                state.current_phase = None;
                state.raise_event(GameEvent::new(EventName::OnPhaseEnded));
                StepOutcome::Complete
            }

            Step::RevealProvinceCards => {
                let facedown: Vec<CardUid> = state
                    .cards
                    .iter()
                    .filter(|(_, c)| {
                        // the province slot itself stays facedown until
                        // attacked; everything sitting on it turns up
                        c.zone.is_province()
                            && c.facedown
                            && !matches!(c.card_type(), CardType::Province | CardType::Stronghold)
                    })
                    .map(|(&uid, _)| uid)
                    .collect();
                for uid in facedown {
                    state.reveal_card(uid);
                }
                StepOutcome::Complete
            }

            Step::CollectFate => {
                for id in PlayerId::all(state.player_count) {
                    state.players[id].fate += BASE_FATE_INCOME;
                    state.raise_event(
                        GameEvent::new(EventName::OnFateCollected)
                            .with_player(id)
                            .with_value(BASE_FATE_INCOME),
                    );
                }
                StepOutcome::Complete
            }

            Step::DrawCards { count } => {
                let count = *count;
                for id in state.players_in_first_player_order() {
                    state.draw_cards(id, count);
                }
                StepOutcome::Complete
            }

            Step::ActionWindow { current, passed } => {
                match decision {
                    None => StepOutcome::Waiting(action_prompt(*current)),

                    Some(Decision::Pass) => {
                        passed[current.index()] = true;
                        if state.current_phase == Some(PhaseName::Dynasty) {
                            state.players[*current].passed_dynasty = true;
                        }
                        match next_unpassed(*current, passed, state.player_count) {
                            Some(next) => {
                                *current = next;
                                StepOutcome::Waiting(action_prompt(next))
                            }
                            None => StepOutcome::Complete,
                        }
                    }

                    Some(Decision::TakeAction { card, action }) => {
                        if !action_available(state, *current, card, action) {
                            return StepOutcome::Waiting(action_prompt(*current));
                        }
                        // priority rotates after an action; the window
                        // re-queues itself behind the resolution
                        let next =
                            next_unpassed(*current, passed, state.player_count).unwrap_or(*current);
                        state.queue_steps([
                            Step::ResolveAction { card, action, target: None },
                            Step::ActionWindow { current: next, passed: passed.clone() },
                        ]);
                        StepOutcome::Complete
                    }

                    Some(Decision::CardChosen(_)) => StepOutcome::Waiting(action_prompt(*current)),
                }
            }

            Step::ResolveAction { card, action, target } => {
                let uid = *card;
                let index = *action;

                // the world may have changed since the action was
                // declared; silently skip a stale resolution
                if !action_resolvable(state, uid, index) {
                    return StepOutcome::Complete;
                }
                let (controller, title, target_spec, game_action) = {
                    let c = match state.card(uid) {
                        Some(c) => c,
                        None => return StepOutcome::Complete,
                    };
                    let a = &c.abilities.actions[index];
                    (c.controller, a.title.clone(), a.target.clone(), a.action.clone())
                };

                if let TargetSpec::ChooseCard { location, condition } = &target_spec {
                    if target.is_none() {
                        let candidates: Vec<CardUid> = state
                            .cards_in(*location)
                            .into_iter()
                            .filter(|&c| state.eval_condition(condition, c, None))
                            .collect();
                        if candidates.is_empty() {
                            return StepOutcome::Complete;
                        }
                        match decision {
                            Some(Decision::CardChosen(chosen)) if candidates.contains(&chosen) => {
                                *target = Some(chosen);
                            }
                            _ => {
                                return StepOutcome::Waiting(Prompt {
                                    player: controller,
                                    kind: PromptKind::ChooseCard { candidates },
                                    text: format!("Choose a card for {title}"),
                                });
                            }
                        }
                    }
                }

                if let Some(card) = state.card_mut(uid) {
                    if let Some(limit) = &mut card.abilities.actions[index].limit {
                        limit.increment();
                    }
                }
                state.record_ability(uid, title);
                state.execute_game_action(&game_action, uid, *target, controller);
                StepOutcome::Complete
            }

            Step::TriggeredAbility { card, ability, event } => {
                let uid = *card;
                let index = *ability;
                let event = event.clone();

                let (title, condition, action, controller, limit_ok) = {
                    let Some(c) = state.card(uid) else {
                        return StepOutcome::Complete;
                    };
                    if !c.can_trigger_abilities(&state.effects) {
                        return StepOutcome::Complete;
                    }
                    let Some(a) = c.abilities.reactions.get(index) else {
                        return StepOutcome::Complete;
                    };
                    let bonus = state
                        .effects
                        .sum(EffectTarget::Card(uid), EffectName::IncreaseLimitOnAbilities);
                    let limit_ok = a.limit.map_or(true, |l| !l.is_at_max(bonus));
                    (a.title.clone(), a.condition.clone(), a.action.clone(), c.controller, limit_ok)
                };
                if !limit_ok || !state.eval_condition(&condition, uid, Some(&event)) {
                    return StepOutcome::Complete;
                }

                if let Some(c) = state.card_mut(uid) {
                    if let Some(limit) = &mut c.abilities.reactions[index].limit {
                        limit.increment();
                    }
                }
                state.record_ability(uid, title);
                state.execute_game_action(&action, uid, event.card, controller);
                StepOutcome::Complete
            }

            Step::RaiseEvent { events, effect } => {
                state.resolve_event(events.clone(), effect.clone());
                StepOutcome::Complete
            }

            Step::DiscardFateFromCharacters => {
                let characters: Vec<CardUid> = state
                    .cards
                    .iter()
                    .filter(|(_, c)| {
                        c.zone == Location::PlayArea && c.card_type() == CardType::Character
                    })
                    .map(|(&uid, _)| uid)
                    .collect();
                for uid in characters {
                    let has_fate = state.card(uid).is_some_and(|c| c.has_token("fate"));
                    if has_fate {
                        if let Some(c) = state.card_mut(uid) {
                            c.remove_token("fate", 1);
                        }
                    } else {
                        state.move_card(uid, Location::DynastyDiscard);
                    }
                }
                StepOutcome::Complete
            }

            Step::ReadyCards => {
                let bowed: Vec<CardUid> = state
                    .cards
                    .iter()
                    .filter(|(_, c)| c.zone == Location::PlayArea && c.bowed)
                    .map(|(&uid, _)| uid)
                    .collect();
                for uid in bowed {
                    let readies = state
                        .card(uid)
                        .is_some_and(|c| c.readies_during_ready_phase(&state.effects));
                    if readies {
                        if let Some(c) = state.card_mut(uid) {
                            c.bowed = false;
                        }
                    }
                }
                StepOutcome::Complete
            }

            Step::EndRound => {
                state.effects.expire(Duration::UntilEndOfRound);
                let uids: Vec<CardUid> = state.cards.keys().copied().collect();
                for uid in uids {
                    if let Some(c) = state.card_mut(uid) {
                        c.abilities.reset_limits();
                    }
                }
                state.first_player = state.first_player.next(state.player_count);
                state.round_number += 1;
                state.raise_event(GameEvent::new(EventName::OnRoundEnded));
                StepOutcome::Complete
            }
        }
    }
}

fn action_prompt(player: PlayerId) -> Prompt {
    Prompt {
        player,
        kind: PromptKind::ActionOrPass,
        text: "Take an action or pass".to_string(),
    }
}

/// Next player in seat order who has not passed, or `None` when the
/// window is done.
fn next_unpassed(current: PlayerId, passed: &[bool], player_count: usize) -> Option<PlayerId> {
    let mut candidate = current.next(player_count);
    for _ in 0..player_count {
        if !passed[candidate.index()] {
            return Some(candidate);
        }
        candidate = candidate.next(player_count);
    }
    None
}

/// Can `player` declare this action right now?
fn action_available(state: &GameState, player: PlayerId, uid: CardUid, index: usize) -> bool {
    let Some(card) = state.card(uid) else {
        return false;
    };
    if card.controller != player || card.zone != Location::PlayArea {
        return false;
    }
    action_resolvable(state, uid, index)
}

/// Is the action's declaration still valid: card triggerable, limit
/// not spent, condition holding?
fn action_resolvable(state: &GameState, uid: CardUid, index: usize) -> bool {
    let Some(card) = state.card(uid) else {
        return false;
    };
    if !card.can_trigger_abilities(&state.effects) {
        return false;
    }
    let Some(action) = card.abilities.actions.get(index) else {
        return false;
    };
    if let Some(limit) = action.limit {
        let bonus = state
            .effects
            .sum(EffectTarget::Card(uid), EffectName::IncreaseLimitOnAbilities);
        if limit.is_at_max(bonus) {
            return false;
        }
    }
    state.eval_condition(&action.condition, uid, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::ActionProps;
    use crate::cards::{CardData, CardType};

    fn in_play_character(state: &mut GameState, owner: u8) -> CardUid {
        let uid = state
            .add_card(
                PlayerId::new(owner),
                CardData::new("eager-scout", "Eager Scout", CardType::Character)
                    .with_skills(2, 1),
                |setup| {
                    setup.action(
                        ActionProps::new("Rally", GameAction::GainHonor { amount: 1 })
                            .with_limit(1),
                    );
                },
            )
            .unwrap();
        state.move_card(uid, Location::PlayArea);
        state.take_pending_steps();
        uid
    }

    #[test]
    fn test_action_window_all_pass() {
        let mut state = GameState::new(2, 1);
        let mut step = Step::ActionWindow {
            current: PlayerId::new(0),
            passed: vec![false, false],
        };

        let outcome = step.execute(&mut state, None);
        assert!(matches!(
            outcome,
            StepOutcome::Waiting(Prompt { player, kind: PromptKind::ActionOrPass, .. })
                if player == PlayerId::new(0)
        ));

        let outcome = step.execute(&mut state, Some(Decision::Pass));
        assert!(matches!(
            outcome,
            StepOutcome::Waiting(Prompt { player, .. }) if player == PlayerId::new(1)
        ));

        let outcome = step.execute(&mut state, Some(Decision::Pass));
        assert_eq!(outcome, StepOutcome::Complete);
    }

    #[test]
    fn test_action_window_queues_resolution() {
        let mut state = GameState::new(2, 1);
        let uid = in_play_character(&mut state, 0);

        let mut step = Step::ActionWindow {
            current: PlayerId::new(0),
            passed: vec![false, false],
        };
        step.execute(&mut state, None);
        let outcome = step.execute(&mut state, Some(Decision::TakeAction { card: uid, action: 0 }));
        assert_eq!(outcome, StepOutcome::Complete);

        let queued = state.take_pending_steps();
        assert_eq!(queued.len(), 2);
        assert!(matches!(queued[0], Step::ResolveAction { card, action: 0, .. } if card == uid));
        assert!(matches!(
            queued[1],
            Step::ActionWindow { current, .. } if current == PlayerId::new(1)
        ));
    }

    #[test]
    fn test_action_window_rejects_opponents_card() {
        let mut state = GameState::new(2, 1);
        let uid = in_play_character(&mut state, 1);

        let mut step = Step::ActionWindow {
            current: PlayerId::new(0),
            passed: vec![false, false],
        };
        step.execute(&mut state, None);
        let outcome = step.execute(&mut state, Some(Decision::TakeAction { card: uid, action: 0 }));

        // invalid declaration re-prompts the same player
        assert!(matches!(
            outcome,
            StepOutcome::Waiting(Prompt { player, .. }) if player == PlayerId::new(0)
        ));
        assert!(state.take_pending_steps().is_empty());
    }

    #[test]
    fn test_resolve_action_spends_limit() {
        let mut state = GameState::new(2, 1);
        let uid = in_play_character(&mut state, 0);

        let mut step = Step::ResolveAction { card: uid, action: 0, target: None };
        assert_eq!(step.execute(&mut state, None), StepOutcome::Complete);
        assert_eq!(state.players[PlayerId::new(0)].honor, 1);
        assert_eq!(state.history.len(), 1);

        // second resolution is stale: the limit is spent
        let mut again = Step::ResolveAction { card: uid, action: 0, target: None };
        assert_eq!(again.execute(&mut state, None), StepOutcome::Complete);
        assert_eq!(state.players[PlayerId::new(0)].honor, 1);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_reveal_province_cards_includes_holdings() {
        let mut state = GameState::new(2, 1);
        let holding = state
            .add_card(
                PlayerId::new(0),
                CardData::new("imperial-storehouse", "Imperial Storehouse", CardType::Holding),
                |_| {},
            )
            .unwrap();
        let province = state
            .add_card(
                PlayerId::new(0),
                CardData::new("shameful-display", "Shameful Display", CardType::Province)
                    .with_strength(4),
                |_| {},
            )
            .unwrap();
        state.move_card(holding, Location::ProvinceTwo);
        state.take_pending_steps();
        assert!(state.card(holding).unwrap().facedown);

        Step::RevealProvinceCards.execute(&mut state, None);

        assert!(!state.card(holding).unwrap().facedown);
        // the province slot itself waits for an attack or card effect
        assert!(state.card(province).unwrap().facedown);
    }

    #[test]
    fn test_discard_fate_from_characters() {
        let mut state = GameState::new(2, 1);
        let with_fate = in_play_character(&mut state, 0);
        let without_fate = in_play_character(&mut state, 1);
        if let Some(c) = state.card_mut(with_fate) {
            c.add_token("fate", 2);
        }

        let mut step = Step::DiscardFateFromCharacters;
        step.execute(&mut state, None);

        assert_eq!(state.card(with_fate).unwrap().zone, Location::PlayArea);
        assert_eq!(state.card(with_fate).unwrap().token_count("fate"), 1);
        assert_eq!(state.card(without_fate).unwrap().zone, Location::DynastyDiscard);
    }

    #[test]
    fn test_ready_cards_honors_does_not_ready() {
        use crate::effects::EffectSpec;

        let mut state = GameState::new(2, 1);
        let normal = in_play_character(&mut state, 0);
        let stuck = in_play_character(&mut state, 0);
        state.card_mut(normal).unwrap().bowed = true;
        state.card_mut(stuck).unwrap().bowed = true;
        state.effects.apply(
            stuck,
            EffectTarget::Card(stuck),
            EffectSpec::flag(EffectName::DoesNotReady),
            Duration::UntilEndOfRound,
        );

        Step::ReadyCards.execute(&mut state, None);

        assert!(!state.card(normal).unwrap().bowed);
        assert!(state.card(stuck).unwrap().bowed);
    }

    #[test]
    fn test_end_round_rotates_first_player_and_resets_limits() {
        let mut state = GameState::new(2, 1);
        let uid = in_play_character(&mut state, 0);
        Step::ResolveAction { card: uid, action: 0, target: None }.execute(&mut state, None);

        Step::EndRound.execute(&mut state, None);

        assert_eq!(state.first_player, PlayerId::new(1));
        assert_eq!(state.round_number, 2);
        // limit usable again next round
        let limit = state.card(uid).unwrap().abilities.actions[0].limit.unwrap();
        assert_eq!(limit.used(), 0);
    }
}
