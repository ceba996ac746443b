//! Central game state.
//!
//! `GameState` owns the cards, players, effect engine and event bus,
//! and is the only place zone transitions happen. A move re-derives
//! everything hanging off the zone: facing, event-bus subscriptions,
//! lasting effects, persistent-effect reconciliation, and the events
//! other cards react to.
//!
//! Mutations that other cards can interrupt (moves, conflict
//! declarations) are announced before they happen: the interrupt half
//! of the trigger window resolves against the old state, the mutation
//! runs as the event's own step, and reactions see the result. With
//! nobody listening the mutation applies in place.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::abilities::{evaluate, Condition, ConditionContext, EffectTargetSpec, GameAction};
use crate::cards::{Card, CardData, CardType};
use crate::core::{
    CardUid, Conflict, ConflictType, EffectRef, GameRng, Location, Player, PlayerId, PlayerMap,
};
use crate::effects::{Duration, EffectEngine, EffectTarget};
use crate::error::SetupError;
use crate::events::{
    order_window, EventBus, EventEffect, EventName, GameEvent, Listener, TriggerCandidate,
    TriggerOrderPolicy,
};
use crate::phases::{PhaseName, Step};

/// One resolved ability, for the game's resolution trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub card: CardUid,
    pub title: String,
}

/// The whole game, minus the step queue driving it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub player_count: usize,
    pub players: PlayerMap<Player>,
    pub first_player: PlayerId,
    /// All cards, keyed by uid. A `BTreeMap` keeps iteration order
    /// deterministic across runs and serialization round trips.
    pub cards: BTreeMap<CardUid, Card>,
    pub effects: EffectEngine,
    pub bus: EventBus,
    pub current_conflict: Option<Conflict>,
    pub current_phase: Option<PhaseName>,
    pub manual_mode: bool,
    pub round_number: u32,
    /// Every event published so far, in publication order.
    pub event_log: im::Vector<GameEvent>,
    /// Every ability resolved so far, in resolution order.
    pub history: im::Vector<AbilityRecord>,
    pub rng: GameRng,
    pub trigger_policy: TriggerOrderPolicy,
    /// Per-player manual-mode card selections.
    pub selections: PlayerMap<BTreeSet<CardUid>>,
    pending_steps: Vec<Step>,
    next_uid: u32,
}

impl GameState {
    /// A fresh game with empty decks and the given rng seed.
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self {
            player_count,
            players: PlayerMap::new(player_count, |id| {
                Player::new(id, format!("Player {}", id.index() + 1))
            }),
            first_player: PlayerId::new(0),
            cards: BTreeMap::new(),
            effects: EffectEngine::new(),
            bus: EventBus::new(),
            current_conflict: None,
            current_phase: None,
            manual_mode: false,
            round_number: 1,
            event_log: im::Vector::new(),
            history: im::Vector::new(),
            rng: GameRng::new(seed),
            trigger_policy: TriggerOrderPolicy::default(),
            selections: PlayerMap::new(player_count, |_| BTreeSet::new()),
            pending_steps: Vec::new(),
            next_uid: 1,
        }
    }

    // ----- card access -----

    pub fn card(&self, uid: CardUid) -> Option<&Card> {
        self.cards.get(&uid)
    }

    pub fn card_mut(&mut self, uid: CardUid) -> Option<&mut Card> {
        self.cards.get_mut(&uid)
    }

    /// Uids of all cards currently in a zone, in uid order.
    pub fn cards_in(&self, zone: Location) -> Vec<CardUid> {
        self.cards
            .iter()
            .filter(|(_, c)| c.zone == zone)
            .map(|(&uid, _)| uid)
            .collect()
    }

    /// Players starting from the first player, in seat rotation.
    pub fn players_in_first_player_order(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = PlayerId::all(self.player_count).collect();
        ids.sort_by_key(|p| p.rotation_from(self.first_player, self.player_count));
        ids
    }

    // ----- construction -----

    /// Create a card and register it in its starting zone.
    ///
    /// Ability setup errors surface here, before the game starts.
    pub fn add_card(
        &mut self,
        owner: PlayerId,
        data: CardData,
        setup: impl FnOnce(&mut crate::abilities::AbilitySetup),
    ) -> Result<CardUid, SetupError> {
        let uid = CardUid::new(self.next_uid);
        self.next_uid += 1;

        let card = Card::new(uid, owner, data, setup)?;
        let zone = card.zone;
        self.cards.insert(uid, card);

        match zone {
            Location::DynastyDeck => self.players[owner].dynasty_deck.push(uid),
            Location::ConflictDeck => self.players[owner].conflict_deck.push(uid),
            _ => {}
        }

        self.update_ability_events(uid, zone);
        self.reconcile_card(uid);
        Ok(uid)
    }

    // ----- zone transitions -----

    /// Announce a card's move to a zone. The move itself is the
    /// announcement's primary effect: interrupts listening for it
    /// resolve while the card is still where it was, then the move
    /// applies, then reactions see the card in its new zone.
    ///
    /// Moving to the current zone is a no-op: nothing re-registers, no
    /// event is published.
    pub fn move_card(&mut self, uid: CardUid, to: Location) {
        let Some(card) = self.cards.get(&uid) else {
            return;
        };
        let origin = card.zone;
        if origin == to {
            return;
        }
        let card_type = card.data.card_type;
        let leaving_play = origin == Location::PlayArea && to != Location::PlayArea;

        let mut events = vec![GameEvent::card_moved(uid, origin, to)];
        if leaving_play {
            events.push(GameEvent::new(EventName::OnCardLeavesPlay).with_card(uid));
        }
        if card_type == CardType::Character && to == Location::PlayArea {
            events.push(GameEvent::new(EventName::OnCharacterEntersPlay).with_card(uid));
        }
        self.raise_simultaneous(events, EventEffect::MoveCard { card: uid, to });
    }

    /// Carry out a move announced by `move_card`, re-deriving all
    /// zone-dependent state. An interrupt may have displaced the card
    /// already, so the origin is re-read here; a card that ended up in
    /// the destination anyway is left alone.
    fn apply_move(&mut self, uid: CardUid, to: Location) {
        let Some(card) = self.cards.get(&uid) else {
            return;
        };
        let origin = card.zone;
        if origin == to {
            return;
        }
        let owner = card.owner;
        let card_type = card.data.card_type;

        if origin.is_deck() {
            self.remove_from_deck(owner, origin, uid);
        }

        if let Some(card) = self.cards.get_mut(&uid) {
            card.zone = to;
            if to.is_face_up() {
                card.facedown = false;
            } else if to.is_deck() {
                card.facedown = true;
            }
        }

        match to {
            Location::DynastyDeck => self.players[owner].dynasty_deck.push(uid),
            Location::ConflictDeck => self.players[owner].conflict_deck.push(uid),
            _ => {}
        }

        self.update_ability_events(uid, to);

        let leaving_play = origin == Location::PlayArea && to != Location::PlayArea;
        let holding_leaving_provinces =
            card_type == CardType::Holding && origin.is_province() && !to.is_province();

        if leaving_play || holding_leaving_provinces {
            self.effects.remove_lasting(uid);
        }
        if leaving_play {
            if let Some(card) = self.cards.get_mut(&uid) {
                card.leaves_play();
            }
            if let Some(conflict) = &mut self.current_conflict {
                conflict.remove_participant(uid);
            }
        }

        self.reconcile_card(uid);
    }

    /// Turn a card face up and publish the reveal.
    pub fn reveal_card(&mut self, uid: CardUid) {
        let Some(card) = self.cards.get_mut(&uid) else {
            return;
        };
        if !card.facedown {
            return;
        }
        card.facedown = false;
        self.reconcile_card(uid);
        self.raise_event(GameEvent::new(EventName::OnCardRevealed).with_card(uid));
    }

    fn remove_from_deck(&mut self, owner: PlayerId, deck: Location, uid: CardUid) {
        let list = match deck {
            Location::DynastyDeck => &mut self.players[owner].dynasty_deck,
            Location::ConflictDeck => &mut self.players[owner].conflict_deck,
            _ => return,
        };
        list.retain(|&c| c != uid);
    }

    /// Diff a card's triggered-ability subscriptions against the set
    /// its new zone wants. Subscriptions never register for events
    /// that would fire while an event card sits in a deck.
    fn update_ability_events(&mut self, uid: CardUid, to: Location) {
        let Self { cards, bus, .. } = self;
        let Some(card) = cards.get_mut(&uid) else {
            return;
        };
        let is_event_card = card.data.card_type == CardType::Event;

        for (index, reaction) in card.abilities.reactions.iter_mut().enumerate() {
            let desired = reaction.listens_in(to) && !(is_event_card && to.is_deck());
            if desired && !reaction.is_registered() {
                for &event in &reaction.events {
                    let id = bus.subscribe(event, Listener { card: uid, ability: index });
                    reaction.subscriptions.push(id);
                }
            } else if !desired && reaction.is_registered() {
                for id in reaction.subscriptions.drain(..) {
                    bus.unsubscribe(id);
                }
            }
        }
    }

    // ----- persistent effect reconciliation -----

    /// Bring one card's persistent effects in line with its zone,
    /// blank status and conditions: apply each effect at most once
    /// while it should hold, remove it exactly once when it stops.
    pub fn reconcile_card(&mut self, uid: CardUid) {
        enum Change {
            Apply(usize),
            Remove(usize, EffectRef),
        }

        let changes: Vec<Change> = {
            let Some(card) = self.cards.get(&uid) else {
                return;
            };
            let blank = card.is_blank(&self.effects);
            let ctx = ConditionContext::new(card, &self.effects)
                .with_conflict(self.current_conflict.as_ref());

            card.abilities
                .persistent_effects
                .iter()
                .enumerate()
                .filter_map(|(index, pe)| {
                    let wanted =
                        pe.scope.covers(card.zone) && !blank && evaluate(&pe.condition, &ctx);
                    match (wanted, pe.active_ref) {
                        (true, None) => Some(Change::Apply(index)),
                        (false, Some(handle)) => Some(Change::Remove(index, handle)),
                        _ => None,
                    }
                })
                .collect()
        };

        for change in changes {
            match change {
                Change::Apply(index) => {
                    let Some((target, spec)) = self.cards.get(&uid).map(|card| {
                        let pe = &card.abilities.persistent_effects[index];
                        let target = match pe.target {
                            EffectTargetSpec::SelfCard => EffectTarget::Card(uid),
                            EffectTargetSpec::Controller => EffectTarget::Player(card.controller),
                            EffectTargetSpec::Game => EffectTarget::Game,
                        };
                        (target, pe.spec.clone())
                    }) else {
                        continue;
                    };
                    let handle = self.effects.apply(uid, target, spec, Duration::Persistent);
                    if let Some(card) = self.cards.get_mut(&uid) {
                        card.abilities.persistent_effects[index].active_ref = Some(handle);
                    }
                }
                Change::Remove(index, handle) => {
                    self.effects.remove(handle);
                    if let Some(card) = self.cards.get_mut(&uid) {
                        card.abilities.persistent_effects[index].active_ref = None;
                    }
                }
            }
        }
    }

    /// Reconcile every card. Run by the queue between steps, so an
    /// effect whose condition flipped mid-step settles before the next
    /// step observes it.
    pub fn reconcile_effects(&mut self) {
        let uids: Vec<CardUid> = self.cards.keys().copied().collect();
        for uid in uids {
            self.reconcile_card(uid);
        }
    }

    // ----- events -----

    /// Publish an accomplished fact. The window only holds reactions
    /// in any meaningful sense; interrupts subscribed to the event
    /// still resolve first but cannot precede a mutation that already
    /// happened.
    pub fn raise_event(&mut self, event: GameEvent) {
        self.raise_simultaneous(vec![event], EventEffect::None);
    }

    /// Publish an event whose mutation has not happened yet. The
    /// window's interrupts resolve against the pre-event state, then
    /// the mutation runs as the event's own resolution step, then the
    /// reactions.
    pub fn raise_event_with(&mut self, event: GameEvent, effect: EventEffect) {
        self.raise_simultaneous(vec![event], effect);
    }

    /// Publish simultaneous events sharing one primary effect, ordering
    /// every eligible trigger in a single window. With nobody
    /// listening there is no window and the events resolve in place.
    fn raise_simultaneous(&mut self, events: Vec<GameEvent>, effect: EventEffect) {
        let mut candidates = Vec::new();
        for (event_index, event) in events.iter().enumerate() {
            for listener in self.bus.listeners(event.name) {
                let Some(card) = self.cards.get(&listener.card) else {
                    continue;
                };
                let Some(reaction) = card.abilities.reactions.get(listener.ability) else {
                    continue;
                };
                candidates.push(TriggerCandidate {
                    card: listener.card,
                    ability: listener.ability,
                    kind: reaction.kind,
                    controller: card.controller,
                    event_index,
                });
            }
        }
        if candidates.is_empty() {
            self.resolve_event(events, effect);
            return;
        }

        let window = order_window(
            candidates,
            self.first_player,
            self.player_count,
            self.trigger_policy,
        );
        for candidate in window.before {
            self.pending_steps.push(Step::TriggeredAbility {
                card: candidate.card,
                ability: candidate.ability,
                event: events[candidate.event_index].clone(),
            });
        }
        self.pending_steps.push(Step::RaiseEvent {
            events: events.clone(),
            effect,
        });
        for candidate in window.after {
            self.pending_steps.push(Step::TriggeredAbility {
                card: candidate.card,
                ability: candidate.ability,
                event: events[candidate.event_index].clone(),
            });
        }
    }

    /// Log announced events and carry out their primary effect. Runs
    /// immediately when no trigger was listening, otherwise inside the
    /// queued `Step::RaiseEvent` between the window's halves.
    pub(crate) fn resolve_event(&mut self, events: Vec<GameEvent>, effect: EventEffect) {
        for event in events {
            log::debug!("event {:?}", event.name);
            self.event_log.push_back(event);
        }
        match effect {
            EventEffect::None => {}
            EventEffect::DeclareConflict {
                conflict_type,
                attacker,
                defender,
            } => {
                self.current_conflict = Some(Conflict::new(conflict_type, attacker, defender));
            }
            EventEffect::MoveCard { card, to } => self.apply_move(card, to),
        }
    }

    /// Steps queued by event publication since the last drain. The
    /// queue splices these in ahead of whatever was already pending.
    pub fn take_pending_steps(&mut self) -> Vec<Step> {
        std::mem::take(&mut self.pending_steps)
    }

    /// Queue follow-up steps directly (action windows re-queueing
    /// themselves, abilities scheduling resolution).
    pub fn queue_steps(&mut self, steps: impl IntoIterator<Item = Step>) {
        self.pending_steps.extend(steps);
    }

    /// Evaluate an ability condition for a source card.
    pub fn eval_condition(
        &self,
        condition: &Condition,
        source: CardUid,
        event: Option<&GameEvent>,
    ) -> bool {
        let Some(card) = self.cards.get(&source) else {
            return false;
        };
        let mut ctx =
            ConditionContext::new(card, &self.effects).with_conflict(self.current_conflict.as_ref());
        if let Some(event) = event {
            ctx = ctx.with_event(event);
        }
        evaluate(condition, &ctx)
    }

    // ----- resolving actions -----

    /// Resolve one atomic game action against its target.
    pub fn execute_game_action(
        &mut self,
        action: &GameAction,
        source: CardUid,
        target: Option<CardUid>,
        controller: PlayerId,
    ) {
        let target = target.unwrap_or(source);
        match action {
            GameAction::Ready => {
                if let Some(card) = self.cards.get_mut(&target) {
                    card.bowed = false;
                }
            }
            GameAction::Bow => {
                if let Some(card) = self.cards.get_mut(&target) {
                    card.bowed = true;
                }
            }
            GameAction::MoveToConflict => {
                let card_controller = match self.cards.get(&target) {
                    Some(card) if card.zone == Location::PlayArea => card.controller,
                    _ => return,
                };
                if let Some(conflict) = &mut self.current_conflict {
                    conflict.add_participant(target, card_controller);
                    if let Some(card) = self.cards.get_mut(&target) {
                        card.in_conflict = true;
                    }
                }
            }
            GameAction::SendHome => {
                if let Some(conflict) = &mut self.current_conflict {
                    conflict.remove_participant(target);
                }
                if let Some(card) = self.cards.get_mut(&target) {
                    card.in_conflict = false;
                }
            }
            GameAction::AddToken { kind, count } => {
                if let Some(card) = self.cards.get_mut(&target) {
                    card.add_token(kind, *count);
                }
            }
            GameAction::RemoveToken { kind, count } => {
                if let Some(card) = self.cards.get_mut(&target) {
                    card.remove_token(kind, *count);
                }
            }
            GameAction::MoveCard { to } => self.move_card(target, *to),
            GameAction::ApplyLastingEffect { spec, duration } => {
                self.effects
                    .apply(source, EffectTarget::Card(target), spec.clone(), *duration);
            }
            GameAction::GainHonor { amount } => {
                self.players[controller].honor += amount;
            }
            GameAction::DrawCards { count } => self.draw_cards(controller, *count),
            GameAction::Noop => {}
        }
    }

    /// Draw from the top of the conflict deck into hand.
    pub fn draw_cards(&mut self, player: PlayerId, count: usize) {
        for _ in 0..count {
            let Some(&top) = self.players[player].conflict_deck.last() else {
                break;
            };
            self.move_card(top, Location::Hand);
        }
    }

    pub fn shuffle_dynasty_deck(&mut self, player: PlayerId) {
        let Self { players, rng, .. } = self;
        rng.shuffle(&mut players[player].dynasty_deck);
    }

    pub fn shuffle_conflict_deck(&mut self, player: PlayerId) {
        let Self { players, rng, .. } = self;
        rng.shuffle(&mut players[player].conflict_deck);
    }

    // ----- conflicts -----

    /// Announce a conflict. The declaration itself is the primary
    /// effect: interrupts to `OnConflictDeclared` resolve before any
    /// conflict exists.
    pub fn declare_conflict(
        &mut self,
        conflict_type: ConflictType,
        attacker: PlayerId,
        defender: PlayerId,
    ) {
        self.raise_event_with(
            GameEvent::new(EventName::OnConflictDeclared).with_player(attacker),
            EventEffect::DeclareConflict {
                conflict_type,
                attacker,
                defender,
            },
        );
    }

    /// End the conflict: expire conflict-scoped effects and send every
    /// participant home.
    pub fn end_conflict(&mut self) {
        self.effects.expire(Duration::UntilEndOfConflict);
        if let Some(conflict) = self.current_conflict.take() {
            for uid in conflict.attackers.iter().chain(conflict.defenders.iter()) {
                if let Some(card) = self.cards.get_mut(uid) {
                    card.in_conflict = false;
                }
            }
        }
        self.reconcile_effects();
    }

    // ----- resolution trace -----

    pub fn record_ability(&mut self, card: CardUid, title: impl Into<String>) {
        let title = title.into();
        log::info!("{} resolves", title);
        self.history.push_back(AbilityRecord { card, title });
    }

    // ----- manual mode -----

    pub fn set_manual_mode(&mut self, on: bool) {
        self.manual_mode = on;
    }

    /// Toggle a card in a player's selection set. Returns the new
    /// selected state.
    pub fn toggle_selection(&mut self, player: PlayerId, uid: CardUid) -> bool {
        let set = &mut self.selections[player];
        if set.remove(&uid) {
            false
        } else {
            set.insert(uid);
            true
        }
    }

    pub fn is_selected(&self, player: PlayerId, uid: CardUid) -> bool {
        self.selections[player].contains(&uid)
    }
}
