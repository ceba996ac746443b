//! Phase machine and suspension tests.
//!
//! A round is a fixed sequence of phases, each expanding into steps.
//! The queue suspends mid-step on player prompts, and a suspended game
//! serializes and resumes without losing its place.

use rust_lcg::abilities::ActionProps;
use rust_lcg::cards::{CardData, CardType};
use rust_lcg::core::{CardUid, Location, PlayerId};
use rust_lcg::phases::{Decision, EngineStatus, Game, PhaseName, PromptKind, BASE_FATE_INCOME};
use rust_lcg::GameAction;

fn pass_until_round_ends(game: &mut Game) -> usize {
    let mut prompts = 0;
    let mut status = game.advance();
    while let EngineStatus::AwaitingInput(_) = status {
        prompts += 1;
        assert!(prompts < 32, "round did not terminate");
        status = game.resume(Decision::Pass);
    }
    prompts
}

fn add_ready_character(game: &mut Game, owner: u8) -> CardUid {
    let uid = game
        .state
        .add_card(
            PlayerId::new(owner),
            CardData::new("eager-scout", "Eager Scout", CardType::Character).with_skills(2, 1),
            |setup| {
                setup.action(
                    ActionProps::new("Rally", GameAction::GainHonor { amount: 1 }).with_limit(1),
                );
            },
        )
        .unwrap();
    game.state.move_card(uid, Location::PlayArea);
    game.state.take_pending_steps();
    uid
}

#[test]
fn test_round_of_passes_completes() {
    let mut game = Game::new(2, 21);
    let prompts = pass_until_round_ends(&mut game);

    // two action windows (dynasty, conflict) of two passes each
    assert_eq!(prompts, 4);
    assert_eq!(game.state.round_number, 2);
    assert_eq!(game.state.first_player, PlayerId::new(1));
    assert_eq!(game.state.current_phase, None);
}

#[test]
fn test_first_prompt_is_dynasty_action_window() {
    let mut game = Game::new(2, 21);
    let status = game.advance();

    match status {
        EngineStatus::AwaitingInput(prompt) => {
            assert_eq!(prompt.player, PlayerId::new(0));
            assert_eq!(prompt.kind, PromptKind::ActionOrPass);
            assert_eq!(game.state.current_phase, Some(PhaseName::Dynasty));
        }
        EngineStatus::RoundComplete => panic!("expected a prompt"),
    }
}

#[test]
fn test_dynasty_pass_is_recorded() {
    let mut game = Game::new(2, 21);
    game.advance();
    game.resume(Decision::Pass);

    assert!(game.state.players[PlayerId::new(0)].passed_dynasty);
    assert!(!game.state.players[PlayerId::new(1)].passed_dynasty);
}

#[test]
fn test_fate_income_collected() {
    let mut game = Game::new(2, 21);
    pass_until_round_ends(&mut game);

    for id in [PlayerId::new(0), PlayerId::new(1)] {
        assert_eq!(game.state.players[id].fate, BASE_FATE_INCOME);
    }
}

#[test]
fn test_taking_an_action_mid_window() {
    let mut game = Game::new(2, 21);
    let uid = add_ready_character(&mut game, 0);

    game.advance();
    let status = game.resume(Decision::TakeAction { card: uid, action: 0 });

    // action resolved, then priority moved to the opponent
    assert_eq!(game.state.players[PlayerId::new(0)].honor, 1);
    match status {
        EngineStatus::AwaitingInput(prompt) => assert_eq!(prompt.player, PlayerId::new(1)),
        EngineStatus::RoundComplete => panic!("window should still be open"),
    }

    // the spent limit makes a second declaration invalid; the window
    // re-prompts the same player
    game.resume(Decision::Pass);
    let status = game.resume(Decision::TakeAction { card: uid, action: 0 });
    match status {
        EngineStatus::AwaitingInput(prompt) => assert_eq!(prompt.player, PlayerId::new(0)),
        EngineStatus::RoundComplete => panic!("invalid action must not close the window"),
    }
}

#[test]
fn test_dynasty_phase_reveals_province_cards() {
    let mut game = Game::new(2, 21);
    let uid = game
        .state
        .add_card(
            PlayerId::new(0),
            CardData::new("aspiring-challenger", "Aspiring Challenger", CardType::Character)
                .with_skills(2, 2),
            |_| {},
        )
        .unwrap();
    game.state.move_card(uid, Location::ProvinceOne);
    game.state.take_pending_steps();
    assert!(game.state.card(uid).unwrap().facedown);

    game.advance();

    assert!(!game.state.card(uid).unwrap().facedown);
}

#[test]
fn test_character_without_fate_leaves_in_fate_phase() {
    let mut game = Game::new(2, 21);
    let broke = add_ready_character(&mut game, 0);
    let funded = add_ready_character(&mut game, 1);
    game.state.card_mut(funded).unwrap().add_token("fate", 1);

    pass_until_round_ends(&mut game);

    assert_eq!(game.state.card(broke).unwrap().zone, Location::DynastyDiscard);
    assert_eq!(game.state.card(funded).unwrap().zone, Location::PlayArea);
    assert!(!game.state.card(funded).unwrap().has_token("fate"));
}

#[test]
fn test_regroup_readies_bowed_characters() {
    let mut game = Game::new(2, 21);
    let uid = add_ready_character(&mut game, 0);
    game.state.card_mut(uid).unwrap().add_token("fate", 1);
    game.state.card_mut(uid).unwrap().bowed = true;

    pass_until_round_ends(&mut game);

    assert!(!game.state.card(uid).unwrap().bowed);
}

#[test]
fn test_suspended_game_serializes_and_resumes() {
    let mut game = Game::new(2, 21);
    add_ready_character(&mut game, 0);
    game.advance();
    game.resume(Decision::Pass);

    // snapshot mid-window, waiting on player 1
    let bytes = bincode::serialize(&game).unwrap();
    let mut restored: Game = bincode::deserialize(&bytes).unwrap();

    let prompts_original = pass_until_round_ends(&mut game);
    let prompts_restored = pass_until_round_ends(&mut restored);
    assert_eq!(prompts_original, prompts_restored);

    let end_original = bincode::serialize(&game.state).unwrap();
    let end_restored = bincode::serialize(&restored.state).unwrap();
    assert_eq!(end_original, end_restored);
}

#[test]
fn test_identical_seeds_and_decisions_replay_identically() {
    let run = || {
        let mut game = Game::new(2, 99);
        let uid = add_ready_character(&mut game, 0);
        game.state.shuffle_dynasty_deck(PlayerId::new(0));
        game.advance();
        game.resume(Decision::TakeAction { card: uid, action: 0 });
        pass_until_round_ends(&mut game);
        bincode::serialize(&game.state).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_second_round_reopens_action_windows() {
    let mut game = Game::new(2, 21);
    let uid = add_ready_character(&mut game, 0);
    game.state.card_mut(uid).unwrap().add_token("fate", 2);

    pass_until_round_ends(&mut game);
    assert_eq!(game.state.round_number, 2);

    // limits reset at round end, so the action is declarable again
    let status = game.advance();
    match status {
        EngineStatus::AwaitingInput(prompt) => {
            // new first player leads the new dynasty window
            assert_eq!(prompt.player, PlayerId::new(1));
        }
        EngineStatus::RoundComplete => panic!("expected a new round"),
    }
    game.resume(Decision::Pass);
    game.resume(Decision::TakeAction { card: uid, action: 0 });
    assert_eq!(game.state.players[PlayerId::new(0)].honor, 1);
}
