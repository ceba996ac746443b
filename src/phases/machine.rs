//! The round structure and the top-level game driver.
//!
//! A round runs its phases in a fixed order; each phase expands to a
//! short list of steps fed to the queue. `Game` glues the state and
//! the queue together behind a prompt-and-decision loop: `advance`
//! runs until someone must decide, `resume` feeds the decision back.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::game::GameState;

use super::queue::{QueueStatus, StepQueue};
use super::step::{Decision, Prompt, Step};

/// The phases of a round, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseName {
    Dynasty,
    Draw,
    Conflict,
    Fate,
    Regroup,
}

pub const ROUND_ORDER: [PhaseName; 5] = [
    PhaseName::Dynasty,
    PhaseName::Draw,
    PhaseName::Conflict,
    PhaseName::Fate,
    PhaseName::Regroup,
];

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PhaseName::Dynasty => "dynasty",
            PhaseName::Draw => "draw",
            PhaseName::Conflict => "conflict",
            PhaseName::Fate => "fate",
            PhaseName::Regroup => "regroup",
        };
        write!(f, "{name}")
    }
}

impl PhaseName {
    /// The steps this phase expands to.
    pub fn steps(self, first_player: PlayerId, player_count: usize) -> Vec<Step> {
        let window = Step::ActionWindow {
            current: first_player,
            passed: vec![false; player_count],
        };
        match self {
            PhaseName::Dynasty => vec![
                Step::BeginPhase(self),
                Step::RevealProvinceCards,
                Step::CollectFate,
                window,
                Step::EndPhase(self),
            ],
            PhaseName::Draw => vec![
                Step::BeginPhase(self),
                Step::DrawCards { count: 1 },
                Step::EndPhase(self),
            ],
            PhaseName::Conflict => vec![Step::BeginPhase(self), window, Step::EndPhase(self)],
            PhaseName::Fate => vec![
                Step::BeginPhase(self),
                Step::DiscardFateFromCharacters,
                Step::EndPhase(self),
            ],
            PhaseName::Regroup => vec![
                Step::BeginPhase(self),
                Step::ReadyCards,
                Step::EndPhase(self),
                Step::EndRound,
            ],
        }
    }
}

/// Where the engine stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    /// A player must answer this prompt.
    AwaitingInput(Prompt),
    /// The round finished; `advance` starts the next one.
    RoundComplete,
}

/// A running game: state, queue and the phase cursor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub state: GameState,
    pub queue: StepQueue,
    phase_index: usize,
}

impl Game {
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self {
            state: GameState::new(player_count, seed),
            queue: StepQueue::new(),
            phase_index: 0,
        }
    }

    /// Run until a prompt or the end of the round.
    pub fn advance(&mut self) -> EngineStatus {
        loop {
            match self.queue.run(&mut self.state) {
                QueueStatus::AwaitingInput(prompt) => return EngineStatus::AwaitingInput(prompt),
                QueueStatus::Exhausted => {
                    if self.phase_index >= ROUND_ORDER.len() {
                        self.phase_index = 0;
                        return EngineStatus::RoundComplete;
                    }
                    let phase = ROUND_ORDER[self.phase_index];
                    self.phase_index += 1;
                    for step in phase.steps(self.state.first_player, self.state.player_count) {
                        self.queue.push_back(step);
                    }
                }
            }
        }
    }

    /// Answer the outstanding prompt and keep running.
    pub fn resume(&mut self, decision: Decision) -> EngineStatus {
        match self.queue.resume(&mut self.state, decision) {
            QueueStatus::AwaitingInput(prompt) => EngineStatus::AwaitingInput(prompt),
            QueueStatus::Exhausted => self.advance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_order() {
        assert_eq!(ROUND_ORDER[0], PhaseName::Dynasty);
        assert_eq!(ROUND_ORDER[4], PhaseName::Regroup);
    }

    #[test]
    fn test_round_runs_to_completion_with_passes() {
        let mut game = Game::new(2, 42);
        let mut status = game.advance();

        let mut guard = 0;
        while let EngineStatus::AwaitingInput(_) = status {
            status = game.resume(Decision::Pass);
            guard += 1;
            assert!(guard < 16, "round did not terminate");
        }
        assert_eq!(status, EngineStatus::RoundComplete);
        assert_eq!(game.state.round_number, 2);
    }

    #[test]
    fn test_phase_expansion() {
        let steps = PhaseName::Dynasty.steps(PlayerId::new(0), 2);
        assert!(matches!(steps[0], Step::BeginPhase(PhaseName::Dynasty)));
        assert!(matches!(steps.last(), Some(Step::EndPhase(PhaseName::Dynasty))));
    }
}
