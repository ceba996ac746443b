//! The step queue.
//!
//! Steps run front to back. A step that needs a player decision is
//! parked in `suspended` and the queue hands a prompt out; `resume`
//! re-executes the parked step with the decision. Steps queued during
//! execution (trigger windows, action follow-ups) are spliced in at
//! the front, so they resolve before anything already pending.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::GameState;

use super::step::{Decision, Prompt, Step, StepOutcome};

/// Why the queue stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueStatus {
    /// Nothing left to do.
    Exhausted,
    /// A step is parked waiting for this prompt's answer.
    AwaitingInput(Prompt),
}

/// FIFO of pending steps plus the parked suspended step, if any.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StepQueue {
    queue: VecDeque<Step>,
    suspended: Option<Step>,
}

impl StepQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, step: Step) {
        self.queue.push_back(step);
    }

    /// Splice steps in at the front, preserving their order.
    pub fn insert_front(&mut self, steps: Vec<Step>) {
        for step in steps.into_iter().rev() {
            self.queue.push_front(step);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.suspended.is_none()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Run until the queue empties or a step suspends.
    pub fn run(&mut self, state: &mut GameState) -> QueueStatus {
        while let Some(mut step) = self.queue.pop_front() {
            match step.execute(state, None) {
                StepOutcome::Waiting(prompt) => {
                    self.suspended = Some(step);
                    return QueueStatus::AwaitingInput(prompt);
                }
                StepOutcome::Complete => {
                    self.settle(state);
                }
            }
        }
        QueueStatus::Exhausted
    }

    /// Feed a decision to the suspended step and keep running.
    pub fn resume(&mut self, state: &mut GameState, decision: Decision) -> QueueStatus {
        if let Some(mut step) = self.suspended.take() {
            match step.execute(state, Some(decision)) {
                StepOutcome::Waiting(prompt) => {
                    self.suspended = Some(step);
                    return QueueStatus::AwaitingInput(prompt);
                }
                StepOutcome::Complete => {
                    self.settle(state);
                }
            }
        }
        self.run(state)
    }

    /// After a step completes: splice in whatever it queued, then let
    /// persistent effects settle before the next step observes state.
    fn settle(&mut self, state: &mut GameState) {
        let pending = state.take_pending_steps();
        self.insert_front(pending);
        state.reconcile_effects();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::phases::PhaseName;
    use crate::phases::step::PromptKind;

    #[test]
    fn test_run_exhausts_plain_steps() {
        let mut state = GameState::new(2, 1);
        let mut queue = StepQueue::new();
        queue.push_back(Step::BeginPhase(PhaseName::Draw));
        queue.push_back(Step::EndPhase(PhaseName::Draw));

        assert_eq!(queue.run(&mut state), QueueStatus::Exhausted);
        assert!(queue.is_empty());
        assert_eq!(state.current_phase, None);
    }

    #[test]
    fn test_suspension_and_resume() {
        let mut state = GameState::new(2, 1);
        let mut queue = StepQueue::new();
        queue.push_back(Step::ActionWindow {
            current: PlayerId::new(0),
            passed: vec![false, false],
        });
        queue.push_back(Step::EndRound);

        let status = queue.run(&mut state);
        assert!(matches!(
            status,
            QueueStatus::AwaitingInput(Prompt { kind: PromptKind::ActionOrPass, .. })
        ));
        assert!(queue.is_suspended());
        // the step behind the window has not run
        assert_eq!(state.round_number, 1);

        queue.resume(&mut state, Decision::Pass);
        let status = queue.resume(&mut state, Decision::Pass);
        assert_eq!(status, QueueStatus::Exhausted);
        assert_eq!(state.round_number, 2);
    }

    #[test]
    fn test_insert_front_preserves_order() {
        let mut queue = StepQueue::new();
        queue.push_back(Step::EndRound);
        queue.insert_front(vec![
            Step::BeginPhase(PhaseName::Fate),
            Step::EndPhase(PhaseName::Fate),
        ]);

        let steps: Vec<&Step> = queue.queue.iter().collect();
        assert!(matches!(steps[0], Step::BeginPhase(PhaseName::Fate)));
        assert!(matches!(steps[1], Step::EndPhase(PhaseName::Fate)));
        assert!(matches!(steps[2], Step::EndRound));
    }
}
