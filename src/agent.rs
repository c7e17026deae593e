use crate::{
    env::GridWorld,
    episode::Decision,
    grid::{Action, Pos},
};

/// A single transition observed by a learner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp<S, A> {
    /// The state before taking the action
    pub state: S,
    /// The action taken in `state`
    pub action: A,
    /// The reward received for arriving in `next_state`
    pub reward: f32,
    /// The state after the action is taken
    pub next_state: S,
}

/// Something that moves through a [`GridWorld`] and learns from it one decision at a time
///
/// A learner owns its position exclusively. Driving the same learner from two places at once is ruled out
/// by `&mut self`.
pub trait Learner {
    /// The world this learner moves in
    fn world(&self) -> &GridWorld;

    /// Pick an action for `state` according to the current policy
    fn choose(&mut self, state: Pos) -> Action;

    /// Take one action from the current position, learn from the outcome and report it
    fn step(&mut self) -> Decision;

    /// Place the learner on `spawn` at the start of an episode
    ///
    /// Learned values are kept.
    fn reset(&mut self, spawn: Pos);

    /// Called once an episode has reached the goal
    fn finish_episode(&mut self);

    fn position(&self) -> Pos;

    fn spawn(&self) -> Pos;

    /// Whether the learner is standing on the goal
    fn is_done(&self) -> bool {
        self.world().grid().is_goal(self.position())
    }
}
