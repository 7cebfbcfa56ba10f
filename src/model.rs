//! The interface the planner uses to talk to a learned model.
//!
//! [`UctSearch`](crate::search::UctSearch) never looks inside the model. It only
//! records actions, asks for sampled percepts, and rolls the model back between
//! simulations. [`Agent`](crate::agent::Agent) is the implementation backed by a
//! context tree; tests plug in small hand-written models.

use std::fmt::Debug;
use std::hash::Hash;

use crate::Result;

/// What the model recorded last
///
/// Actions and percepts strictly alternate. After an `Action` the model expects
/// a percept and after a `Percept` it expects an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    /// An action was recorded; a percept comes next
    Action,
    /// A percept was recorded; an action comes next
    Percept,
}

/// A generative model of the environment that can be rolled back
pub trait Model {
    /// The agent's actions
    type Action: Copy + Eq + Hash + Debug;

    /// The observation part of a percept
    type Observation: Copy + Eq + Hash + Debug;

    /// Everything needed to restore the model to an earlier point
    type Checkpoint;

    /// All actions the agent may take, in a fixed order
    fn valid_actions(&self) -> &[Self::Action];

    /// Difference between the largest and smallest single-step reward
    fn reward_range(&self) -> f64;

    /// Permanently records an action
    ///
    /// Implementations panic if the last update was not a percept.
    fn record_action(&mut self, action: Self::Action) -> Result<()>;

    /// Samples a percept from the model and permanently records it
    ///
    /// Returns the observation and its reward. Implementations panic if the
    /// last update was not an action.
    fn sample_percept_and_record(&mut self) -> Result<(Self::Observation, f64)>;

    /// Draws an action uniformly from [`valid_actions`](Self::valid_actions)
    fn random_action(&mut self) -> Self::Action;

    /// Captures the current state
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Rolls back every update made since `checkpoint` was taken
    fn restore(&mut self, checkpoint: &Self::Checkpoint);

    /// Size of the model, for statistics only
    fn size(&self) -> usize {
        0
    }
}
