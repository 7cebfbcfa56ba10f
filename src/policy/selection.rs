//! Action selection at decision nodes
//!
//! A selection policy picks which action to try next from a decision node that
//! has already been sampled at least once.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::{model::Model, tree::SearchNode, utils::exploration_term};

/// Trait for policies that choose the next action at a decision node
pub trait SelectionPolicy<M: Model> {
    /// Picks an action for `node` with `horizon` cycles left to plan
    ///
    /// Returns `None` only when the model has no valid actions.
    fn select_action(
        &self,
        node: &SearchNode<M::Action, M::Observation>,
        model: &M,
        horizon: usize,
        rng: &mut dyn RngCore,
    ) -> Option<M::Action>;
}

/// Upper confidence bound policy for rewards in a known interval
///
/// Every valid action is tried once, in random order, before any comparison is
/// made. After that the action with the highest
///
/// ```text
/// mean / (horizon * reward_range) + C * sqrt(ln(parent_visits) / child_visits)
/// ```
///
/// is chosen, where the first term is the child's mean return normalised into
/// `[0, 1]`. Ties go to the action that comes first in the model's valid-action
/// order. A zero reward range is treated as 1.
#[derive(Debug, Clone)]
pub struct BoundedUcbPolicy {
    /// Weight of the exploration bonus
    pub exploration_constant: f64,
}

impl BoundedUcbPolicy {
    /// Creates a new policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        BoundedUcbPolicy {
            exploration_constant,
        }
    }

    /// Priority of a child that has been sampled `child_visits` times
    pub fn priority(
        &self,
        child_mean: f64,
        child_visits: u64,
        parent_visits: u64,
        horizon: usize,
        reward_range: f64,
    ) -> f64 {
        let range = if reward_range > 0.0 { reward_range } else { 1.0 };
        let exploitation = child_mean / (horizon.max(1) as f64 * range);

        exploitation + exploration_term(parent_visits, child_visits, self.exploration_constant)
    }
}

impl Default for BoundedUcbPolicy {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl<M: Model> SelectionPolicy<M> for BoundedUcbPolicy {
    fn select_action(
        &self,
        node: &SearchNode<M::Action, M::Observation>,
        model: &M,
        horizon: usize,
        rng: &mut dyn RngCore,
    ) -> Option<M::Action> {
        let actions = model.valid_actions();

        let unexplored: Vec<M::Action> = actions
            .iter()
            .copied()
            .filter(|action| node.action_child(action).map_or(true, |c| c.visits() == 0))
            .collect();

        if !unexplored.is_empty() {
            return unexplored.choose(rng).copied();
        }

        let reward_range = model.reward_range();
        let mut best_action = None;
        let mut best_priority = f64::NEG_INFINITY;

        for action in actions {
            if let Some(child) = node.action_child(action) {
                let priority = self.priority(
                    child.mean(),
                    child.visits(),
                    node.visits(),
                    horizon,
                    reward_range,
                );

                if best_action.is_none() || priority > best_priority {
                    best_action = Some(*action);
                    best_priority = priority;
                }
            }
        }

        best_action
    }
}
