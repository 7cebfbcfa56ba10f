//! Playout policies for the search
//!
//! A playout estimates the value of a decision node that has never been
//! sampled by simulating the remaining horizon with a fixed default policy.

use crate::{model::Model, Result};

/// Trait for policies that simulate the remaining horizon
pub trait PlayoutPolicy<M: Model> {
    /// Simulates `horizon` action/percept cycles through `model` and returns the
    /// reward collected along the way
    ///
    /// Every cycle is recorded into the model; the caller is responsible for
    /// restoring it afterwards.
    fn playout(&self, model: &mut M, horizon: usize) -> Result<f64>;
}

/// Uniform random playout
///
/// Picks every action uniformly from the model's valid actions and lets the
/// model answer with a sampled percept.
#[derive(Debug, Clone)]
pub struct RandomPlayout;

impl RandomPlayout {
    /// Creates a new random playout policy
    pub fn new() -> Self {
        RandomPlayout
    }
}

impl Default for RandomPlayout {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> PlayoutPolicy<M> for RandomPlayout {
    fn playout(&self, model: &mut M, horizon: usize) -> Result<f64> {
        let mut total_reward = 0.0;

        for _ in 0..horizon {
            let action = model.random_action();
            model.record_action(action)?;

            let (_, reward) = model.sample_percept_and_record()?;
            total_reward += reward;
        }

        Ok(total_reward)
    }
}
