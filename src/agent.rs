//! The MC-AIXI-CTW agent
//!
//! An [`Agent`] learns a single context tree over the interleaved stream of its
//! own actions and the percepts it receives. Actions, observations and rewards
//! are integer codes, turned into fixed-width bit strings with the widths in
//! the agent's [`DomainBounds`]. A percept is written reward bits first, then
//! observation bits.
//!
//! The agent is also the [`Model`] its planner searches over: the search records
//! hypothetical actions and sampled percepts into the agent, then rolls it back
//! with [`Agent::model_revert`].

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::{
    config::AgentConfig,
    context_tree::ContextTree,
    environment::DomainBounds,
    model::{Model, UpdatePhase},
    search::UctSearch,
    stats::SearchStatistics,
    symbol::{decode, encode, Symbol},
    utils::seeded_rng,
    AgentError, Result,
};

/// Everything needed to roll an [`Agent`] back to an earlier point
#[derive(Debug, Clone, PartialEq)]
pub struct ModelUndo {
    /// Actions recorded at the checkpoint
    pub age: u64,

    /// Reward collected at the checkpoint
    pub total_reward: f64,

    /// Symbols in the history at the checkpoint; later ones are reverted
    pub history_size: usize,

    /// Phase the agent was in
    pub last_update: UpdatePhase,
}

/// A Monte Carlo AIXI agent backed by a context tree
pub struct Agent {
    bounds: DomainBounds,
    config: AgentConfig,
    context_tree: ContextTree,
    age: u64,
    total_reward: f64,
    last_update: UpdatePhase,
    rng: StdRng,
    last_search: Option<SearchStatistics>,
}

impl Agent {
    /// Creates an agent for an environment with the given bounds
    ///
    /// # Errors
    ///
    /// Returns an error if either the bounds or the configuration are invalid.
    pub fn new(bounds: DomainBounds, config: AgentConfig) -> Result<Self> {
        bounds.validate()?;
        config.validate()?;

        debug!(
            "creating agent: {} action bits, {} percept bits, context depth {}",
            bounds.action_bits,
            bounds.percept_bits(),
            config.ct_depth
        );

        Ok(Agent {
            context_tree: ContextTree::new(config.ct_depth),
            rng: seeded_rng(config.seed),
            bounds,
            config,
            age: 0,
            total_reward: 0.0,
            last_update: UpdatePhase::Action,
            last_search: None,
        })
    }

    /// Number of actions recorded so far
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Sum of all rewards recorded so far
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Mean reward per action, or 0 before the first action
    pub fn average_reward(&self) -> f64 {
        if self.age == 0 {
            return 0.0;
        }
        self.total_reward / self.age as f64
    }

    /// What was recorded last
    pub fn last_update(&self) -> UpdatePhase {
        self.last_update
    }

    /// The learned model
    pub fn context_tree(&self) -> &ContextTree {
        &self.context_tree
    }

    /// Bit widths, valid actions and reward bounds of the environment
    pub fn bounds(&self) -> &DomainBounds {
        &self.bounds
    }

    /// The configuration the agent was built with
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Statistics of the most recent call to [`search`](Self::search)
    pub fn last_search_statistics(&self) -> Option<&SearchStatistics> {
        self.last_search.as_ref()
    }

    /// Number of nodes in the context tree
    pub fn model_size(&self) -> usize {
        self.context_tree.size()
    }

    /// Number of symbols in the history
    pub fn history_size(&self) -> usize {
        self.context_tree.history_len()
    }

    /// Encodes an action code into `action_bits` symbols
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ValueOutOfRange`] if the code does not fit.
    pub fn encode_action(&self, action: u64) -> Result<Vec<Symbol>> {
        encode(action, self.bounds.action_bits)
    }

    /// Encodes a percept as reward bits followed by observation bits
    pub fn encode_percept(&self, observation: u64, reward: u64) -> Result<Vec<Symbol>> {
        let mut symbols = encode(reward, self.bounds.reward_bits)?;
        symbols.extend(encode(observation, self.bounds.observation_bits)?);
        Ok(symbols)
    }

    /// Decodes the first `action_bits` symbols into an action code
    pub fn decode_action(&self, symbols: &[Symbol]) -> u64 {
        decode(&symbols[..self.bounds.action_bits.min(symbols.len())])
    }

    /// Splits a percept into `(observation, reward)`
    pub fn decode_percept(&self, symbols: &[Symbol]) -> (u64, u64) {
        let split = self.bounds.reward_bits.min(symbols.len());
        let (reward, observation) = symbols.split_at(split);
        (decode(observation), decode(reward))
    }

    /// Records a percept received from the environment
    ///
    /// Once the learning period is over the percept only extends the history.
    ///
    /// # Panics
    ///
    /// Panics unless the last update was an action.
    pub fn model_update_percept(&mut self, observation: u64, reward: u64) -> Result<()> {
        assert_eq!(
            self.last_update,
            UpdatePhase::Action,
            "a percept can only be recorded after an action"
        );

        let symbols = self.encode_percept(observation, reward)?;

        let period = self.config.learning_period;
        if period > 0 && self.age > period {
            self.context_tree.update_history(&symbols);
        } else {
            self.context_tree.update(&symbols);
        }

        self.total_reward += reward as f64;
        self.last_update = UpdatePhase::Percept;
        Ok(())
    }

    /// Records an action taken by the agent
    ///
    /// # Panics
    ///
    /// Panics if the action is not valid or the last update was not a percept.
    pub fn model_update_action(&mut self, action: u64) -> Result<()> {
        assert!(
            self.bounds.is_valid_action(action),
            "action {} is not a valid action",
            action
        );
        assert_eq!(
            self.last_update,
            UpdatePhase::Percept,
            "an action can only be recorded after a percept"
        );

        let symbols = self.encode_action(action)?;
        self.context_tree.update(&symbols);

        self.age += 1;
        self.last_update = UpdatePhase::Action;
        Ok(())
    }

    /// Samples `(observation, reward)` from the model without changing it
    ///
    /// # Panics
    ///
    /// Panics unless the last update was an action.
    pub fn generate_percept(&mut self) -> (u64, u64) {
        assert_eq!(
            self.last_update,
            UpdatePhase::Action,
            "a percept can only be generated after an action"
        );

        let symbols = self
            .context_tree
            .generate_random_symbols(self.bounds.percept_bits(), &mut self.rng);
        self.decode_percept(&symbols)
    }

    /// Samples `(observation, reward)` from the model and records it
    pub fn generate_percept_and_update(&mut self) -> Result<(u64, u64)> {
        let (observation, reward) = self.generate_percept();
        self.model_update_percept(observation, reward)?;
        Ok((observation, reward))
    }

    /// Samples an action from the model's prediction of the agent's own behaviour
    ///
    /// Draws are rejected until one decodes to a valid action. After
    /// `action_retry_limit` rejected retries the valid action with the highest
    /// predicted probability is returned instead, the first one on ties.
    ///
    /// # Panics
    ///
    /// Panics unless the last update was a percept.
    pub fn generate_action(&mut self) -> Result<u64> {
        assert_eq!(
            self.last_update,
            UpdatePhase::Percept,
            "an action can only be generated after a percept"
        );

        for _ in 0..=self.config.action_retry_limit {
            let symbols = self
                .context_tree
                .generate_random_symbols(self.bounds.action_bits, &mut self.rng);
            let action = self.decode_action(&symbols);
            if self.bounds.is_valid_action(action) {
                return Ok(action);
            }
        }

        warn!(
            "no valid action sampled in {} draws, using the most probable one",
            self.config.action_retry_limit + 1
        );

        let mut best: Option<(u64, f64)> = None;
        for action in self.bounds.valid_actions.clone() {
            let probability = self.predicted_action_probability(action)?;
            if best.map_or(true, |(_, p)| probability > p) {
                best = Some((action, probability));
            }
        }

        best.map(|(action, _)| action)
            .ok_or(AgentError::NoValidActions)
    }

    /// Draws a valid action uniformly at random
    pub fn generate_random_action(&mut self) -> u64 {
        let index = self.rng.gen_range(0..self.bounds.valid_actions.len());
        self.bounds.valid_actions[index]
    }

    /// Probability the model assigns to `action` coming next
    pub fn predicted_action_probability(&mut self, action: u64) -> Result<f64> {
        let symbols = self.encode_action(action)?;
        Ok(self.context_tree.predict(&symbols))
    }

    /// Probability the model assigns to the percept coming next
    pub fn percept_probability(&mut self, observation: u64, reward: u64) -> Result<f64> {
        let symbols = self.encode_percept(observation, reward)?;
        Ok(self.context_tree.predict(&symbols))
    }

    /// Captures the current state for [`model_revert`](Self::model_revert)
    pub fn checkpoint(&self) -> ModelUndo {
        ModelUndo {
            age: self.age,
            total_reward: self.total_reward,
            history_size: self.history_size(),
            last_update: self.last_update,
        }
    }

    /// Rolls back every update made since `undo` was captured
    ///
    /// # Panics
    ///
    /// Panics if the history is shorter than it was at the checkpoint.
    pub fn model_revert(&mut self, undo: &ModelUndo) {
        assert!(
            self.history_size() >= undo.history_size,
            "history shrank below the checkpoint: {} < {}",
            self.history_size(),
            undo.history_size
        );

        self.context_tree
            .revert(self.history_size() - undo.history_size);
        self.age = undo.age;
        self.total_reward = undo.total_reward;
        self.last_update = undo.last_update;
    }

    /// Forgets everything: clears the context tree and the bookkeeping
    pub fn reset(&mut self) {
        self.context_tree.clear();
        self.age = 0;
        self.total_reward = 0.0;
        self.last_update = UpdatePhase::Action;
        self.last_search = None;
    }

    /// Plans the next action with a fresh search over the agent's model
    ///
    /// Unless the search configuration fixes a seed, each search is seeded from
    /// the agent's own generator.
    pub fn search(&mut self) -> Result<u64> {
        let mut config = self.config.search.clone();
        if config.seed.is_none() {
            config.seed = Some(self.rng.gen());
        }

        let mut search = UctSearch::new(config);
        let action = search.search(self)?;
        self.last_search = Some(search.get_statistics().clone());
        Ok(action)
    }
}

impl Model for Agent {
    type Action = u64;
    type Observation = u64;
    type Checkpoint = ModelUndo;

    fn valid_actions(&self) -> &[u64] {
        &self.bounds.valid_actions
    }

    fn reward_range(&self) -> f64 {
        self.bounds.reward_range()
    }

    fn record_action(&mut self, action: u64) -> Result<()> {
        self.model_update_action(action)
    }

    fn sample_percept_and_record(&mut self) -> Result<(u64, f64)> {
        let (observation, reward) = self.generate_percept_and_update()?;
        Ok((observation, reward as f64))
    }

    fn random_action(&mut self) -> u64 {
        self.generate_random_action()
    }

    fn checkpoint(&self) -> ModelUndo {
        Agent::checkpoint(self)
    }

    fn restore(&mut self, checkpoint: &ModelUndo) {
        self.model_revert(checkpoint)
    }

    fn size(&self) -> usize {
        self.model_size()
    }
}
