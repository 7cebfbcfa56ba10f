//! Monte Carlo planning over a learned model
//!
//! This is the rho-UCT search of MC-AIXI: every simulation walks a fresh
//! trajectory through the search tree, choosing actions with a
//! [`SelectionPolicy`] at decision nodes and letting the model sample the
//! environment's answer at chance nodes. Decision nodes reached for the first
//! time are valued by a [`PlayoutPolicy`] instead of being expanded. After each
//! simulation the model is restored to where the search started, so every
//! simulation sees the same model.

use std::time::Instant;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{
    config::SearchConfig,
    model::Model,
    policy::{BoundedUcbPolicy, PlayoutPolicy, RandomPlayout, SelectionPolicy},
    stats::SearchStatistics,
    tree::{NodeKind, SearchNode},
    utils::seeded_rng,
    AgentError, Result,
};

/// Monte Carlo tree search over a [`Model`]
///
/// # Example
///
/// ```
/// use ctw_uct::agent::Agent;
/// use ctw_uct::config::{AgentConfig, SearchConfig};
/// use ctw_uct::environment::DomainBounds;
/// use ctw_uct::environments::CoinFlip;
/// use ctw_uct::search::UctSearch;
///
/// let bounds = DomainBounds::of::<CoinFlip>();
/// let mut agent = Agent::new(bounds, AgentConfig::default().with_ct_depth(4).with_seed(1))?;
/// agent.model_update_percept(1, 0)?;
///
/// let mut search = UctSearch::new(SearchConfig::default().with_horizon(2).with_simulations(50).with_seed(3));
/// let action = search.search(&mut agent)?;
/// assert!(action <= 1);
/// println!("{}", search.get_statistics().summary());
/// # Ok::<(), ctw_uct::AgentError>(())
/// ```
pub struct UctSearch<M: Model> {
    config: SearchConfig,
    selection_policy: Box<dyn SelectionPolicy<M>>,
    playout_policy: Box<dyn PlayoutPolicy<M>>,
    statistics: SearchStatistics,
    root: Option<SearchNode<M::Action, M::Observation>>,
    rng: StdRng,
}

impl<M: Model> UctSearch<M> {
    /// Creates a search with the bounded UCB selection policy and random playouts
    pub fn new(config: SearchConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy<M>> =
            Box::new(BoundedUcbPolicy::new(config.exploration_constant));
        let playout_policy: Box<dyn PlayoutPolicy<M>> = Box::new(RandomPlayout::new());
        let rng = seeded_rng(config.seed);

        UctSearch {
            config,
            selection_policy,
            playout_policy,
            statistics: SearchStatistics::new(),
            root: None,
            rng,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<M> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the playout policy to use
    pub fn with_playout_policy<P: PlayoutPolicy<M> + 'static>(mut self, policy: P) -> Self {
        self.playout_policy = Box::new(policy);
        self
    }

    /// Runs the configured number of simulations and returns the best action
    ///
    /// The best action is the root child with the highest mean return, with ties
    /// broken uniformly at random. The model is left exactly as it was found.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NoValidActions`] if the model offers no actions,
    /// [`AgentError::InvalidConfiguration`] for an unusable configuration, and
    /// propagates any error the model reports while recording.
    pub fn search(&mut self, model: &mut M) -> Result<M::Action> {
        self.config.validate()?;
        self.statistics = SearchStatistics::new();

        if model.valid_actions().is_empty() {
            return Err(AgentError::NoValidActions);
        }

        let start_time = Instant::now();
        let mut root = SearchNode::decision();

        for i in 0..self.config.simulations {
            let checkpoint = model.checkpoint();
            let result = self.sample(&mut root, model, self.config.horizon, 0);
            model.restore(&checkpoint);

            let reward = result?;
            trace!("simulation {} returned {:.3}", i + 1, reward);
            self.statistics.record_return(reward);
        }

        self.statistics.elapsed = start_time.elapsed();
        self.statistics.tree_size = root.size();
        self.statistics.model_size = model.size();
        debug!("{}", self.statistics.summary());

        let best_action = self.select_best_action(&root, model);
        self.root = Some(root);
        Ok(best_action)
    }

    /// Runs one simulation through `node` and returns the reward it collected
    ///
    /// Choosing an action does not use up horizon; receiving a percept does.
    fn sample(
        &mut self,
        node: &mut SearchNode<M::Action, M::Observation>,
        model: &mut M,
        horizon: usize,
        depth: usize,
    ) -> Result<f64> {
        if horizon == 0 {
            return Ok(0.0);
        }

        let result = match node.kind() {
            NodeKind::Chance => {
                let (observation, reward) = model.sample_percept_and_record()?;
                let child = node.observation_child_or_insert(observation);
                reward + self.sample(child, model, horizon - 1, depth + 1)?
            }
            NodeKind::Decision if node.visits() == 0 => {
                self.statistics.max_depth = self.statistics.max_depth.max(depth);
                self.statistics.playouts += 1;
                self.playout_policy.playout(model, horizon)?
            }
            NodeKind::Decision => {
                let action = self
                    .selection_policy
                    .select_action(node, model, horizon, &mut self.rng)
                    .ok_or(AgentError::NoValidActions)?;
                model.record_action(action)?;

                let child = node.action_child_or_insert(action);
                self.sample(child, model, horizon, depth)?
            }
        };

        node.record(result);
        Ok(result)
    }

    /// Picks the root action with the highest mean, breaking ties at random
    fn select_best_action(
        &mut self,
        root: &SearchNode<M::Action, M::Observation>,
        model: &mut M,
    ) -> M::Action {
        let mut best_mean = f64::NEG_INFINITY;
        let mut best_actions = Vec::new();

        for action in model.valid_actions() {
            if let Some(child) = root.action_child(action) {
                if child.mean() > best_mean {
                    best_mean = child.mean();
                    best_actions.clear();
                    best_actions.push(*action);
                } else if child.mean() == best_mean {
                    best_actions.push(*action);
                }
            }
        }

        match best_actions.choose(&mut self.rng) {
            Some(action) => *action,
            None => {
                warn!(
                    "search expanded no actions after {} simulations, choosing at random",
                    self.statistics.simulations
                );
                model.random_action()
            }
        }
    }

    /// Returns the statistics of the last search
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the search tree built by the last search
    pub fn root(&self) -> Option<&SearchNode<M::Action, M::Observation>> {
        self.root.as_ref()
    }

    /// Returns a visualization of the last search tree
    pub fn visualize_tree(&self) -> String {
        self.root
            .as_ref()
            .map(SearchNode::visualize)
            .unwrap_or_default()
    }
}
