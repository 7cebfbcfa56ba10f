//! Configuration for the agent, its search, and the interaction loop
//!
//! Every configuration is a plain value with documented defaults and builder
//! methods. Nothing is read from global state.

use crate::{AgentError, Result};

/// Configuration for the Monte Carlo search
///
/// # Example
///
/// ```
/// use ctw_uct::config::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_horizon(4)
///     .with_simulations(500)
///     .with_exploration_constant(1.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of action/percept cycles each simulation looks ahead
    pub horizon: usize,

    /// Number of simulations run before an action is chosen
    pub simulations: usize,

    /// Weight of the exploration bonus in the UCB priority
    pub exploration_constant: f64,

    /// Seed for the search's random choices; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            horizon: 5,
            simulations: 200,
            exploration_constant: 2.0,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Sets the planning horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the number of simulations per search
    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration describes a search that can run
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(AgentError::InvalidConfiguration(
                "horizon must be at least 1".to_string(),
            ));
        }
        if self.simulations == 0 {
            return Err(AgentError::InvalidConfiguration(
                "simulations must be at least 1".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(AgentError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}

/// Configuration for an [`Agent`](crate::agent::Agent)
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Depth of the context tree, in symbols
    pub ct_depth: usize,

    /// Number of cycles to learn for; 0 learns forever
    pub learning_period: u64,

    /// How many times rejection sampling of an action is retried before the
    /// most probable valid action is used instead
    pub action_retry_limit: usize,

    /// Settings for the search run on every call to `Agent::search`
    pub search: SearchConfig,

    /// Seed for the agent's own sampling; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            ct_depth: 30,
            learning_period: 0,
            action_retry_limit: 5,
            search: SearchConfig::default(),
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Sets the context tree depth
    pub fn with_ct_depth(mut self, depth: usize) -> Self {
        self.ct_depth = depth;
        self
    }

    /// Sets the planning horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.search.horizon = horizon;
        self
    }

    /// Sets the number of simulations per search
    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.search.simulations = simulations;
        self
    }

    /// Sets the exploration constant of the search
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.search.exploration_constant = constant;
        self
    }

    /// Sets the learning period
    pub fn with_learning_period(mut self, cycles: u64) -> Self {
        self.learning_period = cycles;
        self
    }

    /// Sets the action rejection sampling retry limit
    pub fn with_action_retry_limit(mut self, retries: usize) -> Self {
        self.action_retry_limit = retries;
        self
    }

    /// Replaces the whole search configuration
    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration describes an agent that can run
    pub fn validate(&self) -> Result<()> {
        self.search.validate()
    }
}

/// Configuration for the agent/environment interaction loop
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Probability of taking a random action instead of searching
    pub exploration: f64,

    /// Factor applied to the exploration rate after every cycle
    pub explore_decay: f64,

    /// Stop once the agent has acted this many times; `None` runs until the
    /// environment finishes
    pub terminate_age: Option<u64>,

    /// Seed for exploration decisions; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            exploration: 0.0,
            explore_decay: 1.0,
            terminate_age: None,
            seed: None,
        }
    }
}

impl InteractionConfig {
    /// Sets the initial exploration rate
    pub fn with_exploration(mut self, rate: f64) -> Self {
        self.exploration = rate;
        self
    }

    /// Sets the exploration decay factor
    pub fn with_explore_decay(mut self, decay: f64) -> Self {
        self.explore_decay = decay;
        self
    }

    /// Sets the age at which the loop stops
    pub fn with_terminate_age(mut self, age: u64) -> Self {
        self.terminate_age = Some(age);
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the rates are probabilities
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.exploration) {
            return Err(AgentError::InvalidConfiguration(format!(
                "exploration rate must lie in [0, 1], got {}",
                self.exploration
            )));
        }
        if !(0.0..=1.0).contains(&self.explore_decay) {
            return Err(AgentError::InvalidConfiguration(format!(
                "explore decay must lie in [0, 1], got {}",
                self.explore_decay
            )));
        }
        Ok(())
    }
}
