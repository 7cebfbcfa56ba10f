//! # ctw-uct
//!
//! A Monte Carlo approximation of AIXI: a Context Tree Weighting (CTW) model of
//! the agent's interaction history, combined with a UCT planner that uses that
//! model as a simulator of the environment.
//!
//! ## Features
//!
//! - Context tree over binary sequences with exact, incremental undo
//! - rho-UCT search over alternating decision and chance nodes
//! - Pluggable selection and playout policies
//! - Detailed search statistics and visualization
//! - Reference environments and an interaction loop
//!
//! ## Basic Usage
//!
//! ```
//! use ctw_uct::{interaction, Agent, AgentConfig, DomainBounds, InteractionConfig};
//! use ctw_uct::environments::CoinFlip;
//!
//! fn main() -> Result<(), ctw_uct::AgentError> {
//!     // The agent learns the bit widths and valid actions from the environment type
//!     let bounds = DomainBounds::of::<CoinFlip>();
//!     let config = AgentConfig::default()
//!         .with_ct_depth(8)
//!         .with_horizon(2)
//!         .with_simulations(20)
//!         .with_seed(42);
//!     let mut agent = Agent::new(bounds, config)?;
//!
//!     let mut environment = CoinFlip::new(Some(7));
//!     let summary = interaction::run(
//!         &mut agent,
//!         &mut environment,
//!         &InteractionConfig::default().with_terminate_age(10),
//!     )?;
//!
//!     println!("average reward after {} cycles: {}", summary.cycles, summary.average_reward);
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Every action, observation and reward is encoded as a fixed-width bit string
//! and fed, in order, to a [`ContextTree`]. The tree mixes all context models up
//! to its depth and so predicts the next bit of the interaction.
//!
//! To choose an action, [`UctSearch`] runs many simulations. Each one:
//!
//! 1. **Selects** actions at visited decision nodes with a bounded-reward UCB
//!    policy, trying every action once first.
//! 2. **Samples** percepts at chance nodes from the context tree and records
//!    them, exactly as if the environment had produced them.
//! 3. **Plays out** from decision nodes reached for the first time, taking
//!    random actions until the horizon is used up.
//! 4. **Restores** the model to where the search started.
//!
//! The action with the highest mean return at the root is taken.
//!
//! ## Examples
//!
//! ```bash
//! cargo run --example coin_flip
//! cargo run --example extended_tiger
//! ```

pub mod agent;
pub mod config;
pub mod context_tree;
pub mod environment;
pub mod environments;
pub mod interaction;
pub mod model;
pub mod policy;
pub mod search;
pub mod stats;
pub mod symbol;
pub mod tree;
pub mod utils;

pub use agent::{Agent, ModelUndo};
pub use config::{AgentConfig, InteractionConfig, SearchConfig};
pub use context_tree::{ContextNode, ContextTree};
pub use environment::{DomainBounds, Environment, Tagged};
pub use interaction::InteractionSummary;
pub use model::{Model, UpdatePhase};
pub use policy::{PlayoutPolicy, SelectionPolicy};
pub use search::UctSearch;
pub use stats::SearchStatistics;
pub use symbol::Symbol;
pub use tree::{NodeKind, SearchNode};

/// Error types for the agent and its search
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// There is no action to choose from
    #[error("No valid actions available")]
    NoValidActions,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A value does not fit in its bit width
    #[error("Value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u64, bits: usize },

    /// An action code the environment does not define
    #[error("Invalid action: {0}")]
    InvalidAction(u64),

    /// A raw value that is neither 0 nor 1
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(u8),
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
