//! The agent/environment interaction loop
//!
//! Each cycle hands the environment's current percept to the agent, picks an
//! action (a random one while exploring, otherwise the result of a search),
//! performs it and records it. Exploration stops for good once the agent's
//! learning period is over.

use std::time::Instant;

use log::info;
use rand::Rng;

use crate::{
    agent::Agent,
    config::InteractionConfig,
    environment::{DomainBounds, Environment, Tagged},
    utils::seeded_rng,
    AgentError, Result,
};

/// What happened during a run of [`run`]
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSummary {
    /// Cycles completed in this run
    pub cycles: u64,

    /// Cycles whose action was chosen at random
    pub explored: u64,

    /// Agent age when the run stopped
    pub age: u64,

    pub total_reward: f64,
    pub average_reward: f64,

    /// Context tree size when the run stopped
    pub model_size: usize,
}

/// Runs the agent against the environment until the environment finishes or
/// the agent reaches `terminate_age`
///
/// # Errors
///
/// Returns [`AgentError::InvalidConfiguration`] if the configuration is invalid
/// or the agent was built for different bounds than the environment's, and
/// [`AgentError::InvalidAction`] if the agent picks a code the environment does
/// not define. Errors from searching are propagated.
pub fn run<E: Environment>(
    agent: &mut Agent,
    environment: &mut E,
    config: &InteractionConfig,
) -> Result<InteractionSummary> {
    config.validate()?;
    if agent.bounds() != &DomainBounds::of::<E>() {
        return Err(AgentError::InvalidConfiguration(
            "agent bounds do not match the environment".to_string(),
        ));
    }

    let mut rng = seeded_rng(config.seed);
    let learning_period = agent.config().learning_period;
    let mut explore_rate = config.exploration;
    let mut explore = explore_rate > 0.0;

    let mut cycles = 0u64;
    let mut explored_cycles = 0u64;

    while !environment.is_finished() {
        if config.terminate_age.map_or(false, |age| agent.age() >= age) {
            break;
        }

        let cycle_start = Instant::now();
        let cycle = cycles + 1;

        let observation = environment.observation();
        let reward = environment.reward();

        if learning_period > 0 && cycle > learning_period {
            explore = false;
        }

        agent.model_update_percept(observation.code(), reward.code())?;

        let explored = explore && rng.gen::<f64>() < explore_rate;
        let code = if explored {
            explored_cycles += 1;
            agent.generate_random_action()
        } else {
            agent.search()?
        };
        let action = E::Action::from_code(code).ok_or(AgentError::InvalidAction(code))?;

        environment.perform_action(action);
        agent.model_update_action(code)?;

        info!(
            "cycle {}: observation {}, reward {}, action {}, explored {}, rate {:.4}, total {}, average {:.4}, {:?}, model {}",
            cycle,
            observation.name(),
            reward.code(),
            action.name(),
            explored,
            explore_rate,
            agent.total_reward(),
            agent.average_reward(),
            cycle_start.elapsed(),
            agent.model_size()
        );

        if explore {
            explore_rate *= config.explore_decay;
        }
        cycles = cycle;
    }

    let summary = InteractionSummary {
        cycles,
        explored: explored_cycles,
        age: agent.age(),
        total_reward: agent.total_reward(),
        average_reward: agent.average_reward(),
        model_size: agent.model_size(),
    };
    info!(
        "summary: agent age {}, average reward {:.4}",
        summary.age, summary.average_reward
    );

    Ok(summary)
}
