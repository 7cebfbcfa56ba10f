//! Extended Tiger example for the MC-AIXI agent
//!
//! The agent sits in front of two doors, one hiding a tiger and the other gold.
//! It can only listen while seated and only open a door while standing, so it
//! has to plan several steps ahead. This example drives the loop by hand to
//! show each step.

use ctw_uct::{
    environment::{Environment, Tagged},
    environments::{ExtendedTiger, TigerAction},
    Agent, AgentConfig, AgentError, DomainBounds,
};

fn main() -> Result<(), AgentError> {
    // Initialize logging
    env_logger::init();

    println!("MC-AIXI Extended Tiger Example");
    println!("==============================");
    println!();

    let config = AgentConfig::default()
        .with_ct_depth(48)
        .with_horizon(4)
        .with_simulations(300)
        .with_seed(11);
    let mut agent = Agent::new(DomainBounds::of::<ExtendedTiger>(), config)?;
    let mut environment = ExtendedTiger::new(Some(3));

    for cycle in 1..=100 {
        agent.model_update_percept(environment.observation().code(), environment.reward().code())?;

        // Explore at random for the first cycles so the model sees every action
        let code = if cycle <= 30 {
            agent.generate_random_action()
        } else {
            agent.search()?
        };
        let action = TigerAction::from_code(code).ok_or(AgentError::InvalidAction(code))?;

        environment.perform_action(action);
        agent.model_update_action(code)?;

        println!("{:3}: {}", cycle, environment.describe());
    }

    println!();
    println!("Average reward: {:.2} (99 is break-even)", agent.average_reward());
    println!("Model size: {} nodes", agent.model_size());

    Ok(())
}
