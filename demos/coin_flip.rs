//! Coin flip example for the MC-AIXI agent
//!
//! The agent guesses the outcome of a biased coin and has to discover on its
//! own which side comes up more often. Run with `RUST_LOG=info` to see every
//! cycle.

use ctw_uct::{
    environments::CoinFlip, interaction, Agent, AgentConfig, DomainBounds, InteractionConfig,
};

fn main() -> Result<(), ctw_uct::AgentError> {
    // Initialize logging
    env_logger::init();

    println!("MC-AIXI Coin Flip Example");
    println!("=========================");
    println!();

    let config = AgentConfig::default()
        .with_ct_depth(8)
        .with_horizon(2)
        .with_simulations(100)
        .with_seed(2024);
    let mut agent = Agent::new(DomainBounds::of::<CoinFlip>(), config)?;

    let mut environment = CoinFlip::new(Some(7)).with_heads_probability(0.8)?;
    println!("Coin lands heads with probability {}", environment.heads_probability());

    let interaction_config = InteractionConfig::default()
        .with_exploration(0.3)
        .with_explore_decay(0.95)
        .with_terminate_age(200)
        .with_seed(1);

    let summary = interaction::run(&mut agent, &mut environment, &interaction_config)?;

    println!("Cycles:         {}", summary.cycles);
    println!("Explored:       {}", summary.explored);
    println!("Total reward:   {}", summary.total_reward);
    println!("Average reward: {:.3}", summary.average_reward);
    println!("Model size:     {} nodes", summary.model_size);

    if let Some(statistics) = agent.last_search_statistics() {
        println!();
        println!("Last search:");
        println!("{}", statistics.summary());
    }

    Ok(())
}
