use ctw_uct::{
    agent::Agent,
    config::AgentConfig,
    environment::DomainBounds,
    environments::{CoinFlip, ExtendedTiger},
    model::UpdatePhase,
    AgentError,
};

fn small_bounds() -> DomainBounds {
    DomainBounds {
        action_bits: 2,
        observation_bits: 1,
        reward_bits: 2,
        valid_actions: vec![0, 1, 2, 3],
        min_reward: 0,
        max_reward: 3,
    }
}

fn agent_with(config: AgentConfig) -> Agent {
    Agent::new(small_bounds(), config.with_seed(21)).unwrap()
}

fn agent() -> Agent {
    agent_with(AgentConfig::default().with_ct_depth(6))
}

#[test]
fn test_fresh_agent_expects_a_percept() {
    let agent = agent();

    assert_eq!(agent.last_update(), UpdatePhase::Action);
    assert_eq!(agent.age(), 0);
    assert_eq!(agent.average_reward(), 0.0);
    assert_eq!(agent.history_size(), 0);
}

#[test]
fn test_bookkeeping_follows_updates() {
    let mut agent = agent();

    agent.model_update_percept(1, 2).unwrap();
    assert_eq!(agent.last_update(), UpdatePhase::Percept);
    assert_eq!(agent.history_size(), 3);

    agent.model_update_action(3).unwrap();
    agent.model_update_percept(0, 3).unwrap();
    agent.model_update_action(1).unwrap();

    assert_eq!(agent.age(), 2);
    assert_eq!(agent.total_reward(), 5.0);
    assert_eq!(agent.average_reward(), 2.5);
    assert_eq!(agent.history_size(), 10);
}

#[test]
#[should_panic(expected = "after a percept")]
fn test_action_before_percept_panics() {
    let mut agent = agent();
    let _ = agent.model_update_action(0);
}

#[test]
#[should_panic(expected = "after an action")]
fn test_two_percepts_in_a_row_panic() {
    let mut agent = agent();
    agent.model_update_percept(0, 0).unwrap();
    let _ = agent.model_update_percept(0, 0);
}

#[test]
#[should_panic(expected = "not a valid action")]
fn test_invalid_action_panics() {
    let mut agent = Agent::new(
        DomainBounds {
            valid_actions: vec![0, 2],
            ..small_bounds()
        },
        AgentConfig::default(),
    )
    .unwrap();
    agent.model_update_percept(0, 0).unwrap();
    let _ = agent.model_update_action(1);
}

#[test]
fn test_out_of_range_percept_is_an_error() {
    let mut agent = agent();

    assert_eq!(
        agent.model_update_percept(0, 4),
        Err(AgentError::ValueOutOfRange { value: 4, bits: 2 })
    );
    assert_eq!(agent.history_size(), 0, "nothing recorded on error");
}

#[test]
fn test_revert_restores_the_checkpoint() {
    let mut agent = agent();
    agent.model_update_percept(1, 1).unwrap();
    agent.model_update_action(2).unwrap();
    agent.model_update_percept(0, 3).unwrap();

    let undo = agent.checkpoint();
    let size = agent.model_size();
    let log_probability = agent.context_tree().root_log_probability();

    agent.model_update_action(1).unwrap();
    agent.generate_percept_and_update().unwrap();
    agent.model_update_action(0).unwrap();
    agent.model_revert(&undo);

    assert_eq!(agent.checkpoint(), undo);
    assert_eq!(agent.model_size(), size);
    assert!((agent.context_tree().root_log_probability() - log_probability).abs() < 1e-9);
}

#[test]
fn test_generate_percept_leaves_the_model_unchanged() {
    let mut agent = agent();
    agent.model_update_percept(1, 2).unwrap();
    agent.model_update_action(0).unwrap();
    let undo = agent.checkpoint();

    let (observation, reward) = agent.generate_percept();
    assert!(observation < 2 && reward < 4);
    assert_eq!(agent.checkpoint(), undo);
}

#[test]
fn test_action_probabilities_sum_to_one() {
    let mut agent = agent_with(AgentConfig::default().with_ct_depth(3));
    for (observation, reward, action) in [(0, 1, 2), (1, 0, 3), (1, 1, 2), (0, 2, 1)] {
        agent.model_update_percept(observation, reward).unwrap();
        agent.model_update_action(action).unwrap();
    }
    agent.model_update_percept(1, 3).unwrap();

    let total: f64 = (0..4)
        .map(|action| agent.predicted_action_probability(action).unwrap())
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_percept_probabilities_sum_to_one() {
    let mut agent = agent_with(AgentConfig::default().with_ct_depth(4));
    agent.model_update_percept(1, 2).unwrap();
    agent.model_update_action(3).unwrap();

    let mut total = 0.0;
    for observation in 0..2 {
        for reward in 0..4 {
            total += agent.percept_probability(observation, reward).unwrap();
        }
    }
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_generated_actions_are_valid() {
    let bounds = DomainBounds {
        valid_actions: vec![1, 3],
        ..small_bounds()
    };

    for retries in [0, 5] {
        let config = AgentConfig::default()
            .with_ct_depth(4)
            .with_action_retry_limit(retries)
            .with_seed(3);
        let mut agent = Agent::new(bounds.clone(), config).unwrap();
        agent.model_update_percept(0, 0).unwrap();

        for _ in 0..20 {
            let action = agent.generate_action().unwrap();
            assert!(action == 1 || action == 3, "generated invalid action {}", action);
            agent.model_update_action(action).unwrap();
            agent.model_update_percept(1, 1).unwrap();
        }
    }
}

#[test]
fn test_exhausted_action_sampling_picks_the_most_probable_action() {
    // Long all-zero percepts make a set low bit, which every valid action needs,
    // very unlikely to be drawn
    let bounds = DomainBounds {
        action_bits: 2,
        observation_bits: 16,
        reward_bits: 1,
        valid_actions: vec![1, 3],
        min_reward: 0,
        max_reward: 1,
    };
    let config = AgentConfig::default()
        .with_ct_depth(0)
        .with_action_retry_limit(0)
        .with_seed(3);
    let mut agent = Agent::new(bounds, config).unwrap();
    for _ in 0..50 {
        agent.model_update_percept(0, 0).unwrap();
        agent.model_update_action(1).unwrap();
    }
    agent.model_update_percept(0, 0).unwrap();

    let one = agent.predicted_action_probability(1).unwrap();
    let three = agent.predicted_action_probability(3).unwrap();
    assert!(one > three, "P(1) = {}, P(3) = {}", one, three);

    assert_eq!(agent.generate_action().unwrap(), 1);
    assert_eq!(agent.last_update(), UpdatePhase::Percept);
}

#[test]
fn test_generated_actions_follow_the_history() {
    // One cycle is five symbols, so a depth of five sees a whole cycle
    let mut agent = agent_with(AgentConfig::default().with_ct_depth(5));
    agent.model_update_percept(0, 0).unwrap();
    for _ in 0..100 {
        agent.model_update_action(2).unwrap();
        agent.model_update_percept(0, 0).unwrap();
    }

    let picks = (0..20)
        .filter(|_| agent.generate_action().unwrap() == 2)
        .count();
    assert!(picks >= 15, "action 2 picked only {} times", picks);
}

#[test]
fn test_random_actions_cover_the_valid_set() {
    let mut agent = agent();
    let mut seen = [false; 4];
    for _ in 0..100 {
        seen[agent.generate_random_action() as usize] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_percepts_after_the_learning_period_are_not_learned() {
    let mut agent = agent_with(AgentConfig::default().with_ct_depth(4).with_learning_period(1));
    agent.model_update_percept(0, 1).unwrap();
    agent.model_update_action(1).unwrap();
    agent.model_update_percept(1, 1).unwrap();
    agent.model_update_action(2).unwrap();

    let visits = agent.context_tree().root().visits();
    agent.model_update_percept(1, 2).unwrap();

    assert_eq!(agent.context_tree().root().visits(), visits);
    assert_eq!(agent.history_size(), 13);
    assert_eq!(agent.total_reward(), 4.0);
}

#[test]
fn test_search_works_after_the_learning_period() {
    let mut agent = agent_with(
        AgentConfig::default()
            .with_ct_depth(4)
            .with_learning_period(1)
            .with_horizon(3)
            .with_simulations(40),
    );
    agent.model_update_percept(0, 1).unwrap();
    agent.model_update_action(1).unwrap();
    agent.model_update_percept(1, 1).unwrap();
    agent.model_update_action(2).unwrap();
    agent.model_update_percept(1, 2).unwrap();

    let undo = agent.checkpoint();
    let action = agent.search().unwrap();

    assert!(action < 4);
    assert_eq!(agent.checkpoint(), undo);
}

#[test]
fn test_search_restores_the_agent() {
    let mut agent = agent_with(
        AgentConfig::default()
            .with_ct_depth(6)
            .with_horizon(3)
            .with_simulations(60),
    );
    agent.model_update_percept(1, 2).unwrap();
    let undo = agent.checkpoint();
    let size = agent.model_size();

    agent.search().unwrap();

    assert_eq!(agent.checkpoint(), undo);
    assert_eq!(agent.model_size(), size);
    let statistics = agent.last_search_statistics().unwrap();
    assert_eq!(statistics.simulations, 60);
    assert_eq!(statistics.model_size, size);
}

#[test]
fn test_reset_forgets_everything() {
    let mut agent = agent();
    agent.model_update_percept(1, 2).unwrap();
    agent.model_update_action(3).unwrap();
    agent.reset();

    assert_eq!(agent.age(), 0);
    assert_eq!(agent.total_reward(), 0.0);
    assert_eq!(agent.model_size(), 1);
    assert_eq!(agent.last_update(), UpdatePhase::Action);
}

#[test]
fn test_bounds_come_from_the_environment() {
    let coin = DomainBounds::of::<CoinFlip>();
    assert_eq!(
        (coin.action_bits, coin.observation_bits, coin.reward_bits),
        (1, 1, 1)
    );

    let tiger = DomainBounds::of::<ExtendedTiger>();
    assert_eq!(tiger.action_bits, 2);
    assert_eq!(tiger.observation_bits, 2);
    assert_eq!(tiger.reward_bits, 8);
    assert_eq!((tiger.min_reward, tiger.max_reward), (0, 130));
    assert_eq!(tiger.valid_actions, vec![0, 1, 2, 3]);
}

#[test]
fn test_inconsistent_bounds_are_rejected() {
    let empty = DomainBounds {
        valid_actions: Vec::new(),
        ..small_bounds()
    };
    assert_eq!(
        Agent::new(empty, AgentConfig::default()).err(),
        Some(AgentError::NoValidActions)
    );

    let too_wide = DomainBounds {
        valid_actions: vec![0, 4],
        ..small_bounds()
    };
    assert_eq!(
        Agent::new(too_wide, AgentConfig::default()).err(),
        Some(AgentError::ValueOutOfRange { value: 4, bits: 2 })
    );
}
