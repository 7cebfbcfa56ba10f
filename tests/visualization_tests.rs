use ctw_uct::{
    agent::Agent,
    config::{AgentConfig, SearchConfig},
    environment::DomainBounds,
    environments::ExtendedTiger,
    search::UctSearch,
};

fn seated_agent() -> Agent {
    let mut agent = Agent::new(
        DomainBounds::of::<ExtendedTiger>(),
        AgentConfig::default().with_ct_depth(12).with_seed(4),
    )
    .unwrap();
    agent.model_update_percept(0, 99).unwrap();
    agent
}

#[test]
fn test_search_tree_visualization() {
    let mut agent = seated_agent();
    let mut search = UctSearch::new(SearchConfig::default().with_horizon(2).with_simulations(30).with_seed(1));
    search.search(&mut agent).unwrap();

    let visualization = search.visualize_tree();
    let lines: Vec<&str> = visualization.lines().collect();

    assert_eq!(lines.len(), search.get_statistics().tree_size);
    assert!(lines[0].starts_with("root [Decision] (visits: 30"));
    assert!(lines.iter().any(|l| l.starts_with("  action") && l.contains("[Chance]")));
    assert!(lines.iter().any(|l| l.starts_with("    observation") && l.contains("[Decision]")));
}

#[test]
fn test_context_tree_visualization() {
    let agent = seated_agent();
    let text = agent.context_tree().to_string();

    assert_eq!(text.lines().count(), agent.model_size());
    assert!(text.contains("log_p"));
}
