//! Search tree nodes for Monte Carlo planning
//!
//! The planning tree alternates two kinds of node. A decision node branches on
//! the agent's actions; a chance node branches on the observations the model
//! answers with. Every node keeps the running mean of the returns sampled through
//! it and how many samples that mean covers.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::utils::running_mean;

/// Which level of the planning tree a node sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Children are keyed by action
    Decision,
    /// Children are keyed by observation
    Chance,
}

/// Children of a node; the variant doubles as the node's kind
#[derive(Debug, Clone)]
enum Children<A, O> {
    Decision(HashMap<A, SearchNode<A, O>>),
    Chance(HashMap<O, SearchNode<A, O>>),
}

/// A node of the planning tree
///
/// `A` is the action type and `O` the observation type of the model being
/// planned over. Decision nodes only ever have chance children and chance nodes
/// only ever have decision children.
#[derive(Debug, Clone)]
pub struct SearchNode<A, O> {
    mean: f64,
    visits: u64,
    children: Children<A, O>,
}

impl<A, O> SearchNode<A, O>
where
    A: Copy + Eq + Hash + Debug,
    O: Copy + Eq + Hash + Debug,
{
    /// Creates an unvisited decision node
    pub fn decision() -> Self {
        SearchNode {
            mean: 0.0,
            visits: 0,
            children: Children::Decision(HashMap::new()),
        }
    }

    /// Creates an unvisited chance node
    pub fn chance() -> Self {
        SearchNode {
            mean: 0.0,
            visits: 0,
            children: Children::Chance(HashMap::new()),
        }
    }

    /// Whether the node picks an action or samples a percept
    pub fn kind(&self) -> NodeKind {
        match self.children {
            Children::Decision(_) => NodeKind::Decision,
            Children::Chance(_) => NodeKind::Chance,
        }
    }

    /// Mean return of the samples that passed through this node
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Number of samples that passed through this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Folds a sampled return into the running mean
    pub fn record(&mut self, result: f64) {
        self.mean = running_mean(self.mean, self.visits, result);
        self.visits += 1;
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        match &self.children {
            Children::Decision(children) => children.is_empty(),
            Children::Chance(children) => children.is_empty(),
        }
    }

    /// The chance node reached by `action`, if it has been expanded
    ///
    /// Always `None` on a chance node.
    pub fn action_child(&self, action: &A) -> Option<&Self> {
        match &self.children {
            Children::Decision(children) => children.get(action),
            Children::Chance(_) => None,
        }
    }

    /// The decision node reached by `observation`, if it has been expanded
    ///
    /// Always `None` on a decision node.
    pub fn observation_child(&self, observation: &O) -> Option<&Self> {
        match &self.children {
            Children::Chance(children) => children.get(observation),
            Children::Decision(_) => None,
        }
    }

    /// Returns the chance child for `action`, creating it if needed
    ///
    /// # Panics
    ///
    /// Panics if called on a chance node.
    pub fn action_child_or_insert(&mut self, action: A) -> &mut Self {
        match &mut self.children {
            Children::Decision(children) => children.entry(action).or_insert_with(Self::chance),
            Children::Chance(_) => panic!("actions can only be taken from decision nodes"),
        }
    }

    /// Returns the decision child for `observation`, creating it if needed
    ///
    /// # Panics
    ///
    /// Panics if called on a decision node.
    pub fn observation_child_or_insert(&mut self, observation: O) -> &mut Self {
        match &mut self.children {
            Children::Chance(children) => children
                .entry(observation)
                .or_insert_with(Self::decision),
            Children::Decision(_) => panic!("observations can only follow chance nodes"),
        }
    }

    /// Expanded actions of a decision node with their children, in no particular order
    pub fn action_children(&self) -> Vec<(A, &Self)> {
        match &self.children {
            Children::Decision(children) => children.iter().map(|(a, c)| (*a, c)).collect(),
            Children::Chance(_) => Vec::new(),
        }
    }

    /// Number of nodes in the subtree rooted here
    pub fn size(&self) -> usize {
        1 + match &self.children {
            Children::Decision(children) => children.values().map(|c| c.size()).sum::<usize>(),
            Children::Chance(children) => children.values().map(|c| c.size()).sum::<usize>(),
        }
    }

    /// Renders the subtree as an indented listing, one node per line
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        self.visualize_node("root", 0, &mut output);
        output
    }

    fn visualize_node(&self, label: &str, depth: usize, output: &mut String) {
        output.push_str(&format!(
            "{}{} [{:?}] (visits: {}, mean: {:.3})\n",
            "  ".repeat(depth),
            label,
            self.kind(),
            self.visits,
            self.mean
        ));

        match &self.children {
            Children::Decision(children) => {
                for (action, child) in children {
                    child.visualize_node(&format!("action {:?}", action), depth + 1, output);
                }
            }
            Children::Chance(children) => {
                for (observation, child) in children {
                    child.visualize_node(&format!("observation {:?}", observation), depth + 1, output);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_alternate_kind() {
        let mut root: SearchNode<u8, u8> = SearchNode::decision();
        let chance = root.action_child_or_insert(1);
        assert_eq!(chance.kind(), NodeKind::Chance);

        let decision = chance.observation_child_or_insert(0);
        assert_eq!(decision.kind(), NodeKind::Decision);
        assert_eq!(root.size(), 3);
    }

    #[test]
    #[should_panic(expected = "decision nodes")]
    fn chance_nodes_reject_actions() {
        let mut node: SearchNode<u8, u8> = SearchNode::chance();
        node.action_child_or_insert(0);
    }

    #[test]
    fn visualization_lists_every_node() {
        let mut root: SearchNode<u8, u8> = SearchNode::decision();
        root.record(1.0);
        root.action_child_or_insert(2).record(1.0);

        let text = root.visualize();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("action 2"));
    }
}
