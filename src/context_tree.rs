//! Context Tree Weighting over binary sequences
//!
//! A [`ContextTree`] assigns a probability to every binary sequence by mixing,
//! with equal prior weight, all tree-shaped Markov models up to a fixed context
//! depth. Each node keeps a Krichevsky–Trofimov (KT) estimate of the symbols seen
//! in its context plus a weighted probability that combines its own estimate with
//! those of its children. Both are kept in log space.
//!
//! The tree is updated one symbol at a time and every update can be undone
//! exactly with [`ContextTree::revert`], which is how prediction and planning
//! explore hypothetical futures without disturbing the learned model.
//!
//! # Example
//!
//! ```
//! use ctw_uct::context_tree::ContextTree;
//! use ctw_uct::symbol::Symbol;
//!
//! let mut tree = ContextTree::new(0);
//! tree.update(&[Symbol::Zero, Symbol::Zero, Symbol::Zero]);
//!
//! // KT estimate after three zeros: (0 + 1/2) / (3 + 1)
//! assert!((tree.predict(&[Symbol::One]) - 0.125).abs() < 1e-12);
//! ```

use std::fmt;

use log::debug;
use rand::Rng;

use crate::{symbol::Symbol, utils::log_mix};

/// Index of a node inside the tree's arena
type NodeIndex = usize;

/// The root always lives in the first arena slot
const ROOT: NodeIndex = 0;

/// A node of the context tree
///
/// Nodes are owned by their [`ContextTree`] and are only reachable through it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextNode {
    counts: [u64; 2],
    log_kt: f64,
    log_probability: f64,
    children: [Option<NodeIndex>; 2],
}

impl ContextNode {
    fn new() -> Self {
        ContextNode {
            counts: [0, 0],
            log_kt: 0.0,
            log_probability: 0.0,
            children: [None, None],
        }
    }

    /// Occurrences of symbol 0 and symbol 1 in this context
    pub fn counts(&self) -> [u64; 2] {
        self.counts
    }

    /// Number of symbols seen in this context
    pub fn visits(&self) -> u64 {
        self.counts[0] + self.counts[1]
    }

    /// Cached KT log-probability of the symbols seen in this context
    pub fn log_kt(&self) -> f64 {
        self.log_kt
    }

    /// Cached weighted log-probability of this context
    pub fn log_probability(&self) -> f64 {
        self.log_probability
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Log of the KT probability that `symbol` comes next in this context
    ///
    /// With `a` zeros and `b` ones seen, this is `ln((a + 1/2) / (a + b + 1))`
    /// for a zero and `ln((b + 1/2) / (a + b + 1))` for a one.
    fn log_kt_multiplier(&self, symbol: Symbol) -> f64 {
        ((self.counts[symbol.index()] as f64 + 0.5) / (self.visits() as f64 + 1.0)).ln()
    }
}

/// A depth-bounded context tree with exact undo
pub struct ContextTree {
    /// Maximum number of past symbols used as context
    depth: usize,

    /// Node arena; slot 0 is the root
    nodes: Vec<ContextNode>,

    /// Arena slots released by `revert`, reused before the arena grows
    free: Vec<NodeIndex>,

    /// Every symbol seen so far, oldest first
    history: Vec<Symbol>,

    /// Parallel to `history`: whether the tree learned from each symbol
    learned: Vec<bool>,

    /// Nodes from the root down to the deepest node for the current history.
    /// Only valid right after `update_context`.
    context: Vec<NodeIndex>,

    /// Number of nodes reachable from the root
    size: usize,
}

impl ContextTree {
    /// Creates an empty tree that conditions on at most `depth` past symbols
    pub fn new(depth: usize) -> Self {
        ContextTree {
            depth,
            nodes: vec![ContextNode::new()],
            free: Vec::new(),
            history: Vec::new(),
            learned: Vec::new(),
            context: Vec::with_capacity(depth + 1),
            size: 1,
        }
    }

    /// Resets the tree to a single root node and an empty history
    pub fn clear(&mut self) {
        debug!("clearing context tree of {} nodes", self.size);

        self.nodes.clear();
        self.nodes.push(ContextNode::new());
        self.free.clear();
        self.history.clear();
        self.learned.clear();
        self.context.clear();
        self.size = 1;
    }

    /// Maximum context length
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Symbols seen so far, oldest first
    pub fn history(&self) -> &[Symbol] {
        &self.history
    }

    /// Number of symbols seen so far
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of nodes in the tree
    ///
    /// Maintained incrementally; always equal to [`ContextTree::count_nodes`].
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weighted log-probability of the whole history
    pub fn root_log_probability(&self) -> f64 {
        self.nodes[ROOT].log_probability
    }

    /// The root node
    pub fn root(&self) -> &ContextNode {
        &self.nodes[ROOT]
    }

    /// Looks up the node for a context, given most recent symbol first
    pub fn node_at(&self, context: &[Symbol]) -> Option<&ContextNode> {
        let mut index = ROOT;
        for symbol in context {
            index = self.nodes[index].children[symbol.index()]?;
        }
        Some(&self.nodes[index])
    }

    /// Probability that `symbols` come next, given the history
    ///
    /// While the history plus `symbols` is no longer than the depth there is no
    /// context to condition on and the uniform `0.5^n` is returned. Otherwise
    /// the symbols are applied with [`update`](Self::update), the change in root
    /// log-probability is read off, and the update is reverted. Symbols that
    /// arrive before a full context exists count as uniform.
    pub fn predict(&mut self, symbols: &[Symbol]) -> f64 {
        if self.history.len() + symbols.len() <= self.depth {
            return 0.5f64.powi(symbols.len() as i32);
        }

        let uniform = self.depth.saturating_sub(self.history.len());

        let before = self.root_log_probability();
        self.update(symbols);
        let after = self.root_log_probability();
        self.revert(symbols.len());

        0.5f64.powi(uniform as i32) * (after - before).exp()
    }

    /// Learns from `symbols`, in order
    ///
    /// Until the history holds `depth` symbols there is no full context, so
    /// those first symbols only extend the history.
    pub fn update(&mut self, symbols: &[Symbol]) {
        for &symbol in symbols {
            if self.history.len() < self.depth {
                self.history.push(symbol);
                self.learned.push(false);
                continue;
            }

            self.update_context();

            for i in (0..self.context.len()).rev() {
                let index = self.context[i];
                self.update_node(index, symbol);
            }

            self.history.push(symbol);
            self.learned.push(true);
        }
    }

    /// Appends `symbols` to the history without learning from them
    ///
    /// The symbols still shape the context of later updates. Reverting them
    /// only removes them from the history.
    pub fn update_history(&mut self, symbols: &[Symbol]) {
        self.history.extend_from_slice(symbols);
        self.learned.resize(self.history.len(), false);
    }

    /// Undoes the last `count` symbols added by [`update`](Self::update) or
    /// [`update_history`](Self::update_history), most recent first
    ///
    /// # Panics
    ///
    /// Panics if the history holds fewer than `count` symbols.
    pub fn revert(&mut self, count: usize) {
        assert!(
            count <= self.history.len(),
            "cannot revert {} symbols, history holds only {}",
            count,
            self.history.len()
        );

        for _ in 0..count {
            let (Some(symbol), Some(learned)) = (self.history.pop(), self.learned.pop()) else {
                break;
            };
            if !learned {
                continue;
            }

            self.update_context();

            for i in (0..self.context.len()).rev() {
                let index = self.context[i];
                self.revert_node(index, symbol);
            }
        }
    }

    /// Draws `count` symbols from the model, leaving the tree unchanged
    pub fn generate_random_symbols<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Symbol> {
        let symbols = self.generate_random_symbols_and_update(count, rng);
        self.revert(count);
        symbols
    }

    /// Draws `count` symbols from the model, learning each one as it is drawn
    ///
    /// Every draw is conditioned on the ones before it.
    pub fn generate_random_symbols_and_update<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Vec<Symbol> {
        let mut symbols = Vec::with_capacity(count);

        for _ in 0..count {
            let threshold = self.predict(&[Symbol::Zero]);
            let symbol = if rng.gen::<f64>() < threshold {
                Symbol::Zero
            } else {
                Symbol::One
            };

            self.update(&[symbol]);
            symbols.push(symbol);
        }

        symbols
    }

    /// Lists every node with the context (most recent symbol first) that reaches it
    ///
    /// Nodes are listed depth first, zero branch before one branch.
    pub fn contexts(&self) -> Vec<(Vec<Symbol>, &ContextNode)> {
        let mut out = Vec::with_capacity(self.size);
        let mut stack = vec![(ROOT, Vec::new())];

        while let Some((index, context)) = stack.pop() {
            let node = &self.nodes[index];

            for symbol in Symbol::ALL.iter().rev() {
                if let Some(child) = node.children[symbol.index()] {
                    let mut child_context = context.clone();
                    child_context.push(*symbol);
                    stack.push((child, child_context));
                }
            }

            out.push((context, node));
        }

        out
    }

    /// Counts the reachable nodes by traversal
    pub fn count_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![ROOT];

        while let Some(index) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[index].children.iter().flatten());
        }

        count
    }

    /// Rebuilds the path cache for the current history, creating missing nodes
    fn update_context(&mut self) {
        self.context.clear();
        self.context.push(ROOT);

        let mut parent = ROOT;
        let len = self.history.len();

        for i in 0..self.depth.min(len) {
            let branch = self.history[len - 1 - i].index();

            let child = match self.nodes[parent].children[branch] {
                Some(child) => child,
                None => {
                    let child = self.allocate();
                    self.nodes[parent].children[branch] = Some(child);
                    child
                }
            };

            self.context.push(child);
            parent = child;
        }
    }

    fn update_node(&mut self, index: NodeIndex, symbol: Symbol) {
        let node = &mut self.nodes[index];
        let multiplier = node.log_kt_multiplier(symbol);
        node.log_kt += multiplier;

        self.refresh_log_probability(index);
        self.nodes[index].counts[symbol.index()] += 1;
    }

    fn revert_node(&mut self, index: NodeIndex, symbol: Symbol) {
        let node = &mut self.nodes[index];
        assert!(
            node.counts[symbol.index()] > 0,
            "symbol count would become negative"
        );

        node.counts[symbol.index()] -= 1;
        let multiplier = node.log_kt_multiplier(symbol);
        node.log_kt -= multiplier;
        if node.visits() == 0 {
            node.log_kt = 0.0;
        }

        for branch in 0..2 {
            if let Some(child) = self.nodes[index].children[branch] {
                if self.nodes[child].visits() == 0 {
                    self.nodes[index].children[branch] = None;
                    self.release(child);
                }
            }
        }

        self.refresh_log_probability(index);
    }

    /// Recomputes the weighted probability of a node from its KT estimate and
    /// its children
    fn refresh_log_probability(&mut self, index: NodeIndex) {
        let node = &self.nodes[index];

        let log_probability = if node.is_leaf() {
            node.log_kt
        } else {
            let child_sum: f64 = node
                .children
                .iter()
                .flatten()
                .map(|&child| self.nodes[child].log_probability)
                .sum();
            log_mix(node.log_kt, child_sum)
        };

        self.nodes[index].log_probability = log_probability;
    }

    fn allocate(&mut self) -> NodeIndex {
        self.size += 1;

        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = ContextNode::new();
                index
            }
            None => {
                self.nodes.push(ContextNode::new());
                self.nodes.len() - 1
            }
        }
    }

    /// Returns a detached subtree to the free list
    fn release(&mut self, index: NodeIndex) {
        let mut stack = vec![index];

        while let Some(index) = stack.pop() {
            stack.extend(self.nodes[index].children.iter().flatten());
            self.nodes[index].children = [None, None];
            self.free.push(index);
            self.size -= 1;
        }
    }

    fn fmt_node(&self, index: NodeIndex, label: &str, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.nodes[index];
        writeln!(
            f,
            "{}{} (0: {}, 1: {}, log_p: {:.4})",
            "  ".repeat(depth),
            label,
            node.counts[0],
            node.counts[1],
            node.log_probability
        )?;

        for symbol in Symbol::ALL {
            if let Some(child) = node.children[symbol.index()] {
                self.fmt_node(child, &symbol.to_string(), depth + 1, f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ContextTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextTree")
            .field("depth", &self.depth)
            .field("size", &self.size)
            .field("history_len", &self.history.len())
            .field("root_log_probability", &self.root_log_probability())
            .finish()
    }
}

impl fmt::Display for ContextTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(ROOT, "root", 0, f)
    }
}
