//! Per-search bookkeeping
//!
//! [`UctSearch`](crate::search::UctSearch) starts every search with a fresh
//! [`SearchStatistics`] and folds each simulation's return into it.

use std::time::Duration;

use crate::utils::running_mean;

/// What a single search did
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    /// Simulations completed
    pub simulations: usize,

    /// Simulations that ended in a playout from an unvisited decision node
    pub playouts: usize,

    /// Mean return over all simulations; this is the root's value
    pub mean_return: f64,

    /// Smallest and largest return of a single simulation
    pub return_range: Option<(f64, f64)>,

    /// Wall time of the whole search
    pub elapsed: Duration,

    /// Nodes in the search tree when the search finished
    pub tree_size: usize,

    /// Deepest decision level a simulation reached below the root
    pub max_depth: usize,

    /// Size of the model when the search finished
    pub model_size: usize,
}

impl SearchStatistics {
    /// Statistics of a search that has not run yet
    pub fn new() -> Self {
        SearchStatistics {
            simulations: 0,
            playouts: 0,
            mean_return: 0.0,
            return_range: None,
            elapsed: Duration::ZERO,
            tree_size: 1,
            max_depth: 0,
            model_size: 0,
        }
    }

    /// Folds the return of one finished simulation into the figures
    pub fn record_return(&mut self, value: f64) {
        self.mean_return = running_mean(self.mean_return, self.simulations as u64, value);
        self.simulations += 1;
        self.return_range = Some(match self.return_range {
            Some((low, high)) => (low.min(value), high.max(value)),
            None => (value, value),
        });
    }

    /// Simulation throughput, or 0 when no time was measured
    pub fn simulations_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.simulations as f64 / seconds
    }

    /// One line per figure, for logs and demos
    pub fn summary(&self) -> String {
        let range = match self.return_range {
            Some((low, high)) => format!("{:.3} to {:.3}", low, high),
            None => "none".to_string(),
        };

        format!(
            "{} simulations ({} playouts) in {:.3}s, {:.1}/s\n\
             mean return {:.3}, returns {}\n\
             search tree {} nodes, depth {}; model {} nodes",
            self.simulations,
            self.playouts,
            self.elapsed.as_secs_f64(),
            self.simulations_per_second(),
            self.mean_return,
            range,
            self.tree_size,
            self.max_depth,
            self.model_size,
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_fold_into_mean_and_range() {
        let mut statistics = SearchStatistics::new();
        for value in [2.0, -1.0, 5.0, 0.0] {
            statistics.record_return(value);
        }

        assert_eq!(statistics.simulations, 4);
        assert!((statistics.mean_return - 1.5).abs() < 1e-12);
        assert_eq!(statistics.return_range, Some((-1.0, 5.0)));
    }

    #[test]
    fn empty_search_has_no_rate() {
        let statistics = SearchStatistics::new();
        assert_eq!(statistics.simulations_per_second(), 0.0);
        assert!(statistics.summary().contains("returns none"));
    }
}
