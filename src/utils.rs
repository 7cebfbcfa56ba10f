//! Helpers shared by the context tree, the agent and the search

use rand::rngs::StdRng;
use rand::SeedableRng;

/// ln(0.5), used by every equal-weight mixture
pub const LOG_HALF: f64 = -std::f64::consts::LN_2;

/// Equal-weight mixture of two probabilities given in log space
///
/// Computes `ln(0.5 * exp(a) + 0.5 * exp(b))` without leaving log space.
/// The larger argument is factored out so the remaining `exp` never overflows.
pub fn log_mix(a: f64, b: f64) -> f64 {
    if b <= a {
        LOG_HALF + a + (b - a).exp().ln_1p()
    } else {
        LOG_HALF + b + (a - b).exp().ln_1p()
    }
}

/// Calculates the exploration term of a UCB priority
///
/// Unvisited children get an infinite bonus.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Folds one more sample into a running mean over `count` earlier samples
pub fn running_mean(mean: f64, count: u64, sample: f64) -> f64 {
    (sample + mean * count as f64) / (count as f64 + 1.0)
}

/// Builds the random number generator for a component
///
/// A fixed seed gives a reproducible stream; `None` seeds from the OS.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
