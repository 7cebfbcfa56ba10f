use rand::rngs::StdRng;
use rand::Rng;

use crate::{
    environment::{Environment, Tagged},
    utils::seeded_rng,
    AgentError, Result,
};

/// A side of the coin, used both as the guess and as the observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Tails,
    Heads,
}

impl Tagged for Face {
    const ALL: &'static [Self] = &[Face::Tails, Face::Heads];

    fn code(self) -> u64 {
        self as u64
    }

    fn name(self) -> &'static str {
        match self {
            Face::Tails => "tails",
            Face::Heads => "heads",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinReward {
    Lose,
    Win,
}

impl Tagged for CoinReward {
    const ALL: &'static [Self] = &[CoinReward::Lose, CoinReward::Win];

    fn code(self) -> u64 {
        self as u64
    }

    fn name(self) -> &'static str {
        match self {
            CoinReward::Lose => "lose",
            CoinReward::Win => "win",
        }
    }
}

/// A biased coin: the agent guesses a face, then sees the toss
///
/// A correct guess is rewarded with 1. The best policy always guesses the more
/// likely face.
#[derive(Debug)]
pub struct CoinFlip {
    heads_probability: f64,
    observation: Face,
    reward: CoinReward,
    last_guess: Option<Face>,
    rng: StdRng,
}

impl CoinFlip {
    /// Heads probability of a coin built with [`CoinFlip::new`]
    pub const DEFAULT_HEADS_PROBABILITY: f64 = 0.7;

    /// Creates a coin that lands heads with the default probability
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let observation = Self::toss(&mut rng, Self::DEFAULT_HEADS_PROBABILITY);

        CoinFlip {
            heads_probability: Self::DEFAULT_HEADS_PROBABILITY,
            observation,
            reward: CoinReward::Lose,
            last_guess: None,
            rng,
        }
    }

    /// Sets the probability of heads
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfiguration`] unless `p` lies in [0, 1].
    pub fn with_heads_probability(mut self, p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(AgentError::InvalidConfiguration(format!(
                "heads probability must lie in [0, 1], got {}",
                p
            )));
        }
        self.heads_probability = p;
        Ok(self)
    }

    /// Probability that a toss lands heads
    pub fn heads_probability(&self) -> f64 {
        self.heads_probability
    }

    fn toss(rng: &mut StdRng, heads_probability: f64) -> Face {
        if rng.gen::<f64>() < heads_probability {
            Face::Heads
        } else {
            Face::Tails
        }
    }
}

impl Environment for CoinFlip {
    type Action = Face;
    type Observation = Face;
    type Reward = CoinReward;

    fn observation(&self) -> Face {
        self.observation
    }

    fn reward(&self) -> CoinReward {
        self.reward
    }

    fn perform_action(&mut self, guess: Face) {
        self.observation = Self::toss(&mut self.rng, self.heads_probability);
        self.reward = if guess == self.observation {
            CoinReward::Win
        } else {
            CoinReward::Lose
        };
        self.last_guess = Some(guess);
    }

    fn describe(&self) -> String {
        match self.last_guess {
            Some(guess) => format!(
                "guessed {}, coin landed {}, {}",
                guess.name(),
                self.observation.name(),
                self.reward.name()
            ),
            None => format!("coin shows {}", self.observation.name()),
        }
    }
}
