//! Traits describing the worlds an agent can interact with
//!
//! An environment speaks in [`Tagged`] values: small closed sets of named
//! constants, each with a fixed integer code. The agent only ever sees the codes,
//! encoded as fixed-width bit strings, and [`DomainBounds`] carries everything it
//! needs to know about them.

use std::fmt::Debug;

use crate::{symbol::bits_required, AgentError, Result};

/// A named domain value with a fixed integer code
///
/// # Example
///
/// ```
/// use ctw_uct::environment::Tagged;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Door {
///     Left,
///     Right,
/// }
///
/// impl Tagged for Door {
///     const ALL: &'static [Self] = &[Door::Left, Door::Right];
///
///     fn code(self) -> u64 {
///         self as u64
///     }
///
///     fn name(self) -> &'static str {
///         match self {
///             Door::Left => "left",
///             Door::Right => "right",
///         }
///     }
/// }
///
/// assert_eq!(Door::from_code(1), Some(Door::Right));
/// assert_eq!(Door::bits(), 1);
/// ```
pub trait Tagged: Copy + Eq + Debug + 'static {
    /// Every value of the type
    const ALL: &'static [Self];

    /// The integer the value is encoded as
    fn code(self) -> u64;

    /// Human readable name
    fn name(self) -> &'static str;

    /// Finds the value with the given code
    fn from_code(code: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.code() == code)
    }

    /// Bits needed to encode the largest code
    fn bits() -> usize {
        bits_required(Self::ALL.iter().map(|value| value.code()).max().unwrap_or(0))
    }
}

/// A world the agent acts in
pub trait Environment {
    type Action: Tagged;
    type Observation: Tagged;

    /// Rewards are non-negative; the code of a reward is its value
    type Reward: Tagged;

    /// The observation produced by the last action
    fn observation(&self) -> Self::Observation;

    /// The reward produced by the last action
    fn reward(&self) -> Self::Reward;

    /// Applies an action and computes the next percept
    fn perform_action(&mut self, action: Self::Action);

    /// Returns true once the environment will accept no more actions
    fn is_finished(&self) -> bool {
        false
    }

    /// One-line description of the current state
    fn describe(&self) -> String;
}

/// Bit widths and value ranges of an environment, as seen by the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainBounds {
    pub action_bits: usize,
    pub observation_bits: usize,
    pub reward_bits: usize,
    /// Codes of every valid action, in a fixed order
    pub valid_actions: Vec<u64>,
    pub min_reward: u64,
    pub max_reward: u64,
}

impl DomainBounds {
    /// Derives the bounds of an environment type from its tagged values
    pub fn of<E: Environment>() -> Self {
        let rewards = E::Reward::ALL.iter().map(|reward| reward.code());

        DomainBounds {
            action_bits: E::Action::bits(),
            observation_bits: E::Observation::bits(),
            reward_bits: E::Reward::bits(),
            valid_actions: E::Action::ALL.iter().map(|action| action.code()).collect(),
            min_reward: rewards.clone().min().unwrap_or(0),
            max_reward: rewards.max().unwrap_or(0),
        }
    }

    /// Bits in an encoded percept: reward first, then observation
    pub fn percept_bits(&self) -> usize {
        self.reward_bits + self.observation_bits
    }

    /// Largest minus smallest reward
    pub fn reward_range(&self) -> f64 {
        (self.max_reward - self.min_reward) as f64
    }

    /// Returns true if `action` is one of the valid action codes
    pub fn is_valid_action(&self, action: u64) -> bool {
        self.valid_actions.contains(&action)
    }

    /// Checks that the bounds are internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.valid_actions.is_empty() {
            return Err(AgentError::NoValidActions);
        }

        for (name, bits) in [
            ("action", self.action_bits),
            ("observation", self.observation_bits),
            ("reward", self.reward_bits),
        ] {
            if bits == 0 || bits > 64 {
                return Err(AgentError::InvalidConfiguration(format!(
                    "{} bits must lie in 1..=64, got {}",
                    name, bits
                )));
            }
        }

        if let Some(&action) = self
            .valid_actions
            .iter()
            .find(|&&action| bits_required(action) > self.action_bits)
        {
            return Err(AgentError::ValueOutOfRange {
                value: action,
                bits: self.action_bits,
            });
        }

        if self.min_reward > self.max_reward {
            return Err(AgentError::InvalidConfiguration(format!(
                "minimum reward {} exceeds maximum reward {}",
                self.min_reward, self.max_reward
            )));
        }

        if bits_required(self.max_reward) > self.reward_bits {
            return Err(AgentError::ValueOutOfRange {
                value: self.max_reward,
                bits: self.reward_bits,
            });
        }

        Ok(())
    }
}
