use rand::rngs::StdRng;
use rand::Rng;

use crate::{
    environment::{Environment, Tagged},
    utils::seeded_rng,
    AgentError, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TigerAction {
    Stand,
    Listen,
    OpenLeft,
    OpenRight,
}

impl Tagged for TigerAction {
    const ALL: &'static [Self] = &[
        TigerAction::Stand,
        TigerAction::Listen,
        TigerAction::OpenLeft,
        TigerAction::OpenRight,
    ];

    fn code(self) -> u64 {
        self as u64
    }

    fn name(self) -> &'static str {
        match self {
            TigerAction::Stand => "stand",
            TigerAction::Listen => "listen",
            TigerAction::OpenLeft => "open left",
            TigerAction::OpenRight => "open right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TigerObservation {
    Nothing,
    Left,
    Right,
}

impl Tagged for TigerObservation {
    const ALL: &'static [Self] = &[
        TigerObservation::Nothing,
        TigerObservation::Left,
        TigerObservation::Right,
    ];

    fn code(self) -> u64 {
        self as u64
    }

    fn name(self) -> &'static str {
        match self {
            TigerObservation::Nothing => "nothing",
            TigerObservation::Left => "tiger behind left door",
            TigerObservation::Right => "tiger behind right door",
        }
    }
}

/// Rewards are offset by 100 so they stay non-negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TigerReward {
    Tiger,
    Invalid,
    Neutral,
    Gold,
}

impl Tagged for TigerReward {
    const ALL: &'static [Self] = &[
        TigerReward::Tiger,
        TigerReward::Invalid,
        TigerReward::Neutral,
        TigerReward::Gold,
    ];

    fn code(self) -> u64 {
        match self {
            TigerReward::Tiger => 0,
            TigerReward::Invalid => 90,
            TigerReward::Neutral => 99,
            TigerReward::Gold => 130,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TigerReward::Tiger => "eaten by the tiger (-100)",
            TigerReward::Invalid => "invalid action (-10)",
            TigerReward::Neutral => "-1",
            TigerReward::Gold => "found the gold (+30)",
        }
    }
}

/// The tiger problem with a chair
///
/// The agent starts seated. Listening only works while seated and reports the
/// tiger's door correctly with the configured accuracy. A door can only be
/// opened standing up. Opening a door reseats the agent and hides the tiger
/// again. Any action that makes no sense in the current posture is penalised.
#[derive(Debug)]
pub struct ExtendedTiger {
    listen_accuracy: f64,
    tiger: TigerObservation,
    sitting: bool,
    observation: TigerObservation,
    reward: TigerReward,
    last_action: Option<TigerAction>,
    rng: StdRng,
}

impl ExtendedTiger {
    /// Chance that listening reports the tiger's side
    pub const DEFAULT_LISTEN_ACCURACY: f64 = 0.85;

    /// Creates a seated agent in front of two closed doors, the tiger behind
    /// one of them at random
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let tiger = Self::hide(&mut rng);

        ExtendedTiger {
            listen_accuracy: Self::DEFAULT_LISTEN_ACCURACY,
            tiger,
            sitting: true,
            observation: TigerObservation::Nothing,
            reward: TigerReward::Neutral,
            last_action: None,
            rng,
        }
    }

    /// Sets the probability that listening reports the tiger's door
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfiguration`] unless `p` lies in [0, 1].
    pub fn with_listen_accuracy(mut self, p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(AgentError::InvalidConfiguration(format!(
                "listen accuracy must lie in [0, 1], got {}",
                p
            )));
        }
        self.listen_accuracy = p;
        Ok(self)
    }

    /// Door the tiger is behind
    /// The side the tiger hides behind
    pub fn tiger(&self) -> TigerObservation {
        self.tiger
    }

    /// Returns true while the agent is seated and can listen
    pub fn is_sitting(&self) -> bool {
        self.sitting
    }

    fn hide(rng: &mut StdRng) -> TigerObservation {
        if rng.gen_bool(0.5) {
            TigerObservation::Left
        } else {
            TigerObservation::Right
        }
    }

    fn open(&mut self, door: TigerObservation) {
        self.reward = if door == self.tiger {
            TigerReward::Tiger
        } else {
            TigerReward::Gold
        };
        self.tiger = Self::hide(&mut self.rng);
        self.sitting = true;
        self.observation = TigerObservation::Nothing;
    }
}

impl Environment for ExtendedTiger {
    type Action = TigerAction;
    type Observation = TigerObservation;
    type Reward = TigerReward;

    fn observation(&self) -> TigerObservation {
        self.observation
    }

    fn reward(&self) -> TigerReward {
        self.reward
    }

    fn perform_action(&mut self, action: TigerAction) {
        self.last_action = Some(action);
        self.reward = TigerReward::Invalid;

        match (action, self.sitting) {
            (TigerAction::Listen, true) => {
                let heard_right = self.rng.gen::<f64>() < self.listen_accuracy;
                self.observation = match (self.tiger, heard_right) {
                    (tiger, true) => tiger,
                    (TigerObservation::Left, false) => TigerObservation::Right,
                    (_, false) => TigerObservation::Left,
                };
                self.reward = TigerReward::Neutral;
            }
            (TigerAction::Stand, true) => {
                self.sitting = false;
                self.reward = TigerReward::Neutral;
            }
            (TigerAction::OpenLeft, false) => self.open(TigerObservation::Left),
            (TigerAction::OpenRight, false) => self.open(TigerObservation::Right),
            _ => {}
        }
    }

    fn describe(&self) -> String {
        let posture = if self.sitting { "sitting" } else { "standing" };
        match self.last_action {
            Some(action) => format!(
                "{}: heard {}, reward {}, now {}",
                action.name(),
                self.observation.name(),
                self.reward.name(),
                posture
            ),
            None => format!("{}, tiger hidden", posture),
        }
    }
}
