use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{
    environment::{Environment, Tagged},
    utils::seeded_rng,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeAction {
    Left,
    Right,
}

impl Tagged for MazeAction {
    const ALL: &'static [Self] = &[MazeAction::Left, MazeAction::Right];

    fn code(self) -> u64 {
        self as u64
    }

    fn name(self) -> &'static str {
        match self {
            MazeAction::Left => "left",
            MazeAction::Right => "right",
        }
    }
}

/// The maze is unobservable: every step yields the same observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeObservation {
    Nothing,
}

impl Tagged for MazeObservation {
    const ALL: &'static [Self] = &[MazeObservation::Nothing];

    fn code(self) -> u64 {
        0
    }

    fn name(self) -> &'static str {
        "nothing"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeReward {
    Nothing,
    Goal,
}

impl Tagged for MazeReward {
    const ALL: &'static [Self] = &[MazeReward::Nothing, MazeReward::Goal];

    fn code(self) -> u64 {
        self as u64
    }

    fn name(self) -> &'static str {
        match self {
            MazeReward::Nothing => "nothing",
            MazeReward::Goal => "goal",
        }
    }
}

/// A corridor of four cells with the goal in the third
///
/// Moving into the goal pays 1 and teleports the agent to a random non-goal
/// cell. Moves past either end leave the agent where it is.
#[derive(Debug)]
pub struct OneDMaze {
    cell: usize,
    reward: MazeReward,
    last_action: Option<MazeAction>,
    rng: StdRng,
}

impl OneDMaze {
    /// Number of cells in the corridor
    pub const CELLS: usize = 4;
    /// Cell that pays the reward
    pub const GOAL: usize = 2;
    const STARTS: [usize; 3] = [0, 1, 3];

    /// Creates a maze with the agent in a random non-goal cell
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let cell = Self::restart(&mut rng);

        OneDMaze {
            cell,
            reward: MazeReward::Nothing,
            last_action: None,
            rng,
        }
    }

    /// The agent's current cell
    pub fn cell(&self) -> usize {
        self.cell
    }

    fn restart(rng: &mut StdRng) -> usize {
        *Self::STARTS.choose(rng).unwrap_or(&0)
    }
}

impl Environment for OneDMaze {
    type Action = MazeAction;
    type Observation = MazeObservation;
    type Reward = MazeReward;

    fn observation(&self) -> MazeObservation {
        MazeObservation::Nothing
    }

    fn reward(&self) -> MazeReward {
        self.reward
    }

    fn perform_action(&mut self, action: MazeAction) {
        self.cell = match action {
            MazeAction::Left => self.cell.saturating_sub(1),
            MazeAction::Right => (self.cell + 1).min(Self::CELLS - 1),
        };

        if self.cell == Self::GOAL {
            self.reward = MazeReward::Goal;
            self.cell = Self::restart(&mut self.rng);
        } else {
            self.reward = MazeReward::Nothing;
        }
        self.last_action = Some(action);
    }

    fn describe(&self) -> String {
        let corridor: String = (0..Self::CELLS)
            .map(|c| if c == self.cell { 'A' } else { '*' })
            .collect();

        match self.last_action {
            Some(action) => format!("moved {}, reward {}: {}", action.name(), self.reward.code(), corridor),
            None => corridor,
        }
    }
}
